//! Monotonic sequence guards for out-of-order responses.
//!
//! Requests against the same logical resource may overlap (a refresh tick
//! fires while the previous one is still in flight). Each request takes a
//! [`Ticket`] when issued; its response is applied only if the ticket is
//! at least the last-applied ticket for that resource.

/// Sequence number handed out when a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Per-resource guard.
#[derive(Debug, Default)]
pub struct SequenceGuard {
    issued: u64,
    applied: Option<Ticket>,
}

impl SequenceGuard {
    /// Take the next ticket for a request about to be issued.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Record `ticket` as applied if it is not older than the last applied one.
    ///
    /// Returns `false` when the response is stale and must be discarded.
    pub fn try_apply(&mut self, ticket: Ticket) -> bool {
        if self.applied.is_some_and(|last| ticket < last) {
            return false;
        }
        self.applied = Some(ticket);
        true
    }
}
