//! Transient, dismissible notifications.
//!
//! Nothing on the dashboard is fatal: failures and confirmations both end up
//! here. Errors stay visible for 10 seconds, everything else for 5 seconds.
//! Expired entries are pruned lazily when the active set is read.

use std::time::Duration;

use tokio::time::Instant;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    /// How long a notification of this kind stays visible.
    #[must_use]
    pub fn ttl(self) -> Duration {
        match self {
            Self::Error => Duration::from_secs(10),
            Self::Success | Self::Info | Self::Warning => Duration::from_secs(5),
        }
    }

    /// CSS modifier (`alert-<kind>`).
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Info => "info",
            Self::Warning | Self::Error => "alert-triangle",
        }
    }
}

/// Identifier used to dismiss a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    expires_at: Instant,
}

impl Notification {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Ordered collection of live notifications.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter {
    /// Append a notification that expires after its kind's TTL.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: Instant,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.items.push(Notification {
            id,
            kind,
            message: message.into(),
            expires_at: now + kind.ttl(),
        });
        id
    }

    /// Remove a notification before it expires. Returns whether it existed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Prune expired entries and return the remaining ones, oldest first.
    pub fn active(&mut self, now: Instant) -> Vec<Notification> {
        self.items.retain(|n| !n.is_expired(now));
        self.items.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_expire_success_after_five_seconds() {
        let mut center = NotificationCenter::default();
        let start = Instant::now();
        center.push(NotificationKind::Success, "Power on", start);

        assert_eq!(center.active(start + Duration::from_millis(4_999)).len(), 1);
        assert!(center.active(start + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn should_keep_errors_for_ten_seconds() {
        let mut center = NotificationCenter::default();
        let start = Instant::now();
        center.push(NotificationKind::Error, "Failed to load devices", start);
        center.push(NotificationKind::Info, "Data refreshed", start);

        let later = center.active(start + Duration::from_secs(6));
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].kind, NotificationKind::Error);
        assert!(center.active(start + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn should_dismiss_by_id() {
        let mut center = NotificationCenter::default();
        let now = Instant::now();
        let first = center.push(NotificationKind::Info, "one", now);
        let second = center.push(NotificationKind::Info, "two", now);

        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));

        let active = center.active(now);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second);
    }

    #[test]
    fn should_hand_out_increasing_ids() {
        let mut center = NotificationCenter::default();
        let now = Instant::now();
        let a = center.push(NotificationKind::Warning, "a", now);
        let b = center.push(NotificationKind::Warning, "b", now);
        assert!(b.value() > a.value());
        assert_eq!(NotificationId::from_raw(a.value()), a);
    }
}
