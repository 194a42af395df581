//! Confirmation port: asks the operator before a disruptive action.

use std::future::Future;

/// Source of an explicit yes/no answer from the operator.
pub trait Confirmation {
    /// Resolve to `true` only when the operator agreed to `prompt`.
    fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send;
}

/// An answer that was already collected, e.g. from a submitted form.
impl Confirmation for bool {
    fn confirm(&self, _prompt: &str) -> impl Future<Output = bool> + Send {
        let answer = *self;
        async move { answer }
    }
}
