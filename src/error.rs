//! Internal error types

use thiserror::Error;

/// Failures inside the shared application state
#[derive(Debug, Error)]
pub enum StateError {
    /// A mutex guarding shared state was poisoned by a panicking holder
    #[error("failed to lock {0}: lock poisoned")]
    Poisoned(&'static str),
}

impl StateError {
    pub(crate) fn poisoned<T>(what: &'static str) -> impl FnOnce(T) -> Self {
        move |_| StateError::Poisoned(what)
    }
}
