//! Store error types.

use derive_more::{Display, Error};

/// Backend failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Outcome of a transaction that did not commit.
#[derive(Debug, Clone)]
pub enum TransactError<E> {
    /// The update function rejected the current value; nothing was written.
    Rejected(E),

    /// Every attempt lost a write race and the retry budget ran out.
    Aborted {
        /// Number of times the update function ran.
        attempts: u32,
    },

    /// The backend failed independently of the update.
    Backend(StoreError),
}

impl<E: std::fmt::Display> std::fmt::Display for TransactError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "Transaction rejected: {}", reason),
            Self::Aborted { attempts } => {
                write!(f, "Transaction aborted after {} attempts", attempts)
            }
            Self::Backend(err) => write!(f, "{}", err),
        }
    }
}

impl<E> std::error::Error for TransactError<E> where E: std::error::Error {}

impl<E> From<StoreError> for TransactError<E> {
    fn from(err: StoreError) -> Self {
        Self::Backend(err)
    }
}
