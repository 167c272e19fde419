/// Error types for the limb-rescue core library
use thiserror::Error;

/// Main error type for catalog, sample and metadata operations
#[derive(Error, Debug)]
pub enum Error {
    /// The backend could not be reached or answered with a failure status.
    /// Recoverable: re-issuing the selection retries the fetch.
    #[error("Fetch of {target} failed: {reason}")]
    FetchFailed { target: String, reason: String },

    /// No reading with the given id exists
    #[error("Reading not found: {0}")]
    ReadingNotFound(i64),

    /// Navigation parameters did not resolve to a reading
    #[error("Invalid deep link: {0}")]
    InvalidDeepLink(String),

    /// A laterality tag outside LEFT_ARM / RIGHT_ARM / BILATERAL
    #[error("Unknown laterality: {0:?}")]
    UnknownLaterality(String),

    /// Failed to decode a JSON payload
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Failed to read a fixture or write an export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn fetch_failed(target: impl Into<String>, reason: impl ToString) -> Self {
        Error::FetchFailed {
            target: target.into(),
            reason: reason.to_string(),
        }
    }
}

/// Type alias for Results using the core Error
pub type Result<T> = std::result::Result<T, Error>;
