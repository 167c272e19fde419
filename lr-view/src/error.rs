use crate::selection::Stage;
use thiserror::Error;

/// Rejected picks and graph requests.
///
/// A rejected call leaves the selection as it was.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum SelectionError {
    #[error("Cannot {action} at stage {stage:?}")]
    OutOfOrder { action: &'static str, stage: Stage },

    #[error("No {picker} option at index {index} ({len} available)")]
    InvalidIndex {
        picker: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Readings of the selected patient have not loaded yet")]
    ReadingsNotLoaded,

    #[error("Invalid deep link: {0}")]
    InvalidDeepLink(String),

    #[error("The view has been torn down")]
    Closed,
}
