//! Cascading reading selection and graph view state.
//!
//! - `selection`: the pure patient → reading → laterality → derivative-view
//!   state machine
//! - `graph`: the async view that issues fetches for the selection, folds
//!   their results into the chart and cancels them together on teardown
//! - `export`: CSV export assembly over a `ReadingSource`

pub mod error;
pub mod export;
pub mod graph;
pub mod selection;

pub use error::SelectionError;
pub use export::build_export;
pub use graph::{Failure, GraphState, GraphView};
pub use selection::{ExportSnapshot, GraphRequest, Pickers, Selection, Stage, Visibility};
