//! Series assembly and CSV export shaping for limb perfusion readings.
//!
//! This crate turns raw sample rows into forms suitable for charting and
//! exporting. It performs no I/O.

pub mod derivative_view;
pub mod export;
pub mod series;

pub use derivative_view::DerivativeView;
pub use export::{CsvExport, CsvRecord};
pub use series::{assemble, assemble_bilateral, AssemblyMode, FetchRole, Point, Series, SeriesSet};
