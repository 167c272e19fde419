//! Core types and backend client for limb perfusion readings.
//!
//! This crate provides:
//! - `laterality`, `reading`, `sample`: the wire types served by the backend
//! - `source`: the `ReadingSource` trait every data consumer is written against
//! - `memory`: an in-memory `ReadingSource` loaded from a JSON fixture
//! - `deep_link`: parsing of `reading_id=..&laterality=..` navigation parameters
//! - `api` (feature `api`): client config, auth header injector and the HTTP client

pub mod deep_link;
pub mod error;
pub mod laterality;
pub mod memory;
pub mod reading;
pub mod sample;
pub mod source;

#[cfg(feature = "api")]
pub mod api;

pub use error::{Error, Result};
pub use laterality::Laterality;
pub use reading::{Reading, ReadingMetadata};
pub use sample::{Derivative, Sample};
pub use source::ReadingSource;

/// Embedded fixture with a handful of patients, readings and samples.
pub static FIXTURE_JSON: &str = include_str!("../../fixtures/readings.json");
