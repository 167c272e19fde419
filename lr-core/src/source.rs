//! The data-access seam shared by the HTTP client and the fixture source.

use crate::{
    error::Result,
    laterality::Laterality,
    reading::{Reading, ReadingMetadata},
    sample::Sample,
};
use std::future::Future;

/// Catalog, sample and export-metadata lookups for readings.
///
/// Futures are `Send` so a view can run lookups as spawned tasks.
pub trait ReadingSource: Send + Sync + 'static {
    /// Every stored reading, across all patients.
    fn list_readings(&self) -> impl Future<Output = Result<Vec<Reading>>> + Send;

    /// A single reading by id.
    fn get_reading(&self, id: i64) -> impl Future<Output = Result<Reading>> + Send;

    /// Readings of one patient, in backend order (oldest first).
    fn readings_of_patient(
        &self,
        patient_num: &str,
    ) -> impl Future<Output = Result<Vec<Reading>>> + Send;

    /// Sample rows of one reading for one arm, raw and derivative rows alike.
    fn get_samples(
        &self,
        reading_id: i64,
        laterality: Laterality,
    ) -> impl Future<Output = Result<Vec<Sample>>> + Send;

    /// Export metadata of a reading.
    fn get_metadata(
        &self,
        reading_id: i64,
        patient_num: &str,
    ) -> impl Future<Output = Result<Vec<ReadingMetadata>>> + Send;
}
