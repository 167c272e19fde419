use crate::{
    error::{Error, Result},
    laterality::Laterality,
    reading::{Reading, ReadingMetadata},
    sample::Sample,
    source::ReadingSource,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// A sample row as stored in a fixture, keyed by its reading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct StoredSample {
    pub reading_id: i64,
    #[serde(flatten)]
    pub sample: Sample,
}

/// Offline `ReadingSource` backed by a JSON document of the form
/// `{"readings": [...], "reading_data": [...]}`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemorySource {
    pub readings: Vec<Reading>,
    #[serde(default)]
    pub reading_data: Vec<StoredSample>,
}

impl MemorySource {
    pub fn new(readings: Vec<Reading>, reading_data: Vec<StoredSample>) -> Self {
        Self {
            readings,
            reading_data,
        }
    }

    /// Parse a fixture document.
    pub fn from_json(json: &str) -> Result<Self> {
        let source: MemorySource = serde_json::from_str(json)?;
        debug!(
            "Loaded fixture with {} readings and {} sample rows",
            source.readings.len(),
            source.reading_data.len()
        );
        Ok(source)
    }

    /// Read and parse a fixture file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The fixture embedded in this crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json(crate::FIXTURE_JSON)
    }

    fn find(&self, id: i64) -> Option<&Reading> {
        self.readings.iter().find(|r| r.id == id)
    }
}

impl ReadingSource for MemorySource {
    async fn list_readings(&self) -> Result<Vec<Reading>> {
        Ok(self.readings.clone())
    }

    async fn get_reading(&self, id: i64) -> Result<Reading> {
        self.find(id).cloned().ok_or(Error::ReadingNotFound(id))
    }

    async fn readings_of_patient(&self, patient_num: &str) -> Result<Vec<Reading>> {
        Ok(self
            .readings
            .iter()
            .filter(|r| r.patient_num == patient_num)
            .cloned()
            .collect())
    }

    async fn get_samples(&self, reading_id: i64, laterality: Laterality) -> Result<Vec<Sample>> {
        Ok(self
            .reading_data
            .iter()
            .filter(|row| row.reading_id == reading_id && row.sample.laterality == laterality)
            .map(|row| row.sample.clone())
            .collect())
    }

    async fn get_metadata(
        &self,
        reading_id: i64,
        patient_num: &str,
    ) -> Result<Vec<ReadingMetadata>> {
        Ok(self
            .find(reading_id)
            .filter(|r| r.patient_num == patient_num)
            .map(|r| ReadingMetadata {
                date_created: r.date_created.clone(),
            })
            .into_iter()
            .collect())
    }
}
