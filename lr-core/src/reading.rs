use crate::laterality::Laterality;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Formats accepted for `date_created` besides RFC 3339.
const CREATED_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Format used when presenting a parsed creation time.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One recorded monitoring session for a patient.
///
/// Owned by the backend and immutable once created; clients hold a
/// read-only copy per patient selection.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub id: i64,
    pub patient_num: String,
    pub laterality: Laterality,
    /// Creation timestamp exactly as served by the backend
    pub date_created: String,
}

/// Export metadata row for a reading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ReadingMetadata {
    pub date_created: String,
}

impl Reading {
    /// Parse `date_created`, if it is in a recognised format.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_created(&self.date_created)
    }

    /// Label for the reading picker: `ID: 5 Date Created: 2022-03-01 10:15:00`.
    pub fn option_label(&self) -> String {
        let created = self
            .created_at()
            .map(|t| t.format(DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| self.date_created.clone());
        format!("ID: {} Date Created: {}", self.id, created)
    }
}

fn parse_created(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.naive_utc());
    }
    CREATED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Distinct patient numbers across all readings, in first-seen order.
pub fn distinct_patients(readings: &[Reading]) -> Vec<String> {
    let mut patients: Vec<String> = Vec::new();
    for reading in readings {
        if !patients.contains(&reading.patient_num) {
            patients.push(reading.patient_num.clone());
        }
    }
    patients
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: i64, patient: &str, date: &str) -> Reading {
        Reading {
            id,
            patient_num: patient.to_string(),
            laterality: Laterality::LeftArm,
            date_created: date.to_string(),
        }
    }

    #[test]
    fn test_distinct_patients_keeps_first_seen_order() {
        let readings = vec![
            reading(1, "P2", ""),
            reading(2, "P1", ""),
            reading(3, "P2", ""),
            reading(4, "P3", ""),
        ];
        assert_eq!(distinct_patients(&readings), vec!["P2", "P1", "P3"]);
    }

    #[test]
    fn test_option_label_formats_known_timestamps() {
        let r = reading(5, "P1", "2022-03-01T10:15:00.000+00:00");
        assert_eq!(r.option_label(), "ID: 5 Date Created: 2022-03-01 10:15:00");
        let r = reading(6, "P1", "2022-03-01 10:15:00");
        assert_eq!(r.option_label(), "ID: 6 Date Created: 2022-03-01 10:15:00");
    }

    #[test]
    fn test_option_label_falls_back_to_raw() {
        let r = reading(7, "P1", "yesterday");
        assert_eq!(r.created_at(), None);
        assert_eq!(r.option_label(), "ID: 7 Date Created: yesterday");
    }

    #[test]
    fn test_reading_wire_format() {
        let json = r#"{"id":42,"patient_num":"P1","laterality":"BILATERAL","date_created":"2022-03-01 10:15:00"}"#;
        let r: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, 42);
        assert_eq!(r.laterality, Laterality::Bilateral);
    }
}
