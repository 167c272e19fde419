//! CSV export records, file naming and file format.
//!
//! File layout: a byte-order mark, a title line, an unquoted header line
//! `ppg,time,laterality`, then one CRLF-terminated row per record with
//! numbers bare and strings double-quoted.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use lr_core::{Laterality, Sample};
use serde::{Deserialize, Serialize};

pub const HEADERS: [&str; 3] = ["ppg", "time", "laterality"];

/// Title used until the reading's creation date is known.
pub const DEFAULT_TITLE: &str = "default_title";

const BOM: &str = "\u{feff}";
const TITLE_TERMINATOR: &str = "\r\n\n";

/// One exported row.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CsvRecord {
    pub ppg: f64,
    pub time: f64,
    pub laterality: Laterality,
}

impl CsvRecord {
    /// Raw rows of one arm, in fetch order.
    pub fn from_samples(samples: &[Sample], arm: Laterality) -> Vec<CsvRecord> {
        samples
            .iter()
            .filter(|s| s.is_raw() && s.laterality == arm)
            .map(|s| CsvRecord {
                ppg: s.ppg_val,
                time: s.record_time,
                laterality: s.laterality,
            })
            .collect()
    }
}

/// `{laterality}_reading_{id}`
pub fn base_filename(choice: Laterality, reading_id: i64) -> String {
    format!("{}_reading_{}", choice, reading_id)
}

/// An export ready to be written out.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CsvExport {
    pub records: Vec<CsvRecord>,
    /// File name without extension
    pub filename: String,
    pub title: String,
}

impl CsvExport {
    pub fn new(reading_id: i64, choice: Laterality) -> Self {
        Self {
            records: Vec::new(),
            filename: base_filename(choice, reading_id),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Title the export with the reading's creation date and suffix the
    /// file name with `_on{date}`.
    pub fn apply_created(&mut self, date_created: &str) {
        self.title = date_created.to_string();
        self.filename.push_str("_on");
        self.filename.push_str(date_created);
    }

    pub fn append(&mut self, records: Vec<CsvRecord>) {
        self.records.extend(records);
    }

    /// Name of the downloaded file.
    pub fn download_name(&self) -> String {
        format!("{}.csv", self.filename)
    }

    pub fn to_bytes(&self) -> csv::Result<Vec<u8>> {
        let mut out: Vec<u8> = Vec::new();
        out.extend_from_slice(BOM.as_bytes());
        out.extend_from_slice(self.title.as_bytes());
        out.extend_from_slice(TITLE_TERMINATOR.as_bytes());
        {
            let mut header = WriterBuilder::new()
                .terminator(Terminator::CRLF)
                .quote_style(QuoteStyle::Never)
                .from_writer(&mut out);
            header.write_record(HEADERS)?;
            header.flush()?;
        }
        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .terminator(Terminator::CRLF)
                .quote_style(QuoteStyle::NonNumeric)
                .from_writer(&mut out);
            for record in &self.records {
                writer.write_record([
                    record.ppg.to_string(),
                    record.time.to_string(),
                    record.laterality.as_str().to_string(),
                ])?;
            }
            writer.flush()?;
        }
        Ok(out)
    }
}
