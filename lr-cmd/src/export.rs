//! CSV export to disk.

use anyhow::Context;
use log::{debug, info};
use lr_core::{Laterality, ReadingSource};
use lr_data::CsvExport;
use lr_view::build_export;
use std::path::{Path, PathBuf};

/// The download name with path separators and colons replaced, so a
/// timestamp suffix yields a portable file name.
pub fn file_name(export: &CsvExport) -> String {
    export
        .download_name()
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' => '-',
            other => other,
        })
        .collect()
}

/// Write `export` into `out_dir` under its download name.
pub fn save(export: &CsvExport, out_dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let path = out_dir.join(file_name(export));
    let bytes = export.to_bytes()?;
    std::fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Exported {} rows to {}", export.records.len(), path.display());
    Ok(path)
}

/// Export a reading. Without `patient_num`, the reading's own patient is
/// looked up first.
pub async fn write_export<S: ReadingSource>(
    source: &S,
    reading_id: i64,
    patient_num: Option<&str>,
    laterality: Laterality,
    out_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let patient_num = match patient_num {
        Some(patient) => patient.to_string(),
        None => {
            let reading = source
                .get_reading(reading_id)
                .await
                .with_context(|| format!("Failed to look up reading {}", reading_id))?;
            debug!("Reading {} belongs to patient {}", reading_id, reading.patient_num);
            reading.patient_num
        }
    };
    let export = build_export(source, reading_id, &patient_num, laterality)
        .await
        .with_context(|| format!("Failed to export reading {}", reading_id))?;
    save(&export, out_dir)
}
