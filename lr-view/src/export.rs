//! CSV export assembly for a confirmed reading selection.

use log::{info, warn};
use lr_core::{Laterality, ReadingSource, Result};
use lr_data::{CsvExport, CsvRecord};

/// Fetch and concatenate the raw rows of a reading for an export.
///
/// The metadata lookup runs first so the file name and title are final
/// before any rows are gathered; its failure only costs the date suffix.
/// For a bilateral choice the left-arm rows precede the right-arm rows.
pub async fn build_export<S: ReadingSource>(
    source: &S,
    reading_id: i64,
    patient_num: &str,
    choice: Laterality,
) -> Result<CsvExport> {
    let mut export = CsvExport::new(reading_id, choice);

    match source.get_metadata(reading_id, patient_num).await {
        Ok(metadata) => match metadata.first() {
            Some(first) => export.apply_created(&first.date_created),
            None => warn!(
                "No export metadata for reading {} of patient {}",
                reading_id, patient_num
            ),
        },
        Err(e) => warn!("Export metadata for reading {} unavailable: {}", reading_id, e),
    }

    for arm in choice.arms() {
        let samples = source.get_samples(reading_id, *arm).await?;
        export.append(CsvRecord::from_samples(&samples, *arm));
    }

    info!(
        "Assembled export {} with {} rows",
        export.filename,
        export.records.len()
    );
    Ok(export)
}
