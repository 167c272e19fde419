//! JSON documents printed or written by the commands.

use anyhow::Context;
use log::info;
use lr_core::{Laterality, Reading};
use lr_data::{DerivativeView, Series, SeriesSet};
use lr_view::GraphRequest;
use serde::Serialize;
use std::path::Path;

/// One reading as listed by `readings`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ReadingRow {
    /// Fetch-order index, accepted by `select --reading`
    pub index: usize,
    pub id: i64,
    pub laterality: Laterality,
    pub label: String,
}

impl ReadingRow {
    pub fn new(index: usize, reading: &Reading) -> Self {
        ReadingRow {
            index,
            id: reading.id,
            laterality: reading.laterality,
            label: reading.option_label(),
        }
    }
}

/// The four chart series of a graph, ready for an external renderer.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ChartReport {
    pub reading_id: i64,
    pub laterality: Laterality,
    pub derivative_view: &'static str,
    pub series: Vec<Series>,
}

impl ChartReport {
    pub fn new(request: GraphRequest, view: DerivativeView, chart: &SeriesSet) -> Self {
        ChartReport {
            reading_id: request.reading_id,
            laterality: request.laterality,
            derivative_view: view.label(),
            series: chart.slots().to_vec(),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn write_json<T: Serialize>(value: &T, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
