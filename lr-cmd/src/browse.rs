//! Patient and reading listing, and index-driven selection.

use crate::{
    export,
    graph::settle,
    report::{ChartReport, ReadingRow},
};
use anyhow::Context;
use log::{debug, info};
use lr_core::{reading::distinct_patients, ReadingSource};
use lr_view::GraphView;
use std::{path::Path, sync::Arc};

pub async fn patients<S: ReadingSource>(source: &S) -> anyhow::Result<Vec<String>> {
    let readings = source
        .list_readings()
        .await
        .context("Failed to list readings")?;
    Ok(distinct_patients(&readings))
}

/// Readings of a patient, newest first, each with its fetch-order index.
pub async fn readings<S: ReadingSource>(
    source: &S,
    patient_num: &str,
) -> anyhow::Result<Vec<ReadingRow>> {
    let readings = source
        .readings_of_patient(patient_num)
        .await
        .with_context(|| format!("Failed to list readings of patient {}", patient_num))?;
    Ok(readings
        .iter()
        .enumerate()
        .rev()
        .map(|(index, reading)| ReadingRow::new(index, reading))
        .collect())
}

/// Picker indices for `select`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Picks {
    pub patient: usize,
    pub reading: usize,
    pub laterality: usize,
    pub view: usize,
}

/// Drive the pickers in order, submit the graph request and return the
/// chart once its fetches are in. With `out_dir`, the selection is also
/// exported as CSV.
pub async fn select<S: ReadingSource>(
    source: Arc<S>,
    picks: Picks,
    out_dir: Option<&Path>,
) -> anyhow::Result<ChartReport> {
    let mut view = GraphView::open(source);
    settle(&mut view).await?;

    view.select_patient(picks.patient)?;
    let state = settle(&mut view).await?;
    debug!(
        "Patient {:?} has {} readings",
        state.selection.selected_patient(),
        state.selection.readings().len()
    );

    view.select_reading(picks.reading)?;
    view.select_laterality(picks.laterality)?;
    view.select_derivative_view(picks.view)?;
    let derivative = view
        .state()
        .selection
        .derivative_view()
        .unwrap_or_default();

    let request = view.submit_graph()?;
    let state = settle(&mut view).await?;
    info!(
        "Graphed reading {} with {} points",
        request.reading_id,
        state.chart.point_count()
    );

    if let Some(dir) = out_dir {
        if let Some(csv) = view.export_csv().await? {
            export::save(&csv, dir)?;
        }
    }

    Ok(ChartReport::new(request, derivative, &state.chart))
}
