//! Deep-link graph rendering.

use crate::report::ChartReport;
use anyhow::bail;
use log::info;
use lr_core::{deep_link::DeepLink, Laterality, ReadingSource};
use lr_view::{Failure, GraphRequest, GraphState, GraphView};
use std::sync::Arc;

/// Wait for the view's fetches and fail if any of them stalled it.
pub async fn settle<S: ReadingSource>(view: &mut GraphView<S>) -> anyhow::Result<GraphState> {
    view.settle().await;
    let state = view.state();
    match &state.failure {
        Some(Failure::FetchFailed(reason)) => bail!("Fetch failed: {}", reason),
        Some(Failure::InvalidDeepLink(reason)) => bail!("Invalid deep link: {}", reason),
        None => Ok(state),
    }
}

/// Open the graph of one reading the way a deep link does and return its
/// series, with visibility set by the derivative view at `view_index`.
pub async fn render<S: ReadingSource>(
    source: Arc<S>,
    reading_id: i64,
    laterality: Laterality,
    view_index: usize,
) -> anyhow::Result<ChartReport> {
    let mut view = GraphView::open_deep_link(source, DeepLink::new(reading_id, laterality));
    settle(&mut view).await?;
    if view_index != 0 {
        view.select_derivative_view(view_index)?;
    }

    let state = view.state();
    let derivative = state.selection.derivative_view().unwrap_or_default();
    info!(
        "Reading {} ({}): {} points, showing {}",
        reading_id,
        laterality,
        state.chart.point_count(),
        derivative.label()
    );
    Ok(ChartReport::new(
        GraphRequest {
            reading_id,
            laterality,
        },
        derivative,
        &state.chart,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lr_core::memory::MemorySource;

    #[tokio::test]
    async fn test_render_bilateral_reading() {
        let source = Arc::new(MemorySource::embedded().unwrap());
        let chart = render(source, 42, Laterality::Bilateral, 0).await.unwrap();
        assert_eq!(chart.derivative_view, "All Data");
        let labels: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Left Arm", "Right Arm", "1st Derivative", "2nd Derivative"]);
        assert_eq!(chart.series[0].points.len(), 3);
        assert_eq!(chart.series[1].points.len(), 3);
        assert!(chart.series.iter().all(|s| !s.hidden));
    }

    #[tokio::test]
    async fn test_render_applies_derivative_view() {
        let source = Arc::new(MemorySource::embedded().unwrap());
        let chart = render(source, 5, Laterality::LeftArm, 2).await.unwrap();
        assert_eq!(chart.derivative_view, "1st Derivative");
        let hidden: Vec<bool> = chart.series.iter().map(|s| s.hidden).collect();
        assert_eq!(hidden, vec![true, true, false, true]);
        assert_eq!(chart.series[2].points[0].y, 6.5);
    }

    #[tokio::test]
    async fn test_render_rejects_unknown_reading() {
        let source = Arc::new(MemorySource::embedded().unwrap());
        let err = render(source, 999, Laterality::LeftArm, 0).await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid deep link"));
    }
}
