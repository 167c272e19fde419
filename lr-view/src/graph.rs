//! The graph view: selection, chart and export snapshot, driven by fetches.
//!
//! Every fetch runs as a task in the view's own `JoinSet`. Completions are
//! applied under the state lock and only while the view is open;
//! `teardown` closes the view and aborts whatever is still in flight.

use crate::{
    error::SelectionError,
    export::build_export,
    selection::{ExportSnapshot, GraphRequest, Selection},
};
use log::{debug, info, warn};
use lr_core::{deep_link::DeepLink, reading::distinct_patients, ReadingSource};
use lr_data::{CsvExport, FetchRole, SeriesSet};
use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::task::JoinSet;

/// Why the view stalled. The selection that triggered the fetch can simply
/// be re-issued.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Failure {
    FetchFailed(String),
    InvalidDeepLink(String),
}

impl From<lr_core::Error> for Failure {
    fn from(e: lr_core::Error) -> Self {
        match e {
            lr_core::Error::InvalidDeepLink(reason) => Failure::InvalidDeepLink(reason),
            other => Failure::FetchFailed(other.to_string()),
        }
    }
}

impl From<SelectionError> for Failure {
    fn from(e: SelectionError) -> Self {
        match e {
            SelectionError::InvalidDeepLink(reason) => Failure::InvalidDeepLink(reason),
            other => Failure::FetchFailed(other.to_string()),
        }
    }
}

/// Everything a renderer needs to draw the page.
#[derive(Debug, Clone, Default)]
pub struct GraphState {
    pub selection: Selection,
    pub chart: SeriesSet,
    /// Survives the reset that follows a graph request
    pub export: Option<ExportSnapshot>,
    pub failure: Option<Failure>,
}

#[derive(Default)]
struct Shared {
    state: GraphState,
    closed: bool,
    /// Bumped per graph request so results of an older one are discarded
    chart_generation: u64,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One graph page. Must be created inside a Tokio runtime.
pub struct GraphView<S: ReadingSource> {
    source: Arc<S>,
    shared: Arc<Mutex<Shared>>,
    tasks: JoinSet<()>,
}

impl<S: ReadingSource> GraphView<S> {
    fn new(source: Arc<S>) -> Self {
        Self {
            source,
            shared: Arc::new(Mutex::new(Shared::default())),
            tasks: JoinSet::new(),
        }
    }

    /// Open the page for manual selection; the patient list starts loading.
    pub fn open(source: Arc<S>) -> Self {
        let mut view = Self::new(source);
        view.spawn_patient_list();
        view
    }

    /// Open the page on one reading.
    ///
    /// The sample fetches start right away and race the lookup of the
    /// reading's patient, which then fills in every picker. The patient list
    /// is installed as soon as it arrives, so if the reading cannot be
    /// resolved the page falls back to manual selection with an empty chart.
    pub fn open_deep_link(source: Arc<S>, link: DeepLink) -> Self {
        let mut view = Self::new(source);
        view.spawn_graph(GraphRequest {
            reading_id: link.reading_id,
            laterality: link.laterality,
        });

        let source = Arc::clone(&view.source);
        let shared = Arc::clone(&view.shared);
        view.tasks.spawn(async move {
            let what = format!("deep link to reading {}", link.reading_id);
            let readings = match source.list_readings().await {
                Ok(readings) => readings,
                Err(e) => return record_failure(&shared, &what, e),
            };
            let patient = {
                let mut guard = lock(&shared);
                if guard.closed {
                    debug!("View closed; dropping result of {}", what);
                    return;
                }
                guard.state.selection.set_patients(distinct_patients(&readings));
                match readings.iter().find(|r| r.id == link.reading_id) {
                    Some(reading) => reading.patient_num.clone(),
                    None => {
                        warn!("Deep link names unknown reading {}", link.reading_id);
                        let reason = format!("reading {} not found", link.reading_id);
                        return reject_deep_link(&mut guard, Failure::InvalidDeepLink(reason));
                    }
                }
            };

            let of_patient = match source.readings_of_patient(&patient).await {
                Ok(of_patient) => of_patient,
                Err(e) => return record_failure(&shared, &what, e),
            };
            let mut guard = lock(&shared);
            if guard.closed {
                debug!("View closed; dropping result of {}", what);
                return;
            }
            let state = &mut guard.state;
            match state.selection.enter_deep_link(
                &patient,
                of_patient,
                link.reading_id,
                link.laterality,
            ) {
                Ok(snapshot) => {
                    let view = state.selection.derivative_view().unwrap_or_default();
                    state.chart.set_hidden(view.hidden_flags());
                    state.export = Some(snapshot);
                }
                Err(e) => {
                    warn!("Deep link to reading {} rejected: {}", link.reading_id, e);
                    reject_deep_link(&mut guard, e.into());
                }
            }
        });
        view
    }

    /// Fetch the patient list again, e.g. after its first fetch failed.
    ///
    /// Any selection in progress is reset once the list arrives.
    pub fn reload_patients(&mut self) -> Result<(), SelectionError> {
        self.open_state()?.state.failure = None;
        self.spawn_patient_list();
        Ok(())
    }

    /// A copy of the current page state.
    pub fn state(&self) -> GraphState {
        lock(&self.shared).state.clone()
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.shared).closed
    }

    pub fn select_patient(&mut self, index: usize) -> Result<(), SelectionError> {
        let (ticket, patient) = {
            let mut shared = self.open_state()?;
            shared.state.failure = None;
            shared.state.selection.select_patient(index)?
        };
        let source = Arc::clone(&self.source);
        let lookup = patient.clone();
        self.spawn_apply(
            format!("readings of patient {}", patient),
            async move { source.readings_of_patient(&lookup).await },
            move |shared, readings| {
                let count = readings.len();
                if shared.state.selection.load_readings(ticket, readings) {
                    debug!("Loaded {} readings of patient {}", count, patient);
                } else {
                    debug!("Discarded readings of superseded patient {}", patient);
                }
            },
        );
        Ok(())
    }

    pub fn select_reading(&mut self, index: usize) -> Result<(), SelectionError> {
        let mut shared = self.open_state()?;
        shared.state.selection.select_reading(index)
    }

    pub fn select_laterality(&mut self, index: usize) -> Result<(), SelectionError> {
        let mut shared = self.open_state()?;
        shared.state.selection.select_laterality(index)
    }

    /// Change which series are visible; also snapshots the selection for
    /// CSV export.
    pub fn select_derivative_view(&mut self, index: usize) -> Result<(), SelectionError> {
        let mut shared = self.open_state()?;
        let (view, snapshot) = shared.state.selection.select_derivative_view(index)?;
        shared.state.chart.set_hidden(view.hidden_flags());
        shared.state.export = Some(snapshot);
        Ok(())
    }

    /// Graph the confirmed selection.
    ///
    /// The selection is reset straight away; the chart fills in as the
    /// sample fetches complete.
    pub fn submit_graph(&mut self) -> Result<GraphRequest, SelectionError> {
        let request = {
            let mut shared = self.open_state()?;
            shared.state.failure = None;
            shared.state.selection.take_graph_request()?
        };
        info!(
            "Graphing reading {} ({})",
            request.reading_id, request.laterality
        );
        self.spawn_graph(request);
        Ok(request)
    }

    /// Build the CSV export for the last confirmed selection, if any.
    pub async fn export_csv(&self) -> lr_core::Result<Option<CsvExport>> {
        let snapshot = lock(&self.shared).state.export.clone();
        match snapshot {
            Some(s) => build_export(&*self.source, s.reading_id, &s.patient_num, s.laterality)
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    /// Wait until every fetch issued so far has completed.
    pub async fn settle(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    warn!("View task panicked: {}", e);
                }
            }
        }
    }

    /// Close the view: in-flight fetches are aborted and any completion
    /// that still slips through is dropped.
    pub fn teardown(&mut self) {
        {
            let mut shared = lock(&self.shared);
            if shared.closed {
                return;
            }
            shared.closed = true;
        }
        debug!("Tearing down view with {} tasks in flight", self.tasks.len());
        self.tasks.abort_all();
    }

    fn open_state(&self) -> Result<MutexGuard<'_, Shared>, SelectionError> {
        let shared = lock(&self.shared);
        if shared.closed {
            return Err(SelectionError::Closed);
        }
        Ok(shared)
    }

    fn spawn_patient_list(&mut self) {
        let source = Arc::clone(&self.source);
        self.spawn_apply(
            "patient list".to_string(),
            async move { source.list_readings().await },
            |shared, readings| {
                let patients = distinct_patients(&readings);
                info!("Loaded {} patients", patients.len());
                shared.state.selection.set_patients(patients);
            },
        );
    }

    fn spawn_graph(&mut self, request: GraphRequest) {
        let generation = {
            let mut shared = lock(&self.shared);
            shared.chart_generation += 1;
            shared.state.chart.clear_points();
            shared.chart_generation
        };
        for role in FetchRole::plan(request.laterality) {
            let source = Arc::clone(&self.source);
            let reading_id = request.reading_id;
            self.spawn_apply(
                format!("samples of reading {} ({})", reading_id, role.laterality()),
                async move { source.get_samples(reading_id, role.laterality()).await },
                move |shared, samples| {
                    if shared.chart_generation != generation {
                        debug!("Discarded samples of superseded graph request");
                        return;
                    }
                    shared.state.chart.apply_fetch(role, &samples);
                },
            );
        }
    }

    /// Run `fetch` as a view task and hand its result to `apply` under the
    /// state lock, unless the view has closed in the meantime.
    fn spawn_apply<T, F, A>(&mut self, what: String, fetch: F, apply: A)
    where
        T: Send + 'static,
        F: Future<Output = lr_core::Result<T>> + Send + 'static,
        A: FnOnce(&mut Shared, T) + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        self.tasks.spawn(async move {
            match fetch.await {
                Ok(value) => {
                    let mut guard = lock(&shared);
                    if guard.closed {
                        debug!("View closed; dropping result of {}", what);
                        return;
                    }
                    apply(&mut guard, value);
                }
                Err(e) => record_failure(&shared, &what, e),
            }
        });
    }
}

/// Stall the view on a failed fetch, unless it has closed.
fn record_failure(shared: &Mutex<Shared>, what: &str, e: lr_core::Error) {
    let mut guard = lock(shared);
    if guard.closed {
        debug!("View closed; dropping failure of {}", what);
        return;
    }
    warn!("Fetch of {} failed: {}", what, e);
    guard.state.failure = Some(e.into());
}

/// Fall back to manual selection: the deep link's samples, whether drawn
/// already or still in flight, are discarded.
fn reject_deep_link(shared: &mut Shared, failure: Failure) {
    shared.chart_generation += 1;
    shared.state.chart.clear_points();
    shared.state.selection.reset();
    shared.state.export = None;
    shared.state.failure = Some(failure);
}

impl<S: ReadingSource> Drop for GraphView<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
