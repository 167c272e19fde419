//! The cascading patient → reading → laterality → derivative-view selection.
//!
//! Picker visibility lives here as plain fields; a renderer reads them
//! instead of the selection logic touching presentation elements.

use crate::error::SelectionError;
use lr_core::{Laterality, Reading};
use lr_data::DerivativeView;

/// How far the cascade has progressed.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Stage {
    NoPatient,
    PatientSelected,
    ReadingSelected,
    LateralitySelected,
    Ready,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

/// Visibility of each picker and of the run/csv actions.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Pickers {
    pub reading: Visibility,
    pub laterality: Visibility,
    pub derivative: Visibility,
    pub actions: Visibility,
}

impl Pickers {
    fn all_shown() -> Self {
        Pickers {
            reading: Visibility::Shown,
            laterality: Visibility::Shown,
            derivative: Visibility::Shown,
            actions: Visibility::Shown,
        }
    }
}

/// A dropdown entry: `value` is what gets passed back to the matching
/// `select_*` call.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PickerOption {
    pub value: usize,
    pub label: String,
}

/// The reading, patient and laterality a CSV export is taken from.
///
/// Kept apart from the selection, which is wiped after every graph request.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ExportSnapshot {
    pub reading_id: i64,
    pub patient_num: String,
    pub laterality: Laterality,
}

/// A confirmed request to graph one reading.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GraphRequest {
    pub reading_id: i64,
    pub laterality: Laterality,
}

/// Identifies the patient pick a readings fetch was issued for.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PatientTicket(u64);

#[derive(Debug, Clone)]
pub struct Selection {
    stage: Stage,
    patients: Vec<String>,
    /// Readings of the selected patient, in fetch order
    readings: Vec<Reading>,
    lateralities: Vec<Laterality>,
    patient: Option<usize>,
    reading: Option<usize>,
    laterality: Option<usize>,
    derivative_view: Option<DerivativeView>,
    pickers: Pickers,
    ticket: u64,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self {
            stage: Stage::NoPatient,
            patients: Vec::new(),
            readings: Vec::new(),
            lateralities: Vec::new(),
            patient: None,
            reading: None,
            laterality: None,
            derivative_view: None,
            pickers: Pickers::default(),
            ticket: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn pickers(&self) -> Pickers {
        self.pickers
    }

    pub fn patients(&self) -> &[String] {
        &self.patients
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn lateralities(&self) -> &[Laterality] {
        &self.lateralities
    }

    pub fn patient_index(&self) -> Option<usize> {
        self.patient
    }

    pub fn reading_index(&self) -> Option<usize> {
        self.reading
    }

    pub fn laterality_index(&self) -> Option<usize> {
        self.laterality
    }

    pub fn derivative_view(&self) -> Option<DerivativeView> {
        self.derivative_view
    }

    pub fn selected_patient(&self) -> Option<&str> {
        self.patient
            .and_then(|i| self.patients.get(i))
            .map(String::as_str)
    }

    pub fn selected_reading(&self) -> Option<&Reading> {
        self.reading.and_then(|i| self.readings.get(i))
    }

    pub fn selected_laterality(&self) -> Option<Laterality> {
        self.laterality.and_then(|i| self.lateralities.get(i)).copied()
    }

    pub fn patient_options(&self) -> Vec<PickerOption> {
        self.patients
            .iter()
            .enumerate()
            .map(|(value, patient)| PickerOption {
                value,
                label: patient.clone(),
            })
            .collect()
    }

    /// Reading options, most recent first; values index the fetch order.
    pub fn reading_options(&self) -> Vec<PickerOption> {
        self.readings
            .iter()
            .enumerate()
            .rev()
            .map(|(value, reading)| PickerOption {
                value,
                label: reading.option_label(),
            })
            .collect()
    }

    pub fn laterality_options(&self) -> Vec<PickerOption> {
        self.lateralities
            .iter()
            .enumerate()
            .map(|(value, laterality)| PickerOption {
                value,
                label: laterality.to_string(),
            })
            .collect()
    }

    pub fn derivative_options(&self) -> Vec<PickerOption> {
        DerivativeView::ALL
            .iter()
            .map(|view| PickerOption {
                value: view.index(),
                label: view.label().to_string(),
            })
            .collect()
    }

    /// Replace the patient list. Any selection in progress is reset, since
    /// its patient index referred to the old list.
    pub fn set_patients(&mut self, patients: Vec<String>) {
        self.reset();
        self.patients = patients;
    }

    /// Pick a patient. Valid from any stage.
    ///
    /// Clears the reading, laterality and derivative selections and their
    /// option lists, reveals the reading picker and returns the patient
    /// whose readings must now be fetched.
    pub fn select_patient(&mut self, index: usize) -> Result<(PatientTicket, String), SelectionError> {
        let patient = self
            .patients
            .get(index)
            .cloned()
            .ok_or(SelectionError::InvalidIndex {
                picker: "patient",
                index,
                len: self.patients.len(),
            })?;
        self.clear_from_reading();
        self.ticket += 1;
        self.patient = Some(index);
        self.stage = Stage::PatientSelected;
        self.pickers = Pickers {
            reading: Visibility::Shown,
            ..Pickers::default()
        };
        Ok((PatientTicket(self.ticket), patient))
    }

    /// Install the readings fetched for a patient pick.
    ///
    /// Returns false, leaving the selection untouched, when the pick has
    /// since been superseded.
    pub fn load_readings(&mut self, ticket: PatientTicket, readings: Vec<Reading>) -> bool {
        if ticket.0 != self.ticket || self.stage != Stage::PatientSelected {
            return false;
        }
        self.readings = readings;
        true
    }

    /// Pick a reading by its fetch-order index.
    pub fn select_reading(&mut self, index: usize) -> Result<(), SelectionError> {
        self.require(Stage::PatientSelected, "select a reading")?;
        if self.readings.is_empty() {
            return Err(SelectionError::ReadingsNotLoaded);
        }
        let stored = self
            .readings
            .get(index)
            .map(|r| r.laterality)
            .ok_or(SelectionError::InvalidIndex {
                picker: "reading",
                index,
                len: self.readings.len(),
            })?;
        self.reading = Some(index);
        self.laterality = None;
        self.derivative_view = None;
        self.lateralities = stored.choices();
        self.stage = Stage::ReadingSelected;
        self.pickers.laterality = Visibility::Shown;
        self.pickers.derivative = Visibility::Hidden;
        self.pickers.actions = Visibility::Hidden;
        Ok(())
    }

    /// Pick a laterality; the derivative view defaults to "All Data".
    pub fn select_laterality(&mut self, index: usize) -> Result<(), SelectionError> {
        self.require(Stage::ReadingSelected, "select a laterality")?;
        if index >= self.lateralities.len() {
            return Err(SelectionError::InvalidIndex {
                picker: "laterality",
                index,
                len: self.lateralities.len(),
            });
        }
        self.laterality = Some(index);
        self.derivative_view = Some(DerivativeView::AllData);
        self.stage = Stage::LateralitySelected;
        self.pickers.derivative = Visibility::Shown;
        self.pickers.actions = Visibility::Hidden;
        Ok(())
    }

    /// Pick which series are visible.
    ///
    /// An index outside the table is rejected and changes nothing. On
    /// success the run and csv actions are revealed and the export snapshot
    /// for the current selection is returned.
    pub fn select_derivative_view(
        &mut self,
        index: usize,
    ) -> Result<(DerivativeView, ExportSnapshot), SelectionError> {
        self.require(Stage::LateralitySelected, "select a derivative view")?;
        let view = DerivativeView::from_index(index).ok_or(SelectionError::InvalidIndex {
            picker: "derivative view",
            index,
            len: DerivativeView::ALL.len(),
        })?;
        let snapshot = self.snapshot()?;
        self.derivative_view = Some(view);
        self.stage = Stage::Ready;
        self.pickers.actions = Visibility::Shown;
        Ok((view, snapshot))
    }

    /// Confirm the graph request and reset the cascade.
    ///
    /// The patient list is kept; everything downstream is cleared and hidden.
    pub fn take_graph_request(&mut self) -> Result<GraphRequest, SelectionError> {
        self.require(Stage::Ready, "request a graph")?;
        let snapshot = self.snapshot()?;
        self.reset();
        Ok(GraphRequest {
            reading_id: snapshot.reading_id,
            laterality: snapshot.laterality,
        })
    }

    /// Populate every picker from navigation parameters and land in `Ready`
    /// with the derivative view on "All Data".
    pub fn enter_deep_link(
        &mut self,
        patient_num: &str,
        readings: Vec<Reading>,
        reading_id: i64,
        laterality: Laterality,
    ) -> Result<ExportSnapshot, SelectionError> {
        let patient = self
            .patients
            .iter()
            .position(|p| p == patient_num)
            .ok_or_else(|| {
                SelectionError::InvalidDeepLink(format!("patient {} is not listed", patient_num))
            })?;
        let reading = readings
            .iter()
            .position(|r| r.id == reading_id)
            .ok_or_else(|| {
                SelectionError::InvalidDeepLink(format!(
                    "reading {} is not among the readings of patient {}",
                    reading_id, patient_num
                ))
            })?;
        let lateralities = readings[reading].laterality.choices();
        let laterality_index = lateralities
            .iter()
            .position(|l| *l == laterality)
            .ok_or_else(|| {
                SelectionError::InvalidDeepLink(format!(
                    "reading {} was not recorded as {}",
                    reading_id, laterality
                ))
            })?;

        self.ticket += 1;
        self.patient = Some(patient);
        self.readings = readings;
        self.reading = Some(reading);
        self.lateralities = lateralities;
        self.laterality = Some(laterality_index);
        self.derivative_view = Some(DerivativeView::AllData);
        self.stage = Stage::Ready;
        self.pickers = Pickers::all_shown();
        self.snapshot()
    }

    /// Back to `NoPatient` with every picker hidden; the patient list stays.
    pub fn reset(&mut self) {
        self.clear_from_reading();
        self.ticket += 1;
        self.patient = None;
        self.stage = Stage::NoPatient;
        self.pickers = Pickers::default();
    }

    fn clear_from_reading(&mut self) {
        self.readings.clear();
        self.lateralities.clear();
        self.reading = None;
        self.laterality = None;
        self.derivative_view = None;
    }

    fn require(&self, stage: Stage, action: &'static str) -> Result<(), SelectionError> {
        if self.stage < stage {
            return Err(SelectionError::OutOfOrder {
                action,
                stage: self.stage,
            });
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<ExportSnapshot, SelectionError> {
        match (
            self.selected_patient(),
            self.selected_reading(),
            self.selected_laterality(),
        ) {
            (Some(patient), Some(reading), Some(laterality)) => Ok(ExportSnapshot {
                reading_id: reading.id,
                patient_num: patient.to_string(),
                laterality,
            }),
            _ => Err(SelectionError::OutOfOrder {
                action: "snapshot the selection",
                stage: self.stage,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: i64, patient: &str, laterality: Laterality) -> Reading {
        Reading {
            id,
            patient_num: patient.to_string(),
            laterality,
            date_created: format!("2022-03-{:02} 10:00:00", id % 28 + 1),
        }
    }

    fn p1_readings() -> Vec<Reading> {
        vec![
            reading(5, "P1", Laterality::LeftArm),
            reading(42, "P1", Laterality::Bilateral),
        ]
    }

    fn with_patients() -> Selection {
        let mut selection = Selection::new();
        selection.set_patients(vec!["P1".to_string(), "P2".to_string()]);
        selection
    }

    /// Drive a fresh selection up to `stage`.
    fn at_stage(stage: Stage) -> Selection {
        let mut selection = with_patients();
        if stage >= Stage::PatientSelected {
            let (ticket, _) = selection.select_patient(0).unwrap();
            assert!(selection.load_readings(ticket, p1_readings()));
        }
        if stage >= Stage::ReadingSelected {
            selection.select_reading(1).unwrap();
        }
        if stage >= Stage::LateralitySelected {
            selection.select_laterality(2).unwrap();
        }
        if stage >= Stage::Ready {
            selection.select_derivative_view(0).unwrap();
        }
        assert_eq!(selection.stage(), stage);
        selection
    }

    #[test]
    fn test_full_cascade() {
        let mut selection = with_patients();
        assert_eq!(selection.pickers(), Pickers::default());

        let (ticket, patient) = selection.select_patient(0).unwrap();
        assert_eq!(patient, "P1");
        assert_eq!(selection.pickers().reading, Visibility::Shown);
        assert!(selection.load_readings(ticket, p1_readings()));

        selection.select_reading(1).unwrap();
        assert_eq!(selection.pickers().laterality, Visibility::Shown);
        selection.select_laterality(1).unwrap();
        assert_eq!(selection.derivative_view(), Some(DerivativeView::AllData));
        assert_eq!(selection.pickers().derivative, Visibility::Shown);
        assert_eq!(selection.pickers().actions, Visibility::Hidden);

        let (view, snapshot) = selection.select_derivative_view(2).unwrap();
        assert_eq!(view, DerivativeView::FirstDerivativeOnly);
        assert_eq!(selection.stage(), Stage::Ready);
        assert_eq!(selection.pickers().actions, Visibility::Shown);
        assert_eq!(
            snapshot,
            ExportSnapshot {
                reading_id: 42,
                patient_num: "P1".to_string(),
                laterality: Laterality::RightArm,
            }
        );
    }

    #[test]
    fn test_reading_options_are_newest_first() {
        let selection = at_stage(Stage::PatientSelected);
        let options = selection.reading_options();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, 1);
        assert!(options[0].label.starts_with("ID: 42 "));
        assert_eq!(options[1].value, 0);
        assert!(options[1].label.starts_with("ID: 5 "));
    }

    #[test]
    fn test_laterality_options_follow_stored_laterality() {
        let mut selection = at_stage(Stage::PatientSelected);
        selection.select_reading(1).unwrap();
        assert_eq!(
            selection.lateralities(),
            &[
                Laterality::LeftArm,
                Laterality::RightArm,
                Laterality::Bilateral
            ]
        );
        selection.select_reading(0).unwrap();
        assert_eq!(selection.lateralities(), &[Laterality::LeftArm]);
        let labels: Vec<String> = selection
            .laterality_options()
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["LEFT_ARM"]);
    }

    #[test]
    fn test_new_patient_clears_downstream_from_every_stage() {
        for stage in [
            Stage::NoPatient,
            Stage::PatientSelected,
            Stage::ReadingSelected,
            Stage::LateralitySelected,
            Stage::Ready,
        ] {
            let mut selection = at_stage(stage);
            selection.select_patient(1).unwrap();
            assert_eq!(selection.stage(), Stage::PatientSelected, "from {:?}", stage);
            assert_eq!(selection.selected_patient(), Some("P2"));
            assert_eq!(selection.reading_index(), None);
            assert_eq!(selection.laterality_index(), None);
            assert_eq!(selection.derivative_view(), None);
            assert!(selection.readings().is_empty());
            assert!(selection.lateralities().is_empty());
            assert_eq!(selection.pickers().laterality, Visibility::Hidden);
            assert_eq!(selection.pickers().actions, Visibility::Hidden);
        }
    }

    #[test]
    fn test_superseded_readings_are_ignored() {
        let mut selection = with_patients();
        let (stale, _) = selection.select_patient(0).unwrap();
        let (current, _) = selection.select_patient(1).unwrap();
        assert!(!selection.load_readings(stale, p1_readings()));
        assert!(selection.readings().is_empty());
        assert!(selection.load_readings(current, vec![reading(7, "P2", Laterality::RightArm)]));
        assert_eq!(selection.readings().len(), 1);
    }

    #[test]
    fn test_out_of_order_picks_are_rejected() {
        let mut selection = with_patients();
        assert!(matches!(
            selection.select_reading(0),
            Err(SelectionError::OutOfOrder { .. })
        ));
        selection.select_patient(0).unwrap();
        assert_eq!(selection.select_reading(0), Err(SelectionError::ReadingsNotLoaded));
        assert!(matches!(
            selection.select_laterality(0),
            Err(SelectionError::OutOfOrder { .. })
        ));
        assert!(matches!(
            selection.take_graph_request(),
            Err(SelectionError::OutOfOrder { .. })
        ));
        assert!(matches!(
            selection.select_patient(9),
            Err(SelectionError::InvalidIndex { len: 2, .. })
        ));
    }

    #[test]
    fn test_undefined_derivative_index_changes_nothing() {
        let mut selection = at_stage(Stage::Ready);
        selection.select_derivative_view(3).unwrap();
        let err = selection.select_derivative_view(4).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidIndex { index: 4, .. }));
        assert_eq!(
            selection.derivative_view(),
            Some(DerivativeView::SecondDerivativeOnly)
        );
        assert_eq!(selection.stage(), Stage::Ready);
    }

    #[test]
    fn test_graph_request_resets_but_keeps_patients() {
        let mut selection = at_stage(Stage::Ready);
        let request = selection.take_graph_request().unwrap();
        assert_eq!(
            request,
            GraphRequest {
                reading_id: 42,
                laterality: Laterality::Bilateral
            }
        );
        assert_eq!(selection.stage(), Stage::NoPatient);
        assert_eq!(selection.pickers(), Pickers::default());
        assert_eq!(selection.patient_index(), None);
        assert_eq!(selection.patients().len(), 2);
    }

    #[test]
    fn test_deep_link_lands_ready() {
        let mut selection = with_patients();
        let snapshot = selection
            .enter_deep_link("P1", p1_readings(), 5, Laterality::LeftArm)
            .unwrap();
        assert_eq!(selection.stage(), Stage::Ready);
        assert_eq!(selection.patient_index(), Some(0));
        assert_eq!(selection.reading_index(), Some(0));
        assert_eq!(selection.laterality_index(), Some(0));
        assert_eq!(selection.derivative_view(), Some(DerivativeView::AllData));
        assert_eq!(selection.pickers(), Pickers::all_shown());
        assert_eq!(snapshot.reading_id, 5);

        // every picker stays usable afterwards
        selection.select_reading(1).unwrap();
        assert_eq!(selection.lateralities().len(), 3);
    }

    #[test]
    fn test_deep_link_rejects_mismatches() {
        let mut selection = with_patients();
        assert!(matches!(
            selection.enter_deep_link("P1", p1_readings(), 99, Laterality::LeftArm),
            Err(SelectionError::InvalidDeepLink(_))
        ));
        assert!(matches!(
            selection.enter_deep_link("P1", p1_readings(), 5, Laterality::Bilateral),
            Err(SelectionError::InvalidDeepLink(_))
        ));
        assert!(matches!(
            selection.enter_deep_link("P9", p1_readings(), 5, Laterality::LeftArm),
            Err(SelectionError::InvalidDeepLink(_))
        ));
        assert_eq!(selection.stage(), Stage::NoPatient);
    }

    #[test]
    fn test_derivative_options() {
        let labels: Vec<String> = Selection::new()
            .derivative_options()
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(
            labels,
            vec!["All Data", "Raw Data", "1st Derivative", "2nd Derivative"]
        );
    }
}
