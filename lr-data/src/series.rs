//! Partitioning of sample rows into the four chart series.
//!
//! Slot layout is fixed: primary raw (left arm or the single requested arm),
//! right raw, 1st derivative, 2nd derivative. Points keep fetch order; no
//! sorting is performed.

use log::debug;
use lr_core::{Derivative, Laterality, Sample};
use serde::{Deserialize, Serialize};

pub const PRIMARY: usize = 0;
pub const RIGHT: usize = 1;
pub const FIRST_DERIVATIVE: usize = 2;
pub const SECOND_DERIVATIVE: usize = 3;

/// Legend label of the primary slot before anything has been fetched.
pub const UNSET_LABEL: &str = "N/A";

/// One chart point: x = record time in seconds, y = ppg value.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<&Sample> for Point {
    fn from(sample: &Sample) -> Self {
        Point {
            x: sample.record_time,
            y: sample.ppg_val,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<Point>,
    pub hidden: bool,
}

impl Series {
    fn empty(label: &str) -> Self {
        Series {
            label: label.to_string(),
            points: Vec::new(),
            hidden: false,
        }
    }
}

/// How a single batch of rows is to be split.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AssemblyMode {
    /// Rows of one arm; raw rows of that arm fill the primary slot.
    Unilateral(Laterality),
    /// Rows of both arms in one batch; left raw fills the primary slot,
    /// right raw the right slot.
    Bilateral,
}

/// The part one sample fetch plays in filling the chart.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FetchRole {
    /// The only fetch of a unilateral graph, for the given arm
    Single(Laterality),
    /// The LEFT_ARM half of a bilateral graph
    BilateralLeft,
    /// The RIGHT_ARM half of a bilateral graph
    BilateralRight,
}

impl FetchRole {
    /// Fetches needed to graph a laterality choice.
    pub fn plan(choice: Laterality) -> Vec<FetchRole> {
        match choice {
            Laterality::Bilateral => vec![FetchRole::BilateralLeft, FetchRole::BilateralRight],
            arm => vec![FetchRole::Single(arm)],
        }
    }

    /// The arm whose samples this fetch requests.
    pub fn laterality(&self) -> Laterality {
        match self {
            FetchRole::Single(arm) => *arm,
            FetchRole::BilateralLeft => Laterality::LeftArm,
            FetchRole::BilateralRight => Laterality::RightArm,
        }
    }
}

/// The four chart series, rebuilt from samples on every fetch.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SeriesSet {
    slots: [Series; 4],
}

impl Default for SeriesSet {
    fn default() -> Self {
        SeriesSet {
            slots: [
                Series::empty(UNSET_LABEL),
                Series::empty(Laterality::RightArm.series_label()),
                Series::empty("1st Derivative"),
                Series::empty("2nd Derivative"),
            ],
        }
    }
}

impl SeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Series; 4] {
        &self.slots
    }

    pub fn primary(&self) -> &Series {
        &self.slots[PRIMARY]
    }

    pub fn right(&self) -> &Series {
        &self.slots[RIGHT]
    }

    pub fn first_derivative(&self) -> &Series {
        &self.slots[FIRST_DERIVATIVE]
    }

    pub fn second_derivative(&self) -> &Series {
        &self.slots[SECOND_DERIVATIVE]
    }

    /// Total number of points across all slots.
    pub fn point_count(&self) -> usize {
        self.slots.iter().map(|s| s.points.len()).sum()
    }

    /// Drop every slot's points, keeping labels and visibility.
    pub fn clear_points(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.points.clear();
        }
    }

    pub fn hidden_flags(&self) -> [bool; 4] {
        [
            self.slots[PRIMARY].hidden,
            self.slots[RIGHT].hidden,
            self.slots[FIRST_DERIVATIVE].hidden,
            self.slots[SECOND_DERIVATIVE].hidden,
        ]
    }

    pub fn set_hidden(&mut self, flags: [bool; 4]) {
        for (slot, hidden) in self.slots.iter_mut().zip(flags) {
            slot.hidden = hidden;
        }
    }

    /// Fold one fetch's rows into the chart.
    ///
    /// Only the raw slot owned by `role` is touched, so the halves of a
    /// bilateral graph may arrive in either order. Derivative slots are
    /// overwritten by every fetch: with two fetches the later one wins.
    pub fn apply_fetch(&mut self, role: FetchRole, samples: &[Sample]) {
        match role {
            FetchRole::Single(arm) => self.write_raw(PRIMARY, arm, samples),
            FetchRole::BilateralLeft => self.write_raw(PRIMARY, Laterality::LeftArm, samples),
            FetchRole::BilateralRight => self.write_raw(RIGHT, Laterality::RightArm, samples),
        }
        self.write_derivatives(samples);
    }

    fn write_raw(&mut self, slot: usize, arm: Laterality, samples: &[Sample]) {
        let points: Vec<Point> = samples
            .iter()
            .filter(|s| s.is_raw() && s.laterality == arm)
            .map(Point::from)
            .collect();
        let skipped = samples.iter().filter(|s| s.is_raw()).count() - points.len();
        if skipped > 0 {
            debug!("Dropped {} raw rows not tagged {}", skipped, arm);
        }
        self.slots[slot].label = arm.series_label().to_string();
        self.slots[slot].points = points;
    }

    fn write_derivatives(&mut self, samples: &[Sample]) {
        self.slots[FIRST_DERIVATIVE].points = derivative_points(samples, Derivative::First);
        self.slots[SECOND_DERIVATIVE].points = derivative_points(samples, Derivative::Second);
    }
}

fn derivative_points(samples: &[Sample], order: Derivative) -> Vec<Point> {
    samples
        .iter()
        .filter(|s| s.order() == Some(order))
        .map(Point::from)
        .collect()
}

/// Split one batch of rows into the four series.
///
/// For a chart whose fetches land one at a time, fold each into a
/// `SeriesSet` with [`SeriesSet::apply_fetch`] instead.
///
/// Rows with a derivative tag outside 0..=2 are dropped, as are raw rows of
/// an arm that has no slot in `mode`.
pub fn assemble(samples: &[Sample], mode: AssemblyMode) -> SeriesSet {
    let mut set = SeriesSet::new();
    match mode {
        AssemblyMode::Unilateral(arm) => set.apply_fetch(FetchRole::Single(arm), samples),
        AssemblyMode::Bilateral => {
            set.write_raw(PRIMARY, Laterality::LeftArm, samples);
            set.write_raw(RIGHT, Laterality::RightArm, samples);
            set.write_derivatives(samples);
        }
    }
    set
}

/// Build the chart of a bilateral graph from its two fetches, applied left
/// then right.
pub fn assemble_bilateral(left: &[Sample], right: &[Sample]) -> SeriesSet {
    let mut set = SeriesSet::new();
    set.apply_fetch(FetchRole::BilateralLeft, left);
    set.apply_fetch(FetchRole::BilateralRight, right);
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64, v: f64, laterality: Laterality, derivative: i32) -> Sample {
        Sample {
            record_time: t,
            ppg_val: v,
            laterality,
            derivative,
        }
    }

    fn mixed_batch() -> Vec<Sample> {
        vec![
            sample(0.00, 10.0, Laterality::LeftArm, 0),
            sample(0.00, 20.0, Laterality::RightArm, 0),
            sample(0.02, 11.0, Laterality::LeftArm, 0),
            sample(0.00, 1.0, Laterality::LeftArm, 1),
            sample(0.00, 0.1, Laterality::RightArm, 2),
            sample(0.00, 9.0, Laterality::LeftArm, 3),
            sample(0.02, 21.0, Laterality::RightArm, 0),
            sample(0.02, 2.0, Laterality::RightArm, 1),
        ]
    }

    #[test]
    fn test_bilateral_batch_partitions_each_row_once() {
        let samples = mixed_batch();
        let set = assemble(&samples, AssemblyMode::Bilateral);
        assert_eq!(
            set.primary().points,
            vec![Point { x: 0.0, y: 10.0 }, Point { x: 0.02, y: 11.0 }]
        );
        assert_eq!(
            set.right().points,
            vec![Point { x: 0.0, y: 20.0 }, Point { x: 0.02, y: 21.0 }]
        );
        assert_eq!(
            set.first_derivative().points,
            vec![Point { x: 0.0, y: 1.0 }, Point { x: 0.02, y: 2.0 }]
        );
        assert_eq!(set.second_derivative().points, vec![Point { x: 0.0, y: 0.1 }]);
        // 8 rows in, one with derivative 3 dropped
        assert_eq!(set.point_count(), 7);
    }

    #[test]
    fn test_unilateral_keeps_raw_rows_of_requested_arm() {
        let samples = mixed_batch();
        let set = assemble(&samples, AssemblyMode::Unilateral(Laterality::RightArm));
        assert_eq!(set.primary().label, "Right Arm");
        assert_eq!(
            set.primary().points,
            vec![Point { x: 0.0, y: 20.0 }, Point { x: 0.02, y: 21.0 }]
        );
        assert!(set.right().points.is_empty());
        assert_eq!(set.first_derivative().points.len(), 2);
        assert_eq!(set.second_derivative().points.len(), 1);
    }

    #[test]
    fn test_fetch_order_is_preserved() {
        let samples = vec![
            sample(0.04, 3.0, Laterality::LeftArm, 0),
            sample(0.00, 1.0, Laterality::LeftArm, 0),
            sample(0.02, 2.0, Laterality::LeftArm, 0),
        ];
        let set = assemble(&samples, AssemblyMode::Unilateral(Laterality::LeftArm));
        let xs: Vec<f64> = set.primary().points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.04, 0.0, 0.02]);
    }

    #[test]
    fn test_bilateral_later_fetch_wins_derivative_slots() {
        let left = vec![
            sample(0.0, 100.0, Laterality::LeftArm, 0),
            sample(0.0, 5.0, Laterality::LeftArm, 1),
            sample(0.0, 0.5, Laterality::LeftArm, 2),
        ];
        let right = vec![
            sample(0.0, 200.0, Laterality::RightArm, 0),
            sample(0.0, 7.0, Laterality::RightArm, 1),
        ];
        let set = assemble_bilateral(&left, &right);
        assert_eq!(set.primary().label, "Left Arm");
        assert_eq!(set.primary().points, vec![Point { x: 0.0, y: 100.0 }]);
        assert_eq!(set.right().points, vec![Point { x: 0.0, y: 200.0 }]);
        assert_eq!(set.first_derivative().points, vec![Point { x: 0.0, y: 7.0 }]);
        assert!(set.second_derivative().points.is_empty());
    }

    #[test]
    fn test_bilateral_halves_in_either_order() {
        let left = vec![sample(0.0, 100.0, Laterality::LeftArm, 0)];
        let right = vec![sample(0.0, 200.0, Laterality::RightArm, 0)];
        let mut set = SeriesSet::new();
        set.apply_fetch(FetchRole::BilateralRight, &right);
        assert_eq!(set.primary().points.len(), 0);
        set.apply_fetch(FetchRole::BilateralLeft, &left);
        assert_eq!(set.primary().points, vec![Point { x: 0.0, y: 100.0 }]);
        assert_eq!(set.right().points, vec![Point { x: 0.0, y: 200.0 }]);
    }

    #[test]
    fn test_empty_batch_gives_empty_series() {
        let set = assemble(&[], AssemblyMode::Unilateral(Laterality::LeftArm));
        assert_eq!(set.point_count(), 0);
        assert_eq!(set.primary().label, "Left Arm");
    }

    #[test]
    fn test_clear_points_keeps_labels_and_visibility() {
        let mut set = assemble(&mixed_batch(), AssemblyMode::Bilateral);
        set.set_hidden([false, false, true, true]);
        set.clear_points();
        assert_eq!(set.point_count(), 0);
        assert_eq!(set.primary().label, "Left Arm");
        assert_eq!(set.hidden_flags(), [false, false, true, true]);
    }

    #[test]
    fn test_fetch_plan() {
        assert_eq!(
            FetchRole::plan(Laterality::Bilateral),
            vec![FetchRole::BilateralLeft, FetchRole::BilateralRight]
        );
        assert_eq!(
            FetchRole::plan(Laterality::LeftArm),
            vec![FetchRole::Single(Laterality::LeftArm)]
        );
        assert_eq!(FetchRole::BilateralRight.laterality(), Laterality::RightArm);
    }

    #[test]
    fn test_new_set_defaults() {
        let set = SeriesSet::new();
        let labels: Vec<&str> = set.slots().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["N/A", "Right Arm", "1st Derivative", "2nd Derivative"]);
        assert_eq!(set.hidden_flags(), [false; 4]);
    }
}
