use crate::laterality::Laterality;
use serde::{Deserialize, Serialize};

/// Derivative order of a sample row.
///
/// Derivative rows are precomputed by the backend and stored alongside the
/// raw rows; nothing is differentiated client-side.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Derivative {
    Raw,
    First,
    Second,
}

impl Derivative {
    /// Map the backend's integer tag; anything outside 0..=2 is `None`.
    pub fn from_tag(tag: i32) -> Option<Derivative> {
        match tag {
            0 => Some(Derivative::Raw),
            1 => Some(Derivative::First),
            2 => Some(Derivative::Second),
            _ => None,
        }
    }
}

/// One timestamped value row within a reading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the start of the recording
    pub record_time: f64,
    pub ppg_val: f64,
    pub laterality: Laterality,
    /// 0 = raw, 1 = first derivative, 2 = second derivative
    pub derivative: i32,
}

impl Sample {
    pub fn order(&self) -> Option<Derivative> {
        Derivative::from_tag(self.derivative)
    }

    pub fn is_raw(&self) -> bool {
        self.order() == Some(Derivative::Raw)
    }
}
