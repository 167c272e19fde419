use serde::{Deserialize, Serialize};

/// Which of the four chart series are shown.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum DerivativeView {
    #[default]
    AllData,
    RawOnly,
    FirstDerivativeOnly,
    SecondDerivativeOnly,
}

impl DerivativeView {
    /// Picker order; the index of a view is its option value.
    pub const ALL: [DerivativeView; 4] = [
        DerivativeView::AllData,
        DerivativeView::RawOnly,
        DerivativeView::FirstDerivativeOnly,
        DerivativeView::SecondDerivativeOnly,
    ];

    pub fn from_index(index: usize) -> Option<DerivativeView> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            DerivativeView::AllData => 0,
            DerivativeView::RawOnly => 1,
            DerivativeView::FirstDerivativeOnly => 2,
            DerivativeView::SecondDerivativeOnly => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DerivativeView::AllData => "All Data",
            DerivativeView::RawOnly => "Raw Data",
            DerivativeView::FirstDerivativeOnly => "1st Derivative",
            DerivativeView::SecondDerivativeOnly => "2nd Derivative",
        }
    }

    /// Hidden flags for [primary raw, right raw, 1st derivative, 2nd derivative].
    pub fn hidden_flags(&self) -> [bool; 4] {
        match self {
            DerivativeView::AllData => [false, false, false, false],
            DerivativeView::RawOnly => [false, false, true, true],
            DerivativeView::FirstDerivativeOnly => [true, true, false, true],
            DerivativeView::SecondDerivativeOnly => [true, true, true, false],
        }
    }
}
