//! Clinical feature types for diabetes classification.
//!
//! Based on the Pima Indians diabetes dataset layout.

use serde::{Deserialize, Serialize};

/// Number of features consumed by the classifier.
pub const FEATURE_COUNT: usize = 8;

/// Column names the model was trained against, in vector order.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// Name of the binary class column in the reference dataset.
pub const OUTCOME_COLUMN: &str = "Outcome";

/// Bounds, step and initial value of one slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

/// Decimal places kept after slider arithmetic. Enough for every step in use.
const SLIDER_PRECISION: f64 = 1e6;

/// Fraction of a step treated as already on the grid.
const GRID_TOLERANCE: f64 = 1e-9;

impl SliderSpec {
    /// Snap a raw value onto the step grid inside `[min, max]` and strip
    /// floating point noise. Non-finite input falls back to the default.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        let steps = ((value - self.min) / self.step).round();
        self.at_step(steps)
    }

    /// Next grid value strictly above `value`.
    #[must_use]
    pub fn step_up(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step + GRID_TOLERANCE).floor() + 1.0;
        self.at_step(steps)
    }

    /// Next grid value strictly below `value`.
    #[must_use]
    pub fn step_down(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step - GRID_TOLERANCE).ceil() - 1.0;
        self.at_step(steps)
    }

    fn at_step(&self, steps: f64) -> f64 {
        let value = (self.min + steps * self.step).clamp(self.min, self.max);
        (value * SLIDER_PRECISION).round() / SLIDER_PRECISION
    }

    /// All values reachable from `min` by whole steps.
    #[must_use]
    pub fn grid(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count)
            .map(|i| self.normalize(self.min + i as f64 * self.step))
            .collect()
    }
}

/// One of the eight clinical measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

impl Feature {
    /// All features in vector order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
        Feature::DiabetesPedigreeFunction,
        Feature::Age,
    ];

    /// Position of the feature inside a [`FeatureVector`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Dataset/model column name.
    #[must_use]
    pub fn column(self) -> &'static str {
        FEATURE_COLUMNS[self.index()]
    }

    /// Look up a feature by its column name.
    #[must_use]
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }

    /// Human-readable label with units.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pregnancies => "Pregnancies (#)",
            Self::Glucose => "Glucose (GTT)",
            Self::BloodPressure => "Diastolic Blood Pressure (mm Hg)",
            Self::SkinThickness => "Triceps Skin Thickness (mm)",
            Self::Insulin => "Serum Insulin (uU/mL)",
            Self::Bmi => "BMI (kg/m²)",
            Self::DiabetesPedigreeFunction => "Diabetes Pedigree Function",
            Self::Age => "Age (years)",
        }
    }

    /// Slider configuration for this feature.
    #[must_use]
    pub fn slider(self) -> SliderSpec {
        let (min, max, step, default) = match self {
            Self::Pregnancies => (0.0, 20.0, 1.0, 1.0),
            Self::Glucose => (30.0, 200.0, 2.0, 120.0),
            Self::BloodPressure => (40.0, 150.0, 1.0, 72.0),
            Self::SkinThickness => (0.0, 100.0, 1.0, 32.0),
            Self::Insulin => (0.0, 300.0, 2.0, 30.0),
            Self::Bmi => (10.0, 60.0, 0.5, 32.0),
            Self::DiabetesPedigreeFunction => (0.0, 3.0, 0.05, 0.37),
            Self::Age => (20.0, 90.0, 1.0, 29.0),
        };
        SliderSpec {
            min,
            max,
            step,
            default,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Text shown next to a slider for its current value.
///
/// `f64`'s `Display` is the shortest string that parses back to the same
/// value, so `120.0` renders as `120` and `0.37` as `0.37`.
#[must_use]
pub fn echo_label(value: f64) -> String {
    value.to_string()
}

/// Ordered measurements describing one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Build a vector from values already in column order.
    #[must_use]
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Vector holding every slider's initial value.
    #[must_use]
    pub fn defaults() -> Self {
        Self::new(Feature::ALL.map(|f| f.slider().default))
    }

    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Value for a dataset column, if the column is one of the features.
    #[must_use]
    pub fn value_of(&self, column: &str) -> Option<f64> {
        Feature::from_column(column).map(|f| self.get(f))
    }

    #[must_use]
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// One-row table with the exact column names the model expects.
    #[must_use]
    pub fn to_row(&self) -> FeatureRow {
        FeatureRow {
            columns: FEATURE_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            values: self.values.to_vec(),
        }
    }
}

/// A single named row handed to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

impl FeatureRow {
    /// Value of a named column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i).copied())
    }
}
