//! Classification result types.
//!
//! Represents the output of the pre-trained diabetes classifier.

use serde::{Deserialize, Serialize};

/// Text shown before the first classification request.
pub const PLACEHOLDER: &str = "Press below to execute the classification";

/// Legend listing every class the model can produce.
pub const POSSIBLE_CLASSES: &str = "Possible classes: [0:NO DIABETES], [1:WITH DIABETES]";

/// Lookup table indexed by class label.
const CLASS_TEXT: [&str; 2] = ["NO DIABETES", "WITH DIABETES"];

/// Binary outcome predicted by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassLabel {
    /// Outcome 0
    NoDiabetes,
    /// Outcome 1
    WithDiabetes,
}

impl ClassLabel {
    /// Numeric label as used in the dataset's `Outcome` column.
    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Self::NoDiabetes => 0,
            Self::WithDiabetes => 1,
        }
    }

    /// Fixed human-readable text for the label.
    #[must_use]
    pub fn text(self) -> &'static str {
        CLASS_TEXT[self.value() as usize]
    }
}

impl TryFrom<i64> for ClassLabel {
    type Error = i64;

    /// Only 0 and 1 are valid; anything else is handed back as the error.
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoDiabetes),
            1 => Ok(Self::WithDiabetes),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.value(), self.text())
    }
}

/// Result of one classification request. Created per click, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: ClassLabel,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Prediction {
    #[must_use]
    pub fn new(label: ClassLabel) -> Self {
        Self {
            label,
            created_at: chrono::Utc::now(),
        }
    }

    /// Message displayed in the result area.
    #[must_use]
    pub fn message(&self) -> String {
        format!("The predicted class of the input data is: [{}]", self.label)
    }
}
