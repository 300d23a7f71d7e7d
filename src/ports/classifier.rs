//! Classifier port: Trait for the pre-trained prediction model.
//!
//! This trait abstracts the exported model from the application logic so the
//! dashboard can be driven by a stub in tests.

use crate::domain::FeatureRow;

/// Errors raised while running a prediction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("Column mismatch: model expects [{expected}], got [{actual}]")]
    SchemaMismatch { expected: String, actual: String },

    #[error("Feature {column} is not a finite number: {value}")]
    NonFiniteFeature { column: String, value: f64 },

    #[error("Model evaluation failed: {0}")]
    Evaluation(String),
}

/// A trained binary classifier.
///
/// Implementations are immutable after construction; `predict` must be
/// deterministic for a given row.
pub trait Classifier: Send + Sync {
    /// Column names the model was trained on, in order.
    fn feature_names(&self) -> &[String];

    /// Predict the class label of a single row.
    ///
    /// Returns the raw label from the model. Mapping it onto the known
    /// classes is the caller's job.
    ///
    /// # Errors
    /// Returns `ClassifierError` if the row cannot be evaluated.
    fn predict(&self, row: &FeatureRow) -> Result<i64, ClassifierError>;
}

/// Check that a row carries exactly the columns a model expects, in order.
///
/// # Errors
/// Returns `ClassifierError::SchemaMismatch` on any difference.
pub fn check_schema(expected: &[String], row: &FeatureRow) -> Result<(), ClassifierError> {
    if expected == row.columns.as_slice() && row.columns.len() == row.values.len() {
        return Ok(());
    }
    Err(ClassifierError::SchemaMismatch {
        expected: expected.join(", "),
        actual: row.columns.join(", "),
    })
}
