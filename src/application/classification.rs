//! Classification service: Runs the pre-trained model on one sample.

use std::sync::Arc;

use crate::domain::{ClassLabel, FeatureVector, Prediction};
use crate::ports::{check_schema, Classifier};
use crate::GlycoviewError;

/// Service wrapping the injected, read-only classifier.
pub struct ClassificationService<C>
where
    C: Classifier,
{
    classifier: Arc<C>,
}

impl<C> Clone for ClassificationService<C>
where
    C: Classifier,
{
    fn clone(&self) -> Self {
        Self {
            classifier: Arc::clone(&self.classifier),
        }
    }
}

impl<C> ClassificationService<C>
where
    C: Classifier,
{
    /// Create a new classification service.
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    /// Classify one feature vector.
    ///
    /// The row handed to the model always carries the canonical column
    /// names; a model trained on a different schema is reported as an
    /// error rather than silently fed misaligned values.
    ///
    /// # Errors
    /// Returns error on schema mismatch, model failure, or a label other
    /// than 0/1.
    pub fn classify(&self, features: &FeatureVector) -> Result<Prediction, GlycoviewError> {
        let row = features.to_row();
        check_schema(self.classifier.feature_names(), &row)?;

        tracing::debug!("Classifying row {:?}", row.values);
        let raw = self.classifier.predict(&row)?;
        let label = ClassLabel::try_from(raw).map_err(GlycoviewError::InvalidLabel)?;
        let prediction = Prediction::new(label);

        tracing::info!("Classification complete: class={}", prediction.label);
        Ok(prediction)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{FeatureRow, FEATURE_COLUMNS};
    use crate::ports::ClassifierError;
    use std::sync::Mutex;

    /// Classifier that returns a fixed label and records every row it sees.
    pub(crate) struct StubClassifier {
        pub columns: Vec<String>,
        pub label: i64,
        pub seen: Mutex<Vec<FeatureRow>>,
    }

    impl StubClassifier {
        pub(crate) fn returning(label: i64) -> Self {
            Self {
                columns: FEATURE_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
                label,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Classifier for StubClassifier {
        fn feature_names(&self) -> &[String] {
            &self.columns
        }

        fn predict(&self, row: &FeatureRow) -> Result<i64, ClassifierError> {
            self.seen.lock().expect("lock").push(row.clone());
            Ok(self.label)
        }
    }

    #[test]
    fn test_default_vector_reaches_model_in_column_order() {
        let stub = Arc::new(StubClassifier::returning(1));
        let service = ClassificationService::new(stub.clone());

        let prediction = service
            .classify(&FeatureVector::defaults())
            .expect("Should classify");
        assert_eq!(prediction.label, ClassLabel::WithDiabetes);

        let seen = stub.seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].columns, FEATURE_COLUMNS.to_vec());
        assert_eq!(
            seen[0].values,
            vec![1.0, 120.0, 72.0, 32.0, 30.0, 32.0, 0.37, 29.0]
        );
    }

    #[test]
    fn test_every_call_reaches_the_model() {
        let stub = Arc::new(StubClassifier::returning(0));
        let service = ClassificationService::new(stub.clone());
        let v = FeatureVector::defaults();

        let first = service.classify(&v).expect("Should classify").label;
        let second = service.classify(&v).expect("Should classify").label;
        assert_eq!(first, second);
        assert_eq!(stub.seen.lock().expect("lock").len(), 2);
    }

    #[test]
    fn test_rejects_out_of_range_label() {
        let service = ClassificationService::new(Arc::new(StubClassifier::returning(3)));
        let err = service.classify(&FeatureVector::defaults()).unwrap_err();
        assert!(matches!(err, GlycoviewError::InvalidLabel(3)));
    }

    #[test]
    fn test_schema_mismatch_never_calls_model() {
        let mut stub = StubClassifier::returning(1);
        stub.columns.reverse();
        let stub = Arc::new(stub);
        let service = ClassificationService::new(stub.clone());

        let err = service.classify(&FeatureVector::defaults()).unwrap_err();
        assert!(matches!(
            err,
            GlycoviewError::Classification(ClassifierError::SchemaMismatch { .. })
        ));
        assert!(stub.seen.lock().expect("lock").is_empty());
    }
}
