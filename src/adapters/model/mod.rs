//! Exported model adapter: Implementation of Classifier.
//!
//! Loads a classifier exported from the Python training notebook as JSON.
//!
//! # Supported estimators
//!
//! - `logistic_regression`: coefficients, intercept and an optional standard
//!   scaler (`mean`, `scale`), thresholded on the positive-class probability
//! - `decision_tree`: the flattened `tree_` arrays of a scikit-learn CART
//!   tree (`children_left`, `children_right`, `feature`, `threshold`, `value`)
//!
//! # Integrity
//!
//! When a `manifest.json` sits next to the model file it must bind the model
//! file name to its SHA-256 digest. Loading can be configured to require it.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::FeatureRow;
use crate::ports::{check_schema, Classifier, ClassifierError};

/// Only supported export format version.
const FORMAT_VERSION: u32 = 1;

/// Manifest file looked up in the model's directory.
const MANIFEST_FILE: &str = "manifest.json";

/// Error type for model loading.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model format in {path:?}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Model integrity check failed: {0}")]
    Integrity(String),

    #[error("Invalid model: {0}")]
    Invalid(String),
}

/// Model parameters exported by the training notebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedModel {
    pub format_version: u32,
    pub feature_names: Vec<String>,
    /// Class labels in the estimator's output order
    pub classes: Vec<i64>,
    pub estimator: Estimator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default)]
        scaler: Option<StandardScaler>,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    DecisionTree {
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        /// Per-node class weights, one entry per class
        value: Vec<Vec<f64>>,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct ModelManifest {
    version: u32,
    files: BTreeMap<String, String>,
}

fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Classifier backed by an [`ExportedModel`].
#[derive(Debug, Clone)]
pub struct ExportedModelAdapter {
    model: ExportedModel,
}

impl ExportedModelAdapter {
    /// Wrap already parsed parameters.
    ///
    /// # Errors
    /// Returns `ModelError::Invalid` if the parameters are inconsistent.
    pub fn from_model(model: ExportedModel) -> Result<Self, ModelError> {
        validate(&model)?;
        Ok(Self { model })
    }

    /// Load and validate a model file.
    ///
    /// # Errors
    /// Returns error if the file is missing, unreadable, malformed, fails
    /// the manifest digest check or describes an inconsistent model.
    pub fn load(path: &Path, require_manifest: bool) -> Result<Self, ModelError> {
        let bytes = fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        verify_manifest(path, &bytes, require_manifest)?;

        let model: ExportedModel =
            serde_json::from_slice(&bytes).map_err(|source| ModelError::Format {
                path: path.to_path_buf(),
                source,
            })?;

        let adapter = Self::from_model(model)?;

        tracing::info!(
            "Loaded {} model from {:?} (n_features={}, classes={:?})",
            adapter.kind(),
            path,
            adapter.model.feature_names.len(),
            adapter.model.classes
        );

        Ok(adapter)
    }

    /// Short name of the wrapped estimator.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self.model.estimator {
            Estimator::LogisticRegression { .. } => "logistic_regression",
            Estimator::DecisionTree { .. } => "decision_tree",
        }
    }

    /// Index into `classes` predicted for the feature values.
    fn class_index(&self, x: &[f64]) -> Result<usize, ClassifierError> {
        match &self.model.estimator {
            Estimator::LogisticRegression {
                coefficients,
                intercept,
                scaler,
                threshold,
            } => {
                let z = coefficients
                    .iter()
                    .enumerate()
                    .fold(*intercept, |acc, (i, coef)| {
                        let xi = match scaler {
                            Some(s) => (x[i] - s.mean[i]) / s.scale[i],
                            None => x[i],
                        };
                        acc + coef * xi
                    });
                let p = sigmoid(z);
                tracing::debug!("logistic decision z={z:.4} p={p:.4}");
                Ok(usize::from(p >= *threshold))
            }
            Estimator::DecisionTree {
                children_left,
                children_right,
                feature,
                threshold,
                value,
            } => {
                let mut node = 0usize;
                // Children always have larger indices, so the walk ends.
                while children_left[node] >= 0 {
                    let f = feature[node] as usize;
                    node = if x[f] <= threshold[node] {
                        children_left[node] as usize
                    } else {
                        children_right[node] as usize
                    };
                }
                argmax(&value[node]).ok_or_else(|| {
                    ClassifierError::Evaluation(format!("Leaf {node} has no class weights"))
                })
            }
        }
    }
}

fn argmax(weights: &[f64]) -> Option<usize> {
    // Ties go to the lowest index.
    weights
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &w)| match best {
            Some((_, bw)) if bw >= w => best,
            _ => Some((i, w)),
        })
        .map(|(i, _)| i)
}

impl Classifier for ExportedModelAdapter {
    fn feature_names(&self) -> &[String] {
        &self.model.feature_names
    }

    fn predict(&self, row: &FeatureRow) -> Result<i64, ClassifierError> {
        check_schema(&self.model.feature_names, row)?;

        if let Some((column, value)) = row
            .columns
            .iter()
            .zip(&row.values)
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ClassifierError::NonFiniteFeature {
                column: column.clone(),
                value: *value,
            });
        }

        let index = self.class_index(&row.values)?;
        self.model.classes.get(index).copied().ok_or_else(|| {
            ClassifierError::Evaluation(format!("Class index {index} out of range"))
        })
    }
}

fn verify_manifest(path: &Path, bytes: &[u8], require: bool) -> Result<(), ModelError> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let manifest_path = base_dir.join(MANIFEST_FILE);

    if !manifest_path.exists() {
        if require {
            return Err(ModelError::Integrity(format!(
                "{MANIFEST_FILE} not found next to {:?}",
                path
            )));
        }
        tracing::warn!("No {MANIFEST_FILE} next to {:?}; skipping digest check", path);
        return Ok(());
    }

    let content = fs::read(&manifest_path).map_err(|source| ModelError::Io {
        path: manifest_path.clone(),
        source,
    })?;
    let manifest: ModelManifest =
        serde_json::from_slice(&content).map_err(|source| ModelError::Format {
            path: manifest_path.clone(),
            source,
        })?;

    if manifest.version != 1 {
        return Err(ModelError::Integrity(format!(
            "Unsupported manifest version: {}",
            manifest.version
        )));
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ModelError::Integrity(format!("Model path {:?} has no file name", path)))?;

    let expected = manifest.files.get(file_name).ok_or_else(|| {
        ModelError::Integrity(format!("{MANIFEST_FILE} does not list {file_name}"))
    })?;

    let actual = sha256_hex_bytes(bytes);
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(ModelError::Integrity(format!(
            "File hash mismatch for {file_name}"
        )));
    }

    tracing::info!("Model digest verified against {:?}", manifest_path);
    Ok(())
}

fn validate(model: &ExportedModel) -> Result<(), ModelError> {
    let invalid = |msg: String| Err(ModelError::Invalid(msg));

    if model.format_version != FORMAT_VERSION {
        return invalid(format!(
            "Unsupported format_version {}, expected {FORMAT_VERSION}",
            model.format_version
        ));
    }

    let n = model.feature_names.len();
    if n == 0 {
        return invalid("feature_names is empty".into());
    }
    if model.classes.len() != 2 {
        return invalid(format!(
            "Binary classifier expected, got {} classes",
            model.classes.len()
        ));
    }

    match &model.estimator {
        Estimator::LogisticRegression {
            coefficients,
            intercept,
            scaler,
            threshold,
        } => {
            if coefficients.len() != n {
                return invalid(format!(
                    "{} coefficients for {n} features",
                    coefficients.len()
                ));
            }
            if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                return invalid("Non-finite coefficient or intercept".into());
            }
            if !(threshold.is_finite() && *threshold > 0.0 && *threshold < 1.0) {
                return invalid(format!("Threshold {threshold} outside (0, 1)"));
            }
            if let Some(s) = scaler {
                if s.mean.len() != n || s.scale.len() != n {
                    return invalid("Scaler lengths do not match feature_names length".into());
                }
                if s.scale.iter().any(|v| !v.is_finite() || *v == 0.0) {
                    return invalid("Scaler scale must be finite and non-zero".into());
                }
            }
        }
        Estimator::DecisionTree {
            children_left,
            children_right,
            feature,
            threshold,
            value,
        } => {
            let nodes = children_left.len();
            if nodes == 0 {
                return invalid("Decision tree has no nodes".into());
            }
            if children_right.len() != nodes
                || feature.len() != nodes
                || threshold.len() != nodes
                || value.len() != nodes
            {
                return invalid("Decision tree arrays differ in length".into());
            }
            for node in 0..nodes {
                let (left, right) = (children_left[node], children_right[node]);
                if left < 0 {
                    if value[node].len() != model.classes.len() {
                        return invalid(format!("Leaf {node} has wrong number of class weights"));
                    }
                    continue;
                }
                let in_range = |c: i64| c as usize > node && (c as usize) < nodes;
                if right < 0 || !in_range(left) || !in_range(right) {
                    return invalid(format!("Node {node} has invalid children"));
                }
                if feature[node] < 0 || feature[node] as usize >= n {
                    return invalid(format!("Node {node} splits on unknown feature"));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureVector, FEATURE_COLUMNS};
    use tempfile::tempdir;

    fn columns() -> Vec<String> {
        FEATURE_COLUMNS.iter().map(|c| (*c).to_string()).collect()
    }

    fn glucose_logistic() -> ExportedModel {
        // Positive exactly when Glucose > 140.
        let mut coefficients = vec![0.0; 8];
        coefficients[1] = 1.0;
        ExportedModel {
            format_version: 1,
            feature_names: columns(),
            classes: vec![0, 1],
            estimator: Estimator::LogisticRegression {
                coefficients,
                intercept: -140.0,
                scaler: None,
                threshold: 0.5,
            },
        }
    }

    fn bmi_tree() -> ExportedModel {
        // Root splits on BMI <= 30.
        ExportedModel {
            format_version: 1,
            feature_names: columns(),
            classes: vec![0, 1],
            estimator: Estimator::DecisionTree {
                children_left: vec![1, -1, -1],
                children_right: vec![2, -1, -1],
                feature: vec![5, -2, -2],
                threshold: vec![30.0, -2.0, -2.0],
                value: vec![vec![5.0, 5.0], vec![9.0, 1.0], vec![2.0, 8.0]],
            },
        }
    }

    fn with(values: [(usize, f64); 1]) -> FeatureVector {
        let mut v = *FeatureVector::defaults().values();
        for (i, x) in values {
            v[i] = x;
        }
        FeatureVector::new(v)
    }

    #[test]
    fn test_logistic_prediction() {
        let adapter = ExportedModelAdapter::from_model(glucose_logistic()).expect("valid");
        assert_eq!(adapter.predict(&with([(1, 120.0)]).to_row()), Ok(0));
        assert_eq!(adapter.predict(&with([(1, 180.0)]).to_row()), Ok(1));
    }

    #[test]
    fn test_logistic_with_scaler() {
        let mut model = glucose_logistic();
        model.estimator = Estimator::LogisticRegression {
            coefficients: {
                let mut c = vec![0.0; 8];
                c[1] = 2.0;
                c
            },
            intercept: 0.0,
            scaler: Some(StandardScaler {
                mean: vec![0.0, 120.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                scale: vec![1.0, 30.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            }),
            threshold: 0.5,
        };
        let adapter = ExportedModelAdapter::from_model(model).expect("valid");
        assert_eq!(adapter.predict(&with([(1, 100.0)]).to_row()), Ok(0));
        assert_eq!(adapter.predict(&with([(1, 121.0)]).to_row()), Ok(1));
    }

    #[test]
    fn test_tree_prediction() {
        let adapter = ExportedModelAdapter::from_model(bmi_tree()).expect("valid");
        assert_eq!(adapter.kind(), "decision_tree");
        assert_eq!(adapter.predict(&with([(5, 25.0)]).to_row()), Ok(0));
        assert_eq!(adapter.predict(&with([(5, 30.0)]).to_row()), Ok(0));
        assert_eq!(adapter.predict(&with([(5, 35.5)]).to_row()), Ok(1));
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let adapter = ExportedModelAdapter::from_model(bmi_tree()).expect("valid");
        let row = FeatureVector::defaults().to_row();
        let first = adapter.predict(&row);
        for _ in 0..10 {
            assert_eq!(adapter.predict(&row), first);
        }
    }

    #[test]
    fn test_schema_mismatch_is_an_error() {
        let mut model = glucose_logistic();
        model.feature_names.swap(0, 1);
        let adapter = ExportedModelAdapter::from_model(model).expect("valid");
        let err = adapter
            .predict(&FeatureVector::defaults().to_row())
            .unwrap_err();
        assert!(matches!(err, ClassifierError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_non_finite_feature_is_an_error() {
        let adapter = ExportedModelAdapter::from_model(glucose_logistic()).expect("valid");
        let err = adapter
            .predict(&with([(1, f64::NAN)]).to_row())
            .unwrap_err();
        assert!(matches!(err, ClassifierError::NonFiniteFeature { .. }));
    }

    #[test]
    fn test_classes_are_passed_through() {
        let mut model = glucose_logistic();
        model.classes = vec![0, 7];
        let adapter = ExportedModelAdapter::from_model(model).expect("valid");
        assert_eq!(adapter.predict(&with([(1, 180.0)]).to_row()), Ok(7));
    }

    #[test]
    fn test_validation_rejects_inconsistent_models() {
        let mut model = glucose_logistic();
        model.classes = vec![0, 1, 2];
        assert!(ExportedModelAdapter::from_model(model).is_err());

        let mut model = bmi_tree();
        if let Estimator::DecisionTree { children_left, .. } = &mut model.estimator {
            children_left[0] = 0;
        }
        assert!(ExportedModelAdapter::from_model(model).is_err());

        let mut model = glucose_logistic();
        model.format_version = 2;
        assert!(ExportedModelAdapter::from_model(model).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp = tempdir().expect("tempdir");
        let err = ExportedModelAdapter::load(&temp.path().join("missing.json"), false)
            .unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        fs::write(&path, b"not json").expect("write");
        let err = ExportedModelAdapter::load(&path, false).unwrap_err();
        assert!(matches!(err, ModelError::Format { .. }));
    }

    #[test]
    fn test_load_with_manifest() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("model.json");
        let bytes = serde_json::to_vec(&glucose_logistic()).expect("serialize");
        fs::write(&path, &bytes).expect("write");

        // Required but absent.
        assert!(matches!(
            ExportedModelAdapter::load(&path, true),
            Err(ModelError::Integrity(_))
        ));

        let mut files = BTreeMap::new();
        files.insert("model.json".to_string(), sha256_hex_bytes(&bytes));
        let manifest = ModelManifest { version: 1, files };
        fs::write(
            temp.path().join(MANIFEST_FILE),
            serde_json::to_vec(&manifest).expect("serialize"),
        )
        .expect("write");

        let adapter = ExportedModelAdapter::load(&path, true).expect("should load");
        assert_eq!(adapter.kind(), "logistic_regression");

        // Tamper with the model after signing the digest.
        fs::write(&path, serde_json::to_vec(&bmi_tree()).expect("serialize")).expect("write");
        assert!(matches!(
            ExportedModelAdapter::load(&path, false),
            Err(ModelError::Integrity(_))
        ));
    }
}
