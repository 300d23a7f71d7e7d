//! CSV adapter: Loads the reference dataset for the charts.
//!
//! Expects a header row with a binary `Outcome` column; every other column
//! is kept as a numeric feature column.

use std::path::Path;

use crate::domain::{ReferenceDataset, OUTCOME_COLUMN};

/// Error type for dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset has no {OUTCOME_COLUMN} column")]
    MissingOutcome,

    #[error("Row {row}, column {column}: {value:?} is not a number")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: outcome {value:?} must be 0 or 1")]
    InvalidOutcome { row: usize, value: String },

    #[error("Invalid dataset: {0}")]
    Invalid(String),
}

/// Load a dataset from a CSV file.
///
/// # Errors
/// Returns error if the file cannot be read or a cell is malformed.
pub fn load_dataset(path: &Path) -> Result<ReferenceDataset, DatasetError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let dataset = read_dataset(reader)?;

    tracing::info!(
        "Loaded reference dataset from {:?} ({} rows, {} feature columns)",
        path,
        dataset.len(),
        dataset.columns().len()
    );
    if dataset.is_empty() {
        tracing::warn!("Reference dataset {:?} has no rows; charts will be empty", path);
    }

    Ok(dataset)
}

/// Parse a dataset from any CSV reader.
///
/// # Errors
/// Returns error if the header lacks `Outcome` or a cell is malformed.
pub fn read_dataset<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<ReferenceDataset, DatasetError> {
    let headers = reader.headers()?.clone();
    let outcome_idx = headers
        .iter()
        .position(|h| h == OUTCOME_COLUMN)
        .ok_or(DatasetError::MissingOutcome)?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != outcome_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let row_no = i + 2;

        let raw_outcome = record.get(outcome_idx).unwrap_or_default();
        let outcome = match raw_outcome.parse::<f64>() {
            Ok(v) if v == 0.0 => 0,
            Ok(v) if v == 1.0 => 1,
            _ => {
                return Err(DatasetError::InvalidOutcome {
                    row: row_no,
                    value: raw_outcome.to_string(),
                })
            }
        };

        let mut values = Vec::with_capacity(columns.len());
        for (c, cell) in record.iter().enumerate() {
            if c == outcome_idx {
                continue;
            }
            let value = cell
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DatasetError::NotNumeric {
                    row: row_no,
                    column: headers.get(c).unwrap_or_default().to_string(),
                    value: cell.to_string(),
                })?;
            values.push(value);
        }

        rows.push((values, outcome));
    }

    ReferenceDataset::from_rows(columns, rows).map_err(DatasetError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age,Outcome
6,148,72,35,0,33.6,0.627,50,1
1,85,66,29,0,26.6,0.351,31,0
8,183,64,0,0,23.3,0.672,32,1
";

    fn reader(text: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes())
    }

    #[test]
    fn test_reads_features_and_outcome() {
        let ds = read_dataset(reader(SAMPLE)).expect("Should parse");
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.columns().len(), 8);
        assert!(!ds.columns().iter().any(|c| c == "Outcome"));
        assert_eq!(ds.column("Glucose"), Some(&[148.0, 85.0, 183.0][..]));
        assert_eq!(ds.outcomes(), &[1, 0, 1]);
    }

    #[test]
    fn test_missing_outcome_column() {
        let err = read_dataset(reader("Glucose,Age\n1,2\n")).unwrap_err();
        assert!(matches!(err, DatasetError::MissingOutcome));
    }

    #[test]
    fn test_non_numeric_cell_names_row_and_column() {
        let err = read_dataset(reader("Glucose,Outcome\n100,0\nabc,1\n")).unwrap_err();
        match err {
            DatasetError::NotNumeric { row, column, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column, "Glucose");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_outcome_must_be_binary() {
        let err = read_dataset(reader("Glucose,Outcome\n100,2\n")).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidOutcome { row: 2, .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(SAMPLE.as_bytes()).expect("write");
        let ds = load_dataset(file.path()).expect("Should load");
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_dataset(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Csv(_)));
    }
}
