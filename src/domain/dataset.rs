//! Reference dataset used for the exploratory charts.

/// Static table of labelled samples. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    columns: Vec<String>,
    /// Column-major storage: `values[c][r]`
    values: Vec<Vec<f64>>,
    outcomes: Vec<u8>,
}

impl ReferenceDataset {
    /// Build a dataset from column names and row-major records.
    ///
    /// # Errors
    /// Returns error if a row width does not match the column count.
    pub fn from_rows(
        columns: Vec<String>,
        rows: Vec<(Vec<f64>, u8)>,
    ) -> Result<Self, String> {
        let mut values = vec![Vec::with_capacity(rows.len()); columns.len()];
        let mut outcomes = Vec::with_capacity(rows.len());

        for (i, (row, outcome)) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(format!(
                    "Row {i} has {} values, expected {}",
                    row.len(),
                    columns.len()
                ));
            }
            for (c, v) in row.into_iter().enumerate() {
                values[c].push(v);
            }
            outcomes.push(outcome);
        }

        Ok(Self {
            columns,
            values,
            outcomes,
        })
    }

    /// Feature column names (the outcome column is not included).
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All values of a named column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i].as_slice())
    }

    #[must_use]
    pub fn outcomes(&self) -> &[u8] {
        &self.outcomes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
