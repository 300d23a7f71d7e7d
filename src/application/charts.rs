//! Chart service: Builds exploratory charts over the reference dataset.
//!
//! Both operations are pure functions of the column selection, the dataset
//! and the optional sample; the dataset is never modified.

use std::sync::Arc;

use crate::domain::chart::{
    LegendAnchor, LegendOrientation, LEGEND_TITLE, SAMPLE_ANNOTATION,
};
use crate::domain::{
    Annotation, FeatureVector, Histogram, HistogramBin, Legend, ReferenceDataset, Scatter,
    ScatterSeries,
};
use crate::GlycoviewError;

/// Approximate number of bins aimed for when choosing a bin width.
const TARGET_BINS: f64 = 20.0;

/// Arrow style of the sample annotation.
const SAMPLE_ARROWHEAD: u8 = 3;

/// Service for chart construction.
#[derive(Clone)]
pub struct ChartService {
    dataset: Arc<ReferenceDataset>,
}

impl ChartService {
    /// Create a new chart service over a loaded dataset.
    pub fn new(dataset: Arc<ReferenceDataset>) -> Self {
        Self { dataset }
    }

    /// Columns that can be selected for plotting.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.dataset.columns()
    }

    fn column(&self, name: &str) -> Result<&[f64], GlycoviewError> {
        self.dataset
            .column(name)
            .ok_or_else(|| GlycoviewError::UnknownColumn(name.to_string()))
    }

    /// Histogram of one column split by outcome.
    ///
    /// # Errors
    /// Returns `GlycoviewError::UnknownColumn` if the dataset has no such column,
    /// or `GlycoviewError::NotAFeature` if a sample is given and the column is
    /// not one of its features.
    pub fn histogram(
        &self,
        column: &str,
        sample: Option<&FeatureVector>,
    ) -> Result<Histogram, GlycoviewError> {
        let values = self.column(column)?;
        let bins = bin_by_outcome(values, self.dataset.outcomes());

        Ok(Histogram {
            column: column.to_string(),
            bins,
            legend: Legend {
                title: LEGEND_TITLE.to_string(),
                orientation: LegendOrientation::Horizontal,
                anchor: LegendAnchor::TopCenter,
            },
            marker: sample.map(|s| sample_value(s, column)).transpose()?,
        })
    }

    /// Scatter plot of two columns split by outcome.
    ///
    /// # Errors
    /// Returns `GlycoviewError::UnknownColumn` if either column is missing,
    /// or `GlycoviewError::NotAFeature` if a sample is given and a column is
    /// not one of its features.
    pub fn scatter(
        &self,
        x_column: &str,
        y_column: &str,
        sample: Option<&FeatureVector>,
    ) -> Result<Scatter, GlycoviewError> {
        let xs = self.column(x_column)?;
        let ys = self.column(y_column)?;

        let mut series = [0u8, 1].map(|outcome| ScatterSeries {
            outcome,
            points: Vec::new(),
        });
        for ((x, y), outcome) in xs.iter().zip(ys).zip(self.dataset.outcomes()) {
            series[usize::from(*outcome)].points.push((*x, *y));
        }

        let annotation = sample
            .map(|s| -> Result<Annotation, GlycoviewError> {
                Ok(Annotation {
                    text: SAMPLE_ANNOTATION.to_string(),
                    x: sample_value(s, x_column)?,
                    y: sample_value(s, y_column)?,
                    arrowhead: SAMPLE_ARROWHEAD,
                })
            })
            .transpose()?;

        Ok(Scatter {
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            series: series.into(),
            legend: Legend {
                title: LEGEND_TITLE.to_string(),
                orientation: LegendOrientation::Vertical,
                anchor: LegendAnchor::TopRight,
            },
            annotation,
        })
    }
}

/// Value the sample holds for a dataset column.
fn sample_value(sample: &FeatureVector, column: &str) -> Result<f64, GlycoviewError> {
    sample
        .value_of(column)
        .ok_or_else(|| GlycoviewError::NotAFeature(column.to_string()))
}

/// Pick a 1/2/5 × 10^k bin width giving roughly [`TARGET_BINS`] bins.
fn nice_bin_width(min: f64, max: f64, integer_valued: bool) -> f64 {
    let span = max - min;
    if span <= 0.0 {
        return 1.0;
    }
    let raw = span / TARGET_BINS;
    let magnitude = 10f64.powf(raw.log10().floor());
    let nice = match raw / magnitude {
        n if n <= 1.0 => 1.0,
        n if n <= 2.0 => 2.0,
        n if n <= 5.0 => 5.0,
        _ => 10.0,
    } * magnitude;

    if integer_valued {
        nice.max(1.0)
    } else {
        nice
    }
}

fn bin_by_outcome(values: &[f64], outcomes: &[u8]) -> Vec<HistogramBin> {
    let Some((min, max)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    }) else {
        return Vec::new();
    };

    let integer_valued = values.iter().all(|v| v.fract() == 0.0);
    let width = nice_bin_width(min, max, integer_valued);
    let start = ((min / width).floor() * width).min(min);
    // Edges and bin lookup share this expression so values on an edge always
    // land in the bin that starts there.
    let edge = |i: usize| start + i as f64 * width;

    let mut count = ((max - start) / width).floor() as usize + 1;
    while edge(count) <= max {
        count += 1;
    }

    let mut bins: Vec<HistogramBin> = (0..count)
        .map(|i| HistogramBin {
            start: edge(i),
            end: edge(i + 1),
            counts: [0, 0],
        })
        .collect();

    for (v, outcome) in values.iter().zip(outcomes) {
        let mut idx = (((v - start) / width).floor().max(0.0) as usize).min(count - 1);
        while idx + 1 < count && *v >= edge(idx + 1) {
            idx += 1;
        }
        while idx > 0 && *v < edge(idx) {
            idx -= 1;
        }
        bins[idx].counts[usize::from(*outcome)] += 1;
    }

    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FEATURE_COLUMNS;

    fn dataset() -> Arc<ReferenceDataset> {
        let columns = FEATURE_COLUMNS.iter().map(|c| (*c).to_string()).collect();
        let rows = vec![
            (vec![6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0], 1),
            (vec![1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0], 0),
            (vec![8.0, 183.0, 64.0, 0.0, 0.0, 23.3, 0.672, 32.0], 1),
            (vec![1.0, 89.0, 66.0, 23.0, 94.0, 28.1, 0.167, 21.0], 0),
            (vec![0.0, 137.0, 40.0, 35.0, 168.0, 43.1, 2.288, 33.0], 1),
        ];
        Arc::new(ReferenceDataset::from_rows(columns, rows).expect("valid dataset"))
    }

    fn sample() -> FeatureVector {
        FeatureVector::defaults()
    }

    #[test]
    fn test_histogram_counts_every_row_once() {
        let service = ChartService::new(dataset());
        let hist = service.histogram("Glucose", None).expect("known column");

        let zeros: usize = hist.bins.iter().map(|b| b.counts[0]).sum();
        let ones: usize = hist.bins.iter().map(|b| b.counts[1]).sum();
        assert_eq!((zeros, ones), (2, 3));
        assert!(hist.marker.is_none());
        assert_eq!(hist.legend.title, "Class");
        assert_eq!(hist.legend.orientation, LegendOrientation::Horizontal);
        assert_eq!(hist.legend.anchor, LegendAnchor::TopCenter);
    }

    #[test]
    fn test_histogram_bins_cover_the_range() {
        let service = ChartService::new(dataset());
        let hist = service.histogram("BMI", None).expect("known column");
        let (lo, hi) = hist.x_range().expect("non-empty");
        assert!(lo <= 23.3 && hi > 43.1);
        for pair in hist.bins.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < 1e-9);
        }
    }

    #[test]
    fn test_histogram_marker_follows_sample() {
        let service = ChartService::new(dataset());
        let hist = service
            .histogram("Glucose", Some(&sample()))
            .expect("known column");
        assert_eq!(hist.marker, Some(120.0));
    }

    #[test]
    fn test_scatter_groups_by_outcome_and_annotates_sample() {
        let service = ChartService::new(dataset());
        let scatter = service
            .scatter("Glucose", "BloodPressure", Some(&sample()))
            .expect("known columns");

        assert_eq!(scatter.series.len(), 2);
        assert_eq!(scatter.series[0].points, vec![(85.0, 66.0), (89.0, 66.0)]);
        assert_eq!(scatter.series[1].points.len(), 3);

        let annotation = scatter.annotation.expect("sample present");
        assert_eq!((annotation.x, annotation.y), (120.0, 72.0));
        assert_eq!(annotation.text, "SAMPLE!");
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let service = ChartService::new(dataset());
        assert!(matches!(
            service.histogram("Cholesterol", None),
            Err(GlycoviewError::UnknownColumn(c)) if c == "Cholesterol"
        ));
        assert!(matches!(
            service.scatter("Glucose", "Outcome", None),
            Err(GlycoviewError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_charts_do_not_touch_the_dataset() {
        let ds = dataset();
        let service = ChartService::new(ds.clone());
        let before = ds.column("Glucose").map(<[f64]>::to_vec);
        service.histogram("Glucose", Some(&sample())).expect("ok");
        service.scatter("Glucose", "Age", Some(&sample())).expect("ok");
        assert_eq!(ds.column("Glucose").map(<[f64]>::to_vec), before);
    }

    #[test]
    fn test_nice_bin_width() {
        assert_eq!(nice_bin_width(0.0, 17.0, true), 1.0);
        assert_eq!(nice_bin_width(44.0, 199.0, true), 10.0);
        assert!((nice_bin_width(0.078, 2.42, false) - 0.2).abs() < 1e-12);
        assert_eq!(nice_bin_width(5.0, 5.0, false), 1.0);
    }

    #[test]
    fn test_values_on_fractional_edges_fall_in_bin_starting_there() {
        let mut values: Vec<f64> = (0..=20).map(|i| i as f64 * 0.2).collect();
        values.extend([0.6, 1.4, 2.2, 3.8, 4.0]);
        let outcomes = vec![0u8; values.len()];

        let bins = bin_by_outcome(&values, &outcomes);
        assert!((bins[0].end - bins[0].start - 0.2).abs() < 1e-9);

        for bin in &bins {
            let inside = values
                .iter()
                .filter(|v| bin.start <= **v && **v < bin.end)
                .count();
            assert_eq!(bin.counts[0], inside, "bin [{}, {})", bin.start, bin.end);
        }
        let counted: usize = bins.iter().map(|b| b.counts[0]).sum();
        assert_eq!(counted, values.len());
    }

    #[test]
    fn test_sample_on_non_feature_column_is_an_error() {
        let columns = vec!["Glucose".to_string(), "Id".to_string()];
        let rows = vec![(vec![148.0, 1.0], 1), (vec![85.0, 2.0], 0)];
        let service = ChartService::new(Arc::new(
            ReferenceDataset::from_rows(columns, rows).expect("valid dataset"),
        ));

        assert!(matches!(
            service.histogram("Id", Some(&sample())),
            Err(GlycoviewError::NotAFeature(c)) if c == "Id"
        ));
        assert!(matches!(
            service.scatter("Glucose", "Id", Some(&sample())),
            Err(GlycoviewError::NotAFeature(c)) if c == "Id"
        ));

        // Without a sample there is nothing to place, so the column is fine.
        assert!(service.histogram("Id", None).expect("plain chart").marker.is_none());
    }

    #[test]
    fn test_empty_column_has_no_bins() {
        assert!(bin_by_outcome(&[], &[]).is_empty());
    }
}
