//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.

pub mod chart;
mod dataset;
mod features;
mod prediction;

pub use chart::{Annotation, Histogram, HistogramBin, Legend, Scatter, ScatterSeries};
pub use dataset::ReferenceDataset;
pub use features::{
    echo_label, Feature, FeatureRow, FeatureVector, SliderSpec, FEATURE_COLUMNS, FEATURE_COUNT,
    OUTCOME_COLUMN,
};
pub use prediction::{ClassLabel, Prediction, PLACEHOLDER, POSSIBLE_CLASSES};
