//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external artifacts:
//! - `model`: JSON-exported classifier (logistic regression, decision tree)
//! - `csv_dataset`: reference dataset loading

pub mod csv_dataset;
pub mod model;

pub use csv_dataset::DatasetError;
pub use model::ModelError;
