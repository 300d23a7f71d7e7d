//! # Glycoview
#![allow(non_snake_case)]
//!
//! Terminal workbench for diabetes classification with a pre-trained model.
//!
//! This crate provides:
//! - Slider-driven collection of eight clinical measurements
//! - Classification through an exported, read-only model
//! - Histogram and scatter views of a reference dataset, annotated with the
//!   last classified sample
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (features, predictions, chart descriptions)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (JSON model, CSV dataset)
//! - `application`: Use cases and the UI event dispatch
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{ClassLabel, FeatureVector, Prediction};

/// Result type for Glycoview operations
pub type Result<T> = std::result::Result<T, GlycoviewError>;

/// Main error type for Glycoview
#[derive(Debug, thiserror::Error)]
pub enum GlycoviewError {
    #[error("Model loading failed: {0}")]
    Model(#[from] adapters::ModelError),

    #[error("Dataset loading failed: {0}")]
    Dataset(#[from] adapters::DatasetError),

    #[error("Classification failed: {0}")]
    Classification(#[from] ports::ClassifierError),

    #[error("Model returned label {0}, expected 0 or 1")]
    InvalidLabel(i64),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column {0} is not a model feature; the sample cannot be placed on it")]
    NotAFeature(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
