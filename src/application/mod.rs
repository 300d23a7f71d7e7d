//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod charts;
mod classification;
mod dashboard;

pub use charts::ChartService;
pub use classification::ClassificationService;
pub use dashboard::{ChartPanel, Dashboard, UiEvent, ViewState};
