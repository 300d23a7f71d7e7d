//! TUI module: Terminal User Interface using Ratatui.
//!
//! Two screens share one session state:
//! - Classification: sliders, classify button and result
//! - Charts: histogram and scatter plot of the reference dataset

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::Theme;
