//! Chart descriptions produced by the chart renderer.
//!
//! These are plain data; the TUI decides how to draw them.

use serde::{Deserialize, Serialize};

/// Title used for the class legend on both charts.
pub const LEGEND_TITLE: &str = "Class";

/// Text of the annotation placed on the scatter plot.
pub const SAMPLE_ANNOTATION: &str = "SAMPLE!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendOrientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendAnchor {
    TopCenter,
    TopRight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub orientation: LegendOrientation,
    pub anchor: LegendAnchor,
}

/// One histogram bin with counts split by outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    /// Counts indexed by outcome (0, 1)
    pub counts: [usize; 2],
}

impl HistogramBin {
    #[must_use]
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Histogram of one column, coloured by outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    pub legend: Legend,
    /// X position of the vertical sample line
    pub marker: Option<f64>,
}

impl Histogram {
    /// Tallest bar, across both outcomes.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.bins
            .iter()
            .flat_map(|b| b.counts)
            .max()
            .unwrap_or(0)
    }

    /// X range spanned by the bins.
    #[must_use]
    pub fn x_range(&self) -> Option<(f64, f64)> {
        match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => Some((first.start, last.end)),
            _ => None,
        }
    }
}

/// Points of one outcome class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub outcome: u8,
    pub points: Vec<(f64, f64)>,
}

/// Text callout with an arrow pointing at a data coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub arrowhead: u8,
}

/// Scatter plot of two columns, coloured by outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scatter {
    pub x_column: String,
    pub y_column: String,
    pub series: Vec<ScatterSeries>,
    pub legend: Legend,
    pub annotation: Option<Annotation>,
}

impl Scatter {
    /// Bounds covering every point and the annotation: `(x_min, x_max, y_min, y_max)`.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let points = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .chain(self.annotation.as_ref().map(|a| (a.x, a.y)));

        points.fold(None, |acc, (x, y)| match acc {
            None => Some((x, x, y, y)),
            Some((x0, x1, y0, y1)) => Some((x0.min(x), x1.max(x), y0.min(y), y1.max(y))),
        })
    }
}
