//! Dashboard: UI events mapped onto pure state transitions.
//!
//! Every interaction is a [`UiEvent`]. [`Dashboard::dispatch`] routes it to
//! one handler that takes the current [`ViewState`] and returns the next one.
//! The last submitted sample lives in the `ViewState` of each session, so
//! concurrent sessions never observe each other's samples.
//!
//! | Event                   | Outputs                                   |
//! |-------------------------|-------------------------------------------|
//! | `SliderMoved`           | slider value, echo label                  |
//! | `HistogramColumnChosen` | histogram                                 |
//! | `ScatterXChosen`        | scatter                                   |
//! | `ScatterYChosen`        | scatter                                   |
//! | `ClassifyPressed`       | classification text, sample, both charts  |

use crate::domain::{
    echo_label, Feature, FeatureVector, Histogram, Prediction, Scatter, FEATURE_COUNT,
    PLACEHOLDER,
};
use crate::ports::Classifier;

use super::{ChartService, ClassificationService};

/// Column shown in the histogram on first load.
pub const INITIAL_HISTOGRAM_COLUMN: &str = "Pregnancies";

/// Columns shown in the scatter plot on first load.
pub const INITIAL_SCATTER_COLUMNS: (&str, &str) = ("Glucose", "BloodPressure");

/// A chart or the reason it could not be drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPanel<T> {
    Ready(T),
    Failed(String),
}

impl<T> ChartPanel<T> {
    fn from_result(result: crate::Result<T>) -> Self {
        match result {
            Ok(chart) => Self::Ready(chart),
            Err(e) => {
                tracing::warn!("Chart rendering failed: {}", e);
                Self::Failed(e.to_string())
            }
        }
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(chart) => Some(chart),
            Self::Failed(_) => None,
        }
    }
}

/// Everything one session shows on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub sliders: [f64; FEATURE_COUNT],
    pub echo_labels: [String; FEATURE_COUNT],
    pub classification: String,
    pub prediction: Option<Prediction>,
    /// Most recently submitted feature vector
    pub last_sample: Option<FeatureVector>,
    pub histogram_column: String,
    pub scatter_x: String,
    pub scatter_y: String,
    pub histogram: ChartPanel<Histogram>,
    pub scatter: ChartPanel<Scatter>,
}

impl ViewState {
    /// Snapshot the sliders into a fresh feature vector.
    #[must_use]
    pub fn collect_features(&self) -> FeatureVector {
        FeatureVector::new(self.sliders)
    }

    #[must_use]
    pub fn slider(&self, feature: Feature) -> f64 {
        self.sliders[feature.index()]
    }
}

/// Interaction coming from the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SliderMoved { feature: Feature, value: f64 },
    HistogramColumnChosen(String),
    ScatterXChosen(String),
    ScatterYChosen(String),
    ClassifyPressed,
}

impl UiEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SliderMoved { .. } => "slider_moved",
            Self::HistogramColumnChosen(_) => "histogram_column_chosen",
            Self::ScatterXChosen(_) => "scatter_x_chosen",
            Self::ScatterYChosen(_) => "scatter_y_chosen",
            Self::ClassifyPressed => "classify_pressed",
        }
    }
}

/// Services behind the page, shared by all sessions.
pub struct Dashboard<C>
where
    C: Classifier,
{
    classification: ClassificationService<C>,
    charts: ChartService,
}

impl<C> Dashboard<C>
where
    C: Classifier,
{
    /// Create a dashboard with injected services.
    pub fn new(classification: ClassificationService<C>, charts: ChartService) -> Self {
        Self {
            classification,
            charts,
        }
    }

    /// Columns offered by the chart dropdowns.
    #[must_use]
    pub fn chart_columns(&self) -> &[String] {
        self.charts.columns()
    }

    /// State of a freshly opened page.
    #[must_use]
    pub fn initial_state(&self) -> ViewState {
        let sliders = FeatureVector::defaults();
        let (scatter_x, scatter_y) = INITIAL_SCATTER_COLUMNS;

        ViewState {
            sliders: *sliders.values(),
            echo_labels: (*sliders.values()).map(echo_label),
            classification: PLACEHOLDER.to_string(),
            prediction: None,
            last_sample: None,
            histogram_column: INITIAL_HISTOGRAM_COLUMN.to_string(),
            scatter_x: scatter_x.to_string(),
            scatter_y: scatter_y.to_string(),
            histogram: ChartPanel::from_result(
                self.charts.histogram(INITIAL_HISTOGRAM_COLUMN, None),
            ),
            scatter: ChartPanel::from_result(self.charts.scatter(scatter_x, scatter_y, None)),
        }
    }

    /// Route an event to its handler.
    #[must_use]
    pub fn dispatch(&self, state: &ViewState, event: UiEvent) -> ViewState {
        tracing::debug!("Dispatching {}", event.name());
        match event {
            UiEvent::SliderMoved { feature, value } => on_slider_moved(state, feature, value),
            UiEvent::HistogramColumnChosen(column) => self.on_histogram_column(state, column),
            UiEvent::ScatterXChosen(column) => self.on_scatter_columns(state, Some(column), None),
            UiEvent::ScatterYChosen(column) => self.on_scatter_columns(state, None, Some(column)),
            UiEvent::ClassifyPressed => self.on_classify(state),
        }
    }

    fn on_histogram_column(&self, state: &ViewState, column: String) -> ViewState {
        let histogram =
            ChartPanel::from_result(self.charts.histogram(&column, state.last_sample.as_ref()));
        ViewState {
            histogram_column: column,
            histogram,
            ..state.clone()
        }
    }

    fn on_scatter_columns(
        &self,
        state: &ViewState,
        x: Option<String>,
        y: Option<String>,
    ) -> ViewState {
        let scatter_x = x.unwrap_or_else(|| state.scatter_x.clone());
        let scatter_y = y.unwrap_or_else(|| state.scatter_y.clone());
        let scatter = ChartPanel::from_result(self.charts.scatter(
            &scatter_x,
            &scatter_y,
            state.last_sample.as_ref(),
        ));
        ViewState {
            scatter_x,
            scatter_y,
            scatter,
            ..state.clone()
        }
    }

    fn on_classify(&self, state: &ViewState) -> ViewState {
        let sample = state.collect_features();

        let (classification, prediction) = match self.classification.classify(&sample) {
            Ok(p) => (p.message(), Some(p)),
            Err(e) => {
                tracing::error!("Classification failed: {}", e);
                (e.to_string(), None)
            }
        };

        let histogram =
            ChartPanel::from_result(self.charts.histogram(&state.histogram_column, Some(&sample)));
        let scatter = ChartPanel::from_result(self.charts.scatter(
            &state.scatter_x,
            &state.scatter_y,
            Some(&sample),
        ));

        ViewState {
            classification,
            prediction,
            last_sample: Some(sample),
            histogram,
            scatter,
            ..state.clone()
        }
    }
}

fn on_slider_moved(state: &ViewState, feature: Feature, value: f64) -> ViewState {
    let value = feature.slider().normalize(value);
    let mut next = state.clone();
    next.sliders[feature.index()] = value;
    next.echo_labels[feature.index()] = echo_label(value);
    next
}
