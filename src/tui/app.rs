//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Key presses translated into dashboard events
//! - Service wiring at startup

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::csv_dataset::load_dataset;
use crate::adapters::model::ExportedModelAdapter;
use crate::application::{ChartService, ClassificationService, Dashboard, UiEvent, ViewState};
use crate::config::AppConfig;
use crate::domain::Feature;
use crate::ports::Classifier;

use super::ui::{
    charts::{
        render_charts, HISTOGRAM_SELECTOR, SCATTER_X_SELECTOR, SCATTER_Y_SELECTOR,
        SELECTOR_COUNT,
    },
    classify::{render_classification, BUTTON_FOCUS},
    render_disclaimer,
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Classification,
    Charts,
}

/// Main application state
pub struct App<C>
where
    C: Classifier,
{
    screen: Screen,
    should_quit: bool,
    dashboard: Dashboard<C>,
    /// State of the single terminal session
    state: ViewState,
    /// Selected slider, or the button at `BUTTON_FOCUS`
    slider_focus: usize,
    /// Selected column selector on the charts screen
    chart_focus: usize,
}

impl App<ExportedModelAdapter> {
    /// Create the application from configuration.
    ///
    /// Loads the model and the reference dataset; either failing aborts startup.
    ///
    /// # Errors
    /// Returns error if the model or dataset cannot be loaded.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let model = ExportedModelAdapter::load(&config.model_path, config.require_model_manifest)
            .with_context(|| format!("Failed to load model from {:?}", config.model_path))?;

        let dataset = load_dataset(&config.dataset_path)
            .with_context(|| format!("Failed to load dataset from {:?}", config.dataset_path))?;

        let dashboard = Dashboard::new(
            ClassificationService::new(Arc::new(model)),
            ChartService::new(Arc::new(dataset)),
        );

        Ok(Self::with_dependencies(dashboard))
    }
}

impl<C> App<C>
where
    C: Classifier,
{
    /// Create application with an injected dashboard (Composition Root pattern).
    pub fn with_dependencies(dashboard: Dashboard<C>) -> Self {
        let state = dashboard.initial_state();
        Self {
            screen: Screen::Classification,
            should_quit: false,
            dashboard,
            state,
            slider_focus: 0,
            chart_focus: HISTOGRAM_SELECTOR,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                match self.screen {
                    Screen::Classification => {
                        render_classification(f, chunks[0], &self.state, self.slider_focus)
                    }
                    Screen::Charts => render_charts(f, chunks[0], &self.state, self.chart_focus),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn send(&mut self, event: UiEvent) {
        self.state = self.dashboard.dispatch(&self.state, event);
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.screen = match self.screen {
                    Screen::Classification => Screen::Charts,
                    Screen::Charts => Screen::Classification,
                };
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.send(UiEvent::ClassifyPressed),
            _ => match self.screen {
                Screen::Classification => self.handle_classification_key(key),
                Screen::Charts => self.handle_charts_key(key),
            },
        }
    }

    fn focused_feature(&self) -> Option<Feature> {
        Feature::ALL.get(self.slider_focus).copied()
    }

    fn handle_classification_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => {
                self.slider_focus = (self.slider_focus + BUTTON_FOCUS) % (BUTTON_FOCUS + 1);
            }
            KeyCode::Down => {
                self.slider_focus = (self.slider_focus + 1) % (BUTTON_FOCUS + 1);
            }
            KeyCode::Enter if self.slider_focus == BUTTON_FOCUS => {
                self.send(UiEvent::ClassifyPressed);
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Home | KeyCode::End => {
                let Some(feature) = self.focused_feature() else {
                    return;
                };
                let range = feature.slider();
                let current = self.state.slider(feature);
                let value = match key {
                    KeyCode::Left => range.step_down(current),
                    KeyCode::Right => range.step_up(current),
                    KeyCode::Home => range.min,
                    _ => range.max,
                };
                if value != current {
                    self.send(UiEvent::SliderMoved { feature, value });
                }
            }
            _ => {}
        }
    }

    fn handle_charts_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => {
                self.chart_focus = (self.chart_focus + SELECTOR_COUNT - 1) % SELECTOR_COUNT;
            }
            KeyCode::Down => {
                self.chart_focus = (self.chart_focus + 1) % SELECTOR_COUNT;
            }
            KeyCode::Left => self.cycle_column(false),
            KeyCode::Right => self.cycle_column(true),
            KeyCode::Enter => self.send(UiEvent::ClassifyPressed),
            _ => {}
        }
    }

    /// Pick the previous/next dataset column for the focused selector.
    fn cycle_column(&mut self, forward: bool) {
        let columns = self.dashboard.chart_columns();
        if columns.is_empty() {
            return;
        }

        let current = match self.chart_focus {
            HISTOGRAM_SELECTOR => &self.state.histogram_column,
            SCATTER_X_SELECTOR => &self.state.scatter_x,
            _ => &self.state.scatter_y,
        };
        let next = match columns.iter().position(|c| c == current) {
            Some(i) if forward => (i + 1) % columns.len(),
            Some(i) => (i + columns.len() - 1) % columns.len(),
            None => 0,
        };
        let column = columns[next].clone();

        let event = match self.chart_focus {
            HISTOGRAM_SELECTOR => UiEvent::HistogramColumnChosen(column),
            SCATTER_X_SELECTOR => UiEvent::ScatterXChosen(column),
            SCATTER_Y_SELECTOR => UiEvent::ScatterYChosen(column),
            _ => return,
        };
        self.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::model::{Estimator, ExportedModel};
    use crate::domain::{ReferenceDataset, FEATURE_COLUMNS, FEATURE_COUNT, PLACEHOLDER};
    use std::io::Write;

    /// Positive exactly when Glucose exceeds 140.
    fn glucose_model() -> ExportedModelAdapter {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[1] = 1.0;
        ExportedModelAdapter::from_model(ExportedModel {
            format_version: 1,
            feature_names: FEATURE_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            classes: vec![0, 1],
            estimator: Estimator::LogisticRegression {
                coefficients,
                intercept: -140.5,
                scaler: None,
                threshold: 0.5,
            },
        })
        .expect("valid model")
    }

    fn app() -> App<ExportedModelAdapter> {
        let columns = FEATURE_COLUMNS.iter().map(|c| (*c).to_string()).collect();
        let rows = vec![
            (vec![6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0], 1),
            (vec![1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0], 0),
        ];
        let dataset = ReferenceDataset::from_rows(columns, rows).expect("valid dataset");
        App::with_dependencies(Dashboard::new(
            ClassificationService::new(Arc::new(glucose_model())),
            ChartService::new(Arc::new(dataset)),
        ))
    }

    fn press(app: &mut App<ExportedModelAdapter>, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_ctrl_q_quits() {
        let mut app = app();
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit());
    }

    #[test]
    fn test_arrow_steps_focused_slider_by_one_step() {
        let mut app = app();
        press(&mut app, KeyCode::Down); // Glucose
        press(&mut app, KeyCode::Right);
        assert_eq!(app.state().slider(Feature::Glucose), 122.0);
        assert_eq!(app.state().echo_labels[1], "122");

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.state().slider(Feature::Glucose), 118.0);
    }

    #[test]
    fn test_home_end_jump_to_limits() {
        let mut app = app();
        press(&mut app, KeyCode::End);
        assert_eq!(app.state().slider(Feature::Pregnancies), 20.0);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.state().slider(Feature::Pregnancies), 0.0);
    }

    #[test]
    fn test_enter_on_button_classifies() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state().classification, PLACEHOLDER);

        press(&mut app, KeyCode::Up); // wraps to the button
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.state().classification,
            "The predicted class of the input data is: [0:NO DIABETES]"
        );
    }

    #[test]
    fn test_high_glucose_is_classified_positive() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        for _ in 0..15 {
            press(&mut app, KeyCode::Right);
        }
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(
            app.state().classification,
            "The predicted class of the input data is: [1:WITH DIABETES]"
        );
        assert_eq!(
            app.state().last_sample.map(|s| s.values()[1]),
            Some(150.0)
        );
    }

    #[test]
    fn test_tab_switches_screen_and_cycles_columns() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.screen(), Screen::Charts);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.state().histogram_column, "Glucose");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.state().histogram_column, "Age");

        press(&mut app, KeyCode::Down); // scatter x
        press(&mut app, KeyCode::Right);
        assert_eq!(app.state().scatter_x, "BloodPressure");
        assert_eq!(app.state().scatter_y, "BloodPressure");
    }

    #[test]
    fn test_new_fails_without_dataset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let model_path = dir.path().join("model_diabetes.json");
        let model = serde_json::json!({
            "format_version": 1,
            "feature_names": FEATURE_COLUMNS,
            "classes": [0, 1],
            "estimator": {
                "type": "logistic_regression",
                "coefficients": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                "intercept": 0.0
            }
        });
        let mut file = std::fs::File::create(&model_path).expect("create");
        file.write_all(model.to_string().as_bytes()).expect("write");

        let config = AppConfig {
            model_path,
            dataset_path: dir.path().join("missing.csv"),
            ..AppConfig::default()
        };
        let err = App::new(&config).err().expect("startup must fail");
        assert!(err.to_string().contains("Failed to load dataset"));
    }
}
