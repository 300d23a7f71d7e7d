//! Charts view: histogram and scatter plot of the reference dataset.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph, Wrap},
    Frame,
};

use crate::application::{ChartPanel, ViewState};
use crate::domain::chart::{LegendAnchor, LEGEND_TITLE};
use crate::domain::{Histogram, Legend, Scatter};
use crate::tui::styles::Theme;

use super::axis_label;

/// Focus slots of the three column selectors.
pub const HISTOGRAM_SELECTOR: usize = 0;
pub const SCATTER_X_SELECTOR: usize = 1;
pub const SCATTER_Y_SELECTOR: usize = 2;
pub const SELECTOR_COUNT: usize = 3;

/// Render the charts view
pub fn render_charts(f: &mut Frame, area: Rect, state: &ViewState, focus: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Selectors
            Constraint::Min(10),   // Charts
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_charts_header(f, chunks[0]);
    render_selectors(f, chunks[1], state, focus);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    match &state.histogram {
        ChartPanel::Ready(hist) => render_histogram(f, panels[0], hist),
        ChartPanel::Failed(err) => render_chart_error(f, panels[0], "Histogram", err),
    }
    match &state.scatter {
        ChartPanel::Ready(scatter) => render_scatter(f, panels[1], scatter),
        ChartPanel::Failed(err) => render_chart_error(f, panels[1], "Scatter", err),
    }

    render_charts_footer(f, chunks[3]);
}

fn render_charts_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", Theme::text()),
        Span::styled("Exploratory Analysis", Theme::title()),
        Span::styled(" │ Reference dataset by outcome", Theme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border()),
    );

    f.render_widget(header, area);
}

fn render_selectors(f: &mut Frame, area: Rect, state: &ViewState, focus: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let selectors = [
        ("Histogram", &state.histogram_column),
        ("Scatter X", &state.scatter_x),
        ("Scatter Y", &state.scatter_y),
    ];

    for (i, (title, column)) in selectors.into_iter().enumerate() {
        let focused = i == focus;
        let value_style = if focused {
            Theme::focused()
        } else {
            Theme::text()
        };
        let selector = Paragraph::new(Line::from(vec![
            Span::styled("◀ ", Theme::text_muted()),
            Span::styled(column.as_str(), value_style),
            Span::styled(" ▶", Theme::text_muted()),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(Span::styled(format!(" {title} "), Theme::subtitle()))
                .borders(Borders::ALL)
                .border_style(if focused {
                    Theme::border_focused()
                } else {
                    Theme::border()
                }),
        );
        f.render_widget(selector, cols[i]);
    }
}

fn legend_position(legend: &Legend) -> LegendPosition {
    match legend.anchor {
        LegendAnchor::TopCenter => LegendPosition::Top,
        LegendAnchor::TopRight => LegendPosition::TopRight,
    }
}

/// Pad a degenerate range so the axis has some width.
fn padded(lo: f64, hi: f64) -> [f64; 2] {
    if hi > lo {
        [lo, hi]
    } else {
        [lo - 1.0, hi + 1.0]
    }
}

fn axis_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        Span::styled(axis_label(bounds[0]), Theme::text_muted()),
        Span::styled(axis_label(mid), Theme::text_muted()),
        Span::styled(axis_label(bounds[1]), Theme::text_muted()),
    ]
}

fn render_histogram(f: &mut Frame, area: Rect, hist: &Histogram) {
    let width = hist.bins.first().map_or(1.0, |b| b.end - b.start);
    let offset = width * 0.2;

    // One bar per outcome, side by side inside each bin.
    let bars: Vec<Vec<(f64, f64)>> = (0..2)
        .map(|outcome| {
            let shift = if outcome == 0 { -offset } else { offset };
            hist.bins
                .iter()
                .map(|b| (b.center() + shift, b.counts[outcome] as f64))
                .collect()
        })
        .collect();

    let y_max = (hist.max_count().max(1)) as f64;
    let marker_line: Vec<(f64, f64)> = hist
        .marker
        .map(|m| vec![(m, 0.0), (m, y_max)])
        .unwrap_or_default();

    let (mut x0, mut x1) = hist.x_range().unwrap_or((0.0, 1.0));
    if let Some(m) = hist.marker {
        x0 = x0.min(m);
        x1 = x1.max(m);
    }
    let x_bounds = padded(x0, x1);
    let y_bounds = [0.0, y_max];

    let mut datasets: Vec<Dataset> = bars
        .iter()
        .enumerate()
        .map(|(outcome, points)| {
            Dataset::default()
                .name(format!("{LEGEND_TITLE} {outcome}"))
                .marker(Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Theme::outcome(outcome as u8))
                .data(points)
        })
        .collect();

    if !marker_line.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Sample")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Theme::sample_marker())
                .data(&marker_line),
        );
    }

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" Histogram of {} ", hist.column),
                    Theme::subtitle(),
                ))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(hist.column.as_str(), Theme::text_secondary()))
                .style(Theme::border())
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("count", Theme::text_secondary()))
                .style(Theme::border())
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        )
        .legend_position(Some(legend_position(&hist.legend)))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    f.render_widget(chart, area);
}

fn render_scatter(f: &mut Frame, area: Rect, scatter: &Scatter) {
    let (x0, x1, y0, y1) = scatter.bounds().unwrap_or((0.0, 1.0, 0.0, 1.0));
    let x_bounds = padded(x0, x1);
    let y_bounds = padded(y0, y1);

    let sample: Vec<(f64, f64)> = scatter
        .annotation
        .as_ref()
        .map(|a| vec![(a.x, a.y)])
        .unwrap_or_default();

    let mut datasets: Vec<Dataset> = scatter
        .series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(format!("{LEGEND_TITLE} {}", s.outcome))
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Theme::outcome(s.outcome))
                .data(&s.points)
        })
        .collect();

    if let Some(annotation) = &scatter.annotation {
        datasets.push(
            Dataset::default()
                .name(format!("{} ←", annotation.text))
                .marker(Marker::Block)
                .graph_type(GraphType::Scatter)
                .style(Theme::sample_marker())
                .data(&sample),
        );
    }

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {} vs {} ", scatter.x_column, scatter.y_column),
                    Theme::subtitle(),
                ))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(scatter.x_column.as_str(), Theme::text_secondary()))
                .style(Theme::border())
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(scatter.y_column.as_str(), Theme::text_secondary()))
                .style(Theme::border())
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        )
        .legend_position(Some(legend_position(&scatter.legend)))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    f.render_widget(chart, area);
}

fn render_chart_error(f: &mut Frame, area: Rect, title: &str, err: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Chart could not be drawn", Theme::danger())),
        Line::from(""),
        Line::from(Span::styled(err, Theme::text_secondary())),
    ];

    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(format!(" {title} "), Theme::subtitle()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

    f.render_widget(p, area);
}

fn render_charts_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[↑↓] ", Theme::key_hint()),
        Span::styled("Select chart input ", Theme::key_desc()),
        Span::styled("[←→] ", Theme::key_hint()),
        Span::styled("Change column ", Theme::key_desc()),
        Span::styled("[Enter] ", Theme::key_hint()),
        Span::styled("Classify", Theme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border()),
    );

    f.render_widget(footer, area);
}
