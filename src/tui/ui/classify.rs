//! Classification view: sliders, button and result.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph},
    Frame,
};

use crate::application::ViewState;
use crate::domain::{Feature, FEATURE_COUNT, POSSIBLE_CLASSES};
use crate::tui::styles::Theme;

/// Focus index of the classify button (sliders use `0..FEATURE_COUNT`).
pub const BUTTON_FOCUS: usize = FEATURE_COUNT;

/// Render the classification view
pub fn render_classification(f: &mut Frame, area: Rect, state: &ViewState, focus: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                         // Header
            Constraint::Length(FEATURE_COUNT as u16 + 2),  // Sliders
            Constraint::Length(3),                         // Button
            Constraint::Min(4),                            // Result
            Constraint::Length(3),                         // Footer
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_sliders(f, chunks[1], state, focus);
    render_button(f, chunks[2], focus == BUTTON_FOCUS);
    render_result(f, chunks[3], state);
    render_footer(f, chunks[4]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", Theme::text()),
        Span::styled("Diabetes Classification", Theme::title()),
        Span::styled(" │ Classification with Trained Model", Theme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border()),
    );

    f.render_widget(header, area);
}

fn render_sliders(f: &mut Frame, area: Rect, state: &ViewState, focus: usize) {
    let block = Block::default()
        .title(Span::styled(" Measurements ", Theme::subtitle()))
        .borders(Borders::ALL)
        .border_style(if focus < FEATURE_COUNT {
            Theme::border_focused()
        } else {
            Theme::border()
        });
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); FEATURE_COUNT])
        .split(inner);

    for (i, feature) in Feature::ALL.into_iter().enumerate() {
        let selected = i == focus;
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(36),
                Constraint::Min(10),
                Constraint::Length(8),
            ])
            .split(rows[i]);

        let label_style = if selected {
            Theme::focused()
        } else {
            Theme::text_secondary()
        };
        let marker = if selected { "▶ " } else { "  " };
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(marker, Theme::focused()),
                Span::styled(format!("{}:", feature.label()), label_style),
            ])),
            cols[0],
        );

        let range = feature.slider();
        let ratio = ((state.slider(feature) - range.min) / (range.max - range.min)).clamp(0.0, 1.0);
        let gauge = LineGauge::default()
            .filled_style(if selected {
                Theme::focused()
            } else {
                Theme::border_focused()
            })
            .unfilled_style(Theme::text_muted())
            .label("")
            .ratio(ratio);
        f.render_widget(gauge, cols[1]);

        f.render_widget(
            Paragraph::new(Span::styled(&state.echo_labels[i], Theme::text()))
                .alignment(Alignment::Right),
            cols[2],
        );
    }
}

fn render_button(f: &mut Frame, area: Rect, focused: bool) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Percentage(35),
        ])
        .split(area);

    let button = Paragraph::new(Line::from(Span::styled(
        " Execute Classification ",
        Theme::button(focused),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    }));

    f.render_widget(button, cols[1]);
}

fn render_result(f: &mut Frame, area: Rect, state: &ViewState) {
    let label = state.prediction.map(|p| p.label);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            state.classification.as_str(),
            Theme::result(label),
        )),
    ];
    if let Some(p) = &state.prediction {
        lines.push(Line::from(Span::styled(
            format!("classified at {}", p.created_at.format("%H:%M:%S UTC")),
            Theme::text_muted(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        POSSIBLE_CLASSES,
        Theme::info().add_modifier(Modifier::BOLD),
    )));

    let result = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(Span::styled(" Classification result ", Theme::subtitle()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    f.render_widget(result, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[↑↓] ", Theme::key_hint()),
        Span::styled("Select ", Theme::key_desc()),
        Span::styled("[←→] ", Theme::key_hint()),
        Span::styled("Adjust ", Theme::key_desc()),
        Span::styled("[Home/End] ", Theme::key_hint()),
        Span::styled("Min/Max ", Theme::key_desc()),
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
