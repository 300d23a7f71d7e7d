//! Color palette and styles for the terminal views.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::ClassLabel;

/// Clinical theme color palette.
pub struct Theme;

impl Theme {
    /// Deep teal - Primary color
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Darker teal for the focused button
    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110); // #0F766E

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Emerald - Outcome 0
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Rose - Outcome 1 and errors
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Amber - sample marker
    pub const ACCENT: Color = Color::Rgb(251, 191, 36); // #FBBF24

    /// Rust orange used for the classification result
    pub const RESULT: Color = Color::Rgb(152, 62, 15); // #983E0F

    /// Blue - legend of possible classes
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for the classify button
    #[must_use]
    pub fn button(focused: bool) -> Style {
        let style = Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD);
        if focused {
            style.bg(Self::PRIMARY_DARK)
        } else {
            style.bg(Self::TEXT_MUTED)
        }
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Series color for a dataset outcome.
    #[must_use]
    pub fn outcome(outcome: u8) -> Style {
        if outcome == 0 {
            Style::default().fg(Self::SUCCESS)
        } else {
            Style::default().fg(Self::DANGER)
        }
    }

    /// Style of the sample line/point drawn over the charts.
    #[must_use]
    pub fn sample_marker() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of the classification text.
    #[must_use]
    pub fn result(label: Option<ClassLabel>) -> Style {
        let style = Style::default().add_modifier(Modifier::BOLD);
        match label {
            Some(l) => style.patch(Self::outcome(l.value())),
            None => style.fg(Self::RESULT),
        }
    }
}
