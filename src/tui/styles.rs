//! Color palette and styles.
//!
//! Dark navy background with a teal accent; result panels are filled with
//! the danger level's color.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{DangerLevel, Rgb};

/// Application theme.
pub struct Theme;

impl Theme {
    // === Palette ===

    /// Teal accent
    pub const ACCENT: Color = Color::Rgb(22, 224, 189); // #16E0BD

    /// Lighter navy for highlighted controls
    pub const NAVY_LIGHT: Color = Color::Rgb(31, 92, 138); // #1F5C8A

    /// Window background
    pub const BG_DARK: Color = Color::Rgb(26, 26, 46); // #1A1A2E

    /// Input field background
    pub const BG_INPUT: Color = Color::Rgb(22, 33, 62); // #16213E

    pub const TEXT_PRIMARY: Color = Color::White;

    pub const TEXT_SECONDARY: Color = Color::Rgb(176, 184, 204);

    pub const TEXT_MUTED: Color = Color::Rgb(110, 118, 140);

    /// Dialog close/error red
    pub const DANGER: Color = Color::Rgb(255, 0, 0); // #FF0000

    // === Preset Styles ===

    /// Base style for the whole screen
    #[must_use]
    pub fn base() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY).bg(Self::BG_DARK)
    }

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::ACCENT)
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

    /// Style for the focused field title
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Input field body
    #[must_use]
    pub fn input() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY).bg(Self::BG_INPUT)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::NAVY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    /// Busy indicator bar
    #[must_use]
    pub fn gauge() -> Style {
        Style::default().fg(Self::ACCENT).bg(Self::BG_DARK)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Result panel filled with the danger level's color, black text.
    #[must_use]
    pub fn danger_level(level: DangerLevel) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::color(level.color()))
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn color(rgb: Rgb) -> Color {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danger_level_fill_colors() {
        assert_eq!(
            Theme::danger_level(DangerLevel::Low).bg,
            Some(Color::Rgb(0, 255, 0))
        );
        assert_eq!(
            Theme::danger_level(DangerLevel::Moderate).bg,
            Some(Color::Rgb(255, 255, 0))
        );
        assert_eq!(
            Theme::danger_level(DangerLevel::High).bg,
            Some(Color::Rgb(255, 0, 0))
        );
    }
}
