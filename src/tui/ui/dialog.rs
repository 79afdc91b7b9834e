//! Blocking dialogs: About and error reports.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::Theme;
use crate::RiskError;

use super::centered_rect;

pub const ABOUT_TITLE: &str = "Patient Risk Predictor";

const CREDITS: [&str; 2] = [
    "Programmer: Ahmed Atef",
    "Under supervision of: Abd Elrahman Yehiya",
];

/// A dialog that blocks form input until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    About {
        /// Loaded model description, `None` if the model failed to load
        model: Option<String>,
    },
    Error {
        title: &'static str,
        message: String,
    },
}

impl Dialog {
    #[must_use]
    pub fn from_error(error: &RiskError) -> Self {
        Self::Error {
            title: error.dialog_title(),
            message: error.to_string(),
        }
    }
}

/// Render `dialog` centered over `area`.
pub fn render_dialog(f: &mut Frame, area: Rect, dialog: &Dialog) {
    match dialog {
        Dialog::About { model } => render_about(f, area, model.as_deref()),
        Dialog::Error { title, message } => render_error(f, area, title, message),
    }
}

fn render_about(f: &mut Frame, area: Rect, model: Option<&str>) {
    let popup = centered_rect(56, 11, area);
    f.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(ABOUT_TITLE, Theme::title())),
        Line::from(""),
    ];
    lines.extend(
        CREDITS
            .iter()
            .map(|credit| Line::from(Span::styled(*credit, Theme::text_secondary()))),
    );
    lines.push(Line::from(""));
    lines.push(match model {
        Some(description) => Line::from(vec![
            Span::styled("Model: ", Theme::text_muted()),
            Span::styled(description, Theme::text()),
        ]),
        None => Line::from(Span::styled("Model: not loaded", Theme::danger())),
    });
    lines.push(Line::from(Span::styled("[Enter] Close", Theme::key_hint())));

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(Span::styled(" About ", Theme::subtitle()))
                .borders(Borders::ALL)
                .border_style(Theme::border_focused())
                .style(Theme::base()),
        );

    f.render_widget(content, popup);
}

fn render_error(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let popup = centered_rect(60, 8, area);
    f.render_widget(Clear, popup);

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Theme::text())),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Theme::key_hint())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(format!(" {title} "), Theme::danger()))
            .borders(Borders::ALL)
            .border_style(Theme::danger())
            .style(Theme::base()),
    );

    f.render_widget(content, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_dialog_text() {
        let dialog = Dialog::from_error(&RiskError::ModelUnavailable);
        assert_eq!(
            dialog,
            Dialog::Error {
                title: "Error",
                message: "Model could not be loaded. Please check the model path.".to_string(),
            }
        );

        let dialog = Dialog::from_error(&RiskError::PredictionFailed("bad input".into()));
        assert_eq!(
            dialog,
            Dialog::Error {
                title: "Prediction Error",
                message: "An error occurred during prediction: bad input".to_string(),
            }
        );
    }
}
