//! UI module: View components for the TUI.

pub mod dialog;
pub mod form;
pub mod loading;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::styles::Theme;

/// A `width` x `height` rectangle centered in `area`, clipped to fit.
#[must_use]
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// One-line status bar naming the loaded model.
pub fn render_status_bar(f: &mut Frame, area: Rect, model: Option<&str>) {
    let line = match model {
        Some(description) => Line::from(vec![
            Span::styled(" Model: ", Theme::text_muted()),
            Span::styled(description, Theme::text_secondary()),
        ]),
        None => Line::from(Span::styled(" Model not loaded", Theme::danger())),
    };

    f.render_widget(Paragraph::new(line), area);
}
