//! Busy indicator popup.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use crate::application::BusyIndicator;
use crate::tui::styles::Theme;

use super::centered_rect;

/// Render the indicator as a centered popup over `area`.
pub fn render_busy_indicator(f: &mut Frame, area: Rect, indicator: &BusyIndicator) {
    if !indicator.is_visible() {
        return;
    }

    let popup = centered_rect(44, 7, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border_focused())
        .style(Theme::base());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
        .margin(1)
        .split(inner);

    let label = Paragraph::new(Line::from(Span::styled(
        indicator.label(),
        Theme::subtitle(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(label, chunks[0]);

    let progress = indicator.progress();
    let gauge = Gauge::default()
        .gauge_style(Theme::gauge())
        .percent(u16::from(progress))
        .label(format!("{progress}%"));
    f.render_widget(gauge, chunks[1]);
}
