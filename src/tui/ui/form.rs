//! Patient form and result panel.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::application::{FieldId, FieldKind, FormSession};
use crate::tui::styles::Theme;

/// Fields shown in the left column; the rest go right.
const LEFT_COLUMN_LEN: usize = 7;

/// Render the form screen: header, fields, result panel and key hints.
pub fn render_form(f: &mut Frame, area: Rect, session: &FormSession, busy: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Fields
            Constraint::Length(5), // Result
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], session);
    render_result_panel(f, chunks[2], session);
    render_form_footer(f, chunks[3], busy);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", Theme::text()),
        Span::styled("Patient Risk Predictor", Theme::title()),
        Span::styled(" │ Patient Details", Theme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, session: &FormSession) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let (left, right) = FieldId::ALL.split_at(LEFT_COLUMN_LEN);
    render_field_column(f, columns[0], session, left);
    render_field_column(f, columns[1], session, right);
}

fn render_field_column(f: &mut Frame, area: Rect, session: &FormSession, fields: &[FieldId]) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let selected = session.selected_field();

    for (i, field) in fields.iter().enumerate() {
        let is_selected = *field == selected;
        let (border_style, title_style) = if is_selected {
            (Theme::border_focused(), Theme::focused())
        } else {
            (Theme::border(), Theme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Theme::input());

        let value = session.display_value(*field);
        let mut spans = vec![Span::raw(" ")];
        match field.kind() {
            FieldKind::Choice if !value.is_empty() => {
                spans.push(Span::styled("‹ ", Theme::text_muted()));
                spans.push(Span::styled(value, Theme::text()));
                spans.push(Span::styled(" ›", Theme::text_muted()));
            }
            _ if value.is_empty() => {
                spans.push(Span::styled(field.hint(), Theme::text_muted()));
            }
            _ => spans.push(Span::styled(value, Theme::text())),
        }
        if is_selected {
            spans.push(Span::styled("▌", Theme::cursor()));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_result_panel(f: &mut Frame, area: Rect, session: &FormSession) {
    let block = Block::default()
        .title(Span::styled(" Test Result ", Theme::subtitle()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let content = match session.result() {
        Some(display) => {
            let style = Theme::danger_level(display.result.danger_level);
            let lines: Vec<Line> = display
                .lines()
                .into_iter()
                .map(|line| Line::from(Span::styled(line, style)))
                .collect();
            Paragraph::new(lines).style(style).block(block)
        }
        None => Paragraph::new(Line::from(Span::styled(
            "Test Result:",
            Theme::text_muted(),
        )))
        .block(block),
    };

    f.render_widget(content.alignment(Alignment::Left), area);
}

fn render_form_footer(f: &mut Frame, area: Rect, busy: bool) {
    let content = if busy {
        Line::from(Span::styled("Predicting...", Theme::text_muted()))
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", Theme::key_hint()),
            Span::styled("Navigate ", Theme::key_desc()),
            Span::styled("[←→] ", Theme::key_hint()),
            Span::styled("Select ", Theme::key_desc()),
            Span::styled("[Enter] ", Theme::key_hint()),
            Span::styled("Predict ", Theme::key_desc()),
            Span::styled("[F1] ", Theme::key_hint()),
            Span::styled("About ", Theme::key_desc()),
            Span::styled("[^S] ", Theme::key_hint()),
            Span::styled("Sample ", Theme::key_desc()),
            Span::styled("[^R] ", Theme::key_hint()),
            Span::styled("Reset ", Theme::key_desc()),
            Span::styled("[^Q] ", Theme::key_hint()),
            Span::styled("Quit", Theme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border()),
    );

    f.render_widget(footer, area);
}
