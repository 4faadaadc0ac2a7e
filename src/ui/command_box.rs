//! Command Box
//!
//! Route input with autocomplete.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

/// Suggestions shown at once
const MAX_SUGGESTIONS: usize = 8;

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(12)])
        .split(f.area());

    let command_area = chunks[1];
    f.render_widget(Clear, command_area);

    let inner_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(command_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Open route ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let input_para = Paragraph::new(input_line(app)).block(input_block);
    f.render_widget(input_para, inner_chunks[0]);

    let suggestions_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Routes (↑/↓ to select, Tab to complete) ",
            Style::default().fg(Color::DarkGray),
        ));

    // Keep the highlighted suggestion inside the window
    let first = app
        .command_suggestion_selected
        .saturating_sub(MAX_SUGGESTIONS - 1);

    let suggestions: Vec<ListItem> = app
        .command_suggestions
        .iter()
        .enumerate()
        .skip(first)
        .take(MAX_SUGGESTIONS)
        .map(|(i, cmd)| {
            let style = if i == app.command_suggestion_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Span::styled(format!("  {}", cmd), style))
        })
        .collect();

    f.render_widget(List::new(suggestions).block(suggestions_block), inner_chunks[1]);
}

/// Typed text followed by the rest of the previewed suggestion, dimmed
fn input_line(app: &App) -> Line<'_> {
    let prompt = Span::styled(":", Style::default().fg(Color::Cyan));
    let typed = Span::styled(app.command_text.as_str(), Style::default().fg(Color::White));

    let ghost = app
        .command_preview
        .as_deref()
        .and_then(|preview| preview.strip_prefix(app.command_text.as_str()));

    match ghost {
        Some(rest) if !rest.is_empty() => Line::from(vec![
            prompt,
            typed,
            Span::styled(rest, Style::default().fg(Color::DarkGray)),
        ]),
        _ => Line::from(vec![prompt, typed]),
    }
}
