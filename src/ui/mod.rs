//! Terminal User Interface rendering module
//!
//! This module handles all UI rendering for ttargets using the ratatui
//! framework. The list route is drawn as a table, the item route as a
//! detail page with the record's JSON below it.
//!
//! # Architecture
//!
//! - `header` - Header bar with service and route info
//! - `help` - Help overlay showing keybindings
//! - `command_box` - Command mode input (`:` key)
//!
//! # Virtual Scrolling
//!
//! The table rendering uses virtual scrolling for performance with large
//! collections. Only visible rows are rendered, with a scrollbar indicating
//! position.

mod command_box;
mod header;
mod help;

use crate::app::{App, Mode};
use crate::resource::FetchState;
use crate::view::{ActiveView, ItemFragment, ListFragment, Renderable};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        Table, TableState,
    },
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(1),    // Current route
            Constraint::Length(1), // Footer/crumb
        ])
        .split(f.area());

    // Rendered once per frame and shared by the header and the table
    let list = app.list_fragment();
    header::render(f, app, list.as_ref(), chunks[0]);

    let item = match list {
        Some(_) => None,
        None => app.item_view().map(|view| view.render()),
    };
    match (list, item) {
        (Some(fragment), _) => render_list_route(f, app, &fragment, chunks[1]),
        (None, Some(fragment)) => render_item_route(f, app, &fragment, chunks[1]),
        (None, None) => render_placeholder(f, "No route open. Press : to open one.", chunks[1]),
    }

    render_crumb(f, app, chunks[2]);

    match app.mode {
        Mode::Help => help::render(f),
        Mode::Command => command_box::render(f, app),
        Mode::Normal => {},
    }
}

fn render_placeholder(f: &mut Frame, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(paragraph, area);
}

fn render_list_route(f: &mut Frame, app: &mut App, fragment: &ListFragment, area: Rect) {
    let show_filter = app.filter_active || !app.filter_text().is_empty();

    if show_filter {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        render_filter_bar(f, app, chunks[0]);
        render_table(f, app, fragment, chunks[1]);
    } else {
        render_table(f, app, fragment, area);
    }
}

fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let cursor_style = if app.filter_active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let filter_display = if app.filter_active {
        format!("/{}_", app.filter_text())
    } else {
        format!("/{}", app.filter_text())
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(filter_display, cursor_style)]));
    f.render_widget(paragraph, area);
}

/// Render the home table, only the rows in the viewport
fn render_table(f: &mut Frame, app: &mut App, fragment: &ListFragment, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            fragment.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if let Some(message) = &fragment.message {
        let style = match app.fetch_state() {
            FetchState::Rejected(_) => Style::default().fg(Color::Red),
            FetchState::Pending => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::DarkGray),
        };
        let paragraph = Paragraph::new(message.as_str())
            .style(style)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, inner_area);
        return;
    }

    // Account for the header row
    let visible_height = (inner_area.height as usize).saturating_sub(1);
    let total_rows = fragment.rows.len();
    app.update_viewport(visible_height);
    app.ensure_visible(total_rows);

    let needs_scrollbar = total_rows > visible_height;
    let table_area = if needs_scrollbar {
        Rect {
            width: inner_area.width.saturating_sub(1),
            ..inner_area
        }
    } else {
        inner_area
    };

    let (sort_column, ascending) = app
        .list_view()
        .map(|v| (v.sorter.column(), v.sorter.is_ascending()))
        .unwrap_or((None, true));

    let header_cells: Vec<Cell> = fragment
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let text = match (sort_column == Some(idx), ascending) {
                (true, true) => format!(" {} ▲", header),
                (true, false) => format!(" {} ▼", header),
                (false, _) => format!(" {}", header),
            };
            Cell::from(text).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    let header = Row::new(header_cells).height(1);

    let range = app.visible_range(total_rows);
    let rows: Vec<Row> = fragment.rows[range.clone()]
        .iter()
        .map(|row| {
            Row::new(
                row.cells
                    .iter()
                    .map(|cell| Cell::from(format!(" {}", truncate_string(cell, 38)))),
            )
        })
        .collect();

    let widths: Vec<Constraint> = fragment
        .widths
        .iter()
        .map(|w| Constraint::Percentage(*w))
        .collect();

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    if range.contains(&app.selected) {
        state.select(Some(app.selected - range.start));
    }

    f.render_stateful_widget(table, table_area, &mut state);

    if needs_scrollbar {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .symbols(symbols::scrollbar::VERTICAL)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        let mut scrollbar_state = ScrollbarState::new(total_rows.saturating_sub(visible_height))
            .position(app.scroll_offset);

        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// Truncate string for display (Unicode-safe)
fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Render the detail page: template fields, then the record JSON
fn render_item_route(f: &mut Frame, app: &mut App, fragment: &ItemFragment, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" Target: {} ", fragment.title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = match app.fetch_state() {
        FetchState::Pending => vec![Line::from(Span::styled(
            "Loading target...",
            Style::default().fg(Color::Yellow),
        ))],
        FetchState::Rejected(msg) => vec![Line::from(Span::styled(
            msg,
            Style::default().fg(Color::Red),
        ))],
        _ => item_lines(fragment),
    };

    let total_lines = lines.len();
    let visible_lines = inner_area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible_lines);
    app.describe_scroll = app.describe_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines).scroll((app.describe_scroll as u16, 0));
    f.render_widget(paragraph, inner_area);

    if total_lines > visible_lines {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state =
            ScrollbarState::new(max_scroll + visible_lines).position(app.describe_scroll);
        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

fn item_lines(fragment: &ItemFragment) -> Vec<Line<'static>> {
    let label_width = fragment
        .fields
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line<'static>> = fragment
        .fields
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:width$}  ", label, width = label_width),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(value.clone(), Style::default().fg(Color::White)),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.extend(fragment.json.lines().map(highlight_json_line));
    lines
}

/// Apply JSON syntax highlighting to a single line
fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = line.chars().peekable();
    let mut current = String::new();
    let mut is_key = true;

    let flush = |current: &mut String, spans: &mut Vec<Span<'static>>| {
        if !current.is_empty() {
            spans.push(Span::styled(current.clone(), json_value_style(current)));
            current.clear();
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                flush(&mut current, &mut spans);

                let mut quoted = String::from("\"");
                while let Some(next_c) = chars.next() {
                    quoted.push(next_c);
                    if next_c == '\\' {
                        if let Some(escaped) = chars.next() {
                            quoted.push(escaped);
                        }
                    } else if next_c == '"' {
                        break;
                    }
                }

                let color = if is_key { Color::Cyan } else { Color::Green };
                spans.push(Span::styled(quoted, Style::default().fg(color)));
            },
            ':' => {
                flush(&mut current, &mut spans);
                spans.push(Span::styled(":", Style::default().fg(Color::White)));
                is_key = false;
            },
            ',' => {
                flush(&mut current, &mut spans);
                spans.push(Span::styled(",", Style::default().fg(Color::White)));
                is_key = true;
            },
            '{' | '}' | '[' | ']' => {
                flush(&mut current, &mut spans);
                spans.push(Span::styled(c.to_string(), Style::default().fg(Color::Yellow)));
                if c == '{' || c == '[' {
                    is_key = c == '{';
                }
            },
            ' ' | '\t' => {
                flush(&mut current, &mut spans);
                spans.push(Span::raw(c.to_string()));
            },
            _ => current.push(c),
        }
    }

    flush(&mut current, &mut spans);
    Line::from(spans)
}

/// Style for JSON scalars (numbers, booleans, null)
fn json_value_style(value: &str) -> Style {
    let trimmed = value.trim();
    if trimmed == "null" {
        Style::default().fg(Color::DarkGray)
    } else if trimmed == "true" || trimmed == "false" {
        Style::default().fg(Color::Magenta)
    } else if trimmed.parse::<f64>().is_ok() {
        Style::default().fg(Color::LightBlue)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_crumb(f: &mut Frame, app: &App, area: Rect) {
    let crumb_display = app.get_breadcrumb().join(" > ");

    let (status_text, style) = if let Some(err) = &app.error_message {
        (
            format!("Error: {}", err),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else if let FetchState::Rejected(msg) = app.fetch_state() {
        (
            format!("Error: {}", msg),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else if app.fetch_state().is_pending() {
        ("Loading...".to_string(), Style::default().fg(Color::Yellow))
    } else if app.filter_active {
        (
            "Type to filter | Enter: apply | Esc: clear".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        let hint = match &app.view {
            Some(ActiveView::List(_)) => "Enter: open | /: filter | F1-F6: sort | ?: help",
            Some(ActiveView::Item(_)) => "j/k: scroll | b: back | R: reload | ?: help",
            None => ":: command | ?: help",
        };
        let updated = app
            .last_updated
            .map(|t| format!("updated {} | ", t.format("%H:%M:%S")))
            .unwrap_or_default();
        (
            format!("{}{}", updated, hint),
            Style::default().fg(Color::DarkGray),
        )
    };

    let crumb = Line::from(vec![
        Span::styled(
            format!("<{}>", crumb_display),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(status_text, style),
    ]);

    f.render_widget(Paragraph::new(crumb), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_is_unicode_safe() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("ααααααααααα", 6), "ααα...");
    }

    #[test]
    fn test_highlight_keeps_text() {
        let line = highlight_json_line(r#"  "label": "CTCF","#);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, r#"  "label": "CTCF","#);
    }

    #[test]
    fn test_highlight_handles_escaped_quotes() {
        let line = highlight_json_line(r#""note": "a \"quoted\" word""#);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, r#""note": "a \"quoted\" word""#);
    }

    #[test]
    fn test_item_lines_lists_fields_then_json() {
        let fragment = ItemFragment {
            title: "CTCF".to_string(),
            fields: vec![("ID".to_string(), "42".to_string())],
            json: "{\n  \"id\": \"42\"\n}".to_string(),
        };
        let lines = item_lines(&fragment);
        assert_eq!(lines.len(), 1 + 1 + 3);
    }
}
