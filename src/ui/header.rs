//! Header Component
//!
//! Displays the service URL, the open route, and fetch status.

use crate::app::App;
use crate::resource::FetchState;
use crate::view::ListFragment;
use crate::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, list: Option<&ListFragment>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" ttargets v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let service_line = Line::from(vec![
        Span::styled(" Service: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.client.base_url().to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Route: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.route_label(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(service_line), rows[0]);

    let (state_text, state_color) = match app.fetch_state() {
        FetchState::Unfetched => ("idle".to_string(), Color::DarkGray),
        FetchState::Pending => ("fetching".to_string(), Color::Yellow),
        FetchState::Resolved => ("loaded".to_string(), Color::Green),
        FetchState::Rejected(_) => ("failed".to_string(), Color::Red),
    };

    let mut status_spans = vec![
        Span::styled(" Status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(state_text, Style::default().fg(state_color)),
    ];
    if let Some(fragment) = list {
        status_spans.push(Span::raw("  "));
        status_spans.push(Span::styled("Count: ", Style::default().fg(Color::DarkGray)));
        status_spans.push(Span::styled(
            fragment.rows.len().to_string(),
            Style::default().fg(Color::White),
        ));
        if fragment.rows.len() != fragment.total {
            status_spans.push(Span::styled(
                format!(" (filtered from {})", fragment.total),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    status_spans.push(Span::styled(
        "   ?:help  ::cmd  /:filter  q:quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(status_spans)), rows[1]);
}
