//! Help Overlay
//!
//! Shows keyboard shortcuts and the available routes.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// (section, [(keys, description)])
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/k, ↑/↓", "Move up/down (scroll on a target page)"),
            ("gg / G", "Go to top / bottom"),
            ("Ctrl+d/u", "Page down/up"),
        ],
    ),
    (
        "Targets table",
        &[
            ("Enter/d", "Open the selected target"),
            ("/", "Filter rows, Esc to clear"),
            ("F1-F6", "Sort by column, again to reverse"),
            ("F12", "Back to server order"),
        ],
    ),
    (
        "Routes",
        &[
            (":targets", "Open the targets table"),
            (":target <id>", "Open one target"),
            (":/targets/<id>", "Open a resource path"),
            ("b/Backspace", "Go back"),
            ("R", "Fetch the current route again"),
        ],
    ),
    (
        "General",
        &[("?/Esc", "Close help"), ("q, Ctrl+c", "Quit")],
    ),
];

pub fn render(f: &mut Frame) {
    let popup_area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (section, entries) in SECTIONS {
        help_text.push(Line::from(Span::styled(
            *section,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (keys, description) in *entries {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<16}", keys), Style::default().fg(Color::Yellow)),
                Span::raw(*description),
            ]));
        }
        help_text.push(Line::from(""));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
