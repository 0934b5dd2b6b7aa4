use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::types::Notification;

pub fn render(frame: &mut Frame, notification: Option<&Notification>, area: Rect) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Details")
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(n) = notification else {
        let empty = Paragraph::new("No notification selected")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    };

    let label = Style::default().fg(Color::Gray);
    let (state, state_color) = if n.unread {
        ("Unread", Color::Blue)
    } else {
        ("Read", Color::DarkGray)
    };

    let lines = vec![
        Line::from(Span::styled(
            n.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Repository: ", label),
            Span::styled(n.repository.as_str(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Type:       ", label),
            Span::styled(n.subject_type.as_str(), Style::default().fg(Color::Magenta)),
        ]),
        Line::from(vec![
            Span::styled("Reason:     ", label),
            Span::raw(n.reason.label()),
        ]),
        Line::from(vec![
            Span::styled("State:      ", label),
            Span::styled(
                state,
                Style::default()
                    .fg(state_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Updated:    ", label),
            Span::raw(n.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Thread:     ", label),
            Span::raw(n.thread_id.as_str()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            if n.url.is_empty() { "(no link)" } else { n.url.as_str() },
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        )),
    ];

    let detail = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}
