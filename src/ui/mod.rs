mod detail;
pub mod row;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::config::Column;
use crate::keys;
use crate::render_cache::LayoutKey;

const DETAIL_PERCENT: u16 = 40;

fn split_frame(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

fn split_body(area: Rect, show_detail: bool) -> (Rect, Option<Rect>) {
    if !show_detail {
        return (area, None);
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(100 - DETAIL_PERCENT),
            Constraint::Percentage(DETAIL_PERCENT),
        ])
        .split(area);
    (chunks[0], Some(chunks[1]))
}

/// Row area of the list pane: inside the borders, below the column header.
fn rows_area(list: Rect) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(list);
    Rect {
        y: inner.y.saturating_add(1),
        height: inner.height.saturating_sub(1),
        ..inner
    }
}

/// Layout of the notification rows for a terminal of the given size.
pub fn list_layout(
    width: u16,
    height: u16,
    show_detail: bool,
    hidden_columns: &[Column],
    item_height: u16,
) -> LayoutKey {
    let (_, body, _) = split_frame(Rect::new(0, 0, width, height));
    let (list, _) = split_body(body, show_detail);
    let rows = rows_area(list);
    LayoutKey {
        width: rows.width,
        height: rows.height,
        hidden_columns: hidden_columns.to_vec(),
        item_height,
    }
}

pub fn render(frame: &mut Frame, app: &App) {
    let (header, body, status) = split_frame(frame.area());
    let (list, detail_area) = split_body(body, app.show_detail);

    render_header(frame, app, header);
    render_list(frame, app, list);
    if let Some(area) = detail_area {
        detail::render(frame, app.active_section().and_then(|s| s.selected()), area);
    }
    render_status_bar(frame, app, status);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " nudge ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    for (i, section) in app.sections.iter().enumerate() {
        let style = if i == app.active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{} ({})", section.title, section.items().len()),
            style,
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let Some(section) = app.active_section() else {
        return;
    };

    let count = section.items().len();
    let more = if section.cursor().has_more && section.cursor().current_page > 0 {
        "+"
    } else {
        ""
    };
    let viewport = section.viewport();
    let mut title = format!(" {} ({}{}) ", section.title, count, more);
    if count > 0 {
        title.push_str(&format!("· {}-{} ", viewport.top() + 1, viewport.bottom() + 1));
    }
    title.push_str(&format!("· {} ", section.sort_mode()));
    if let Some(repo) = section.smart_scope() {
        title.push_str(&format!("· @{} ", repo));
    }
    if !section.search().is_empty() {
        title.push_str(&format!("· /{} ", section.search()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(Color::Yellow));

    if count == 0 {
        let message = if section.is_loading() {
            "Loading..."
        } else {
            "No notifications"
        };
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let mut lines = Vec::with_capacity(section.lines().len() + 1);
    lines.push(row::header_line(section.layout()));
    lines.extend(section.lines().iter().cloned());

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else if app.search_mode {
        Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(app.search_input.as_str()),
            Span::styled("█", Style::default().fg(Color::Gray)),
        ])
    } else if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Green),
        )])
    } else if app.active_section().is_some_and(|s| s.is_loading()) {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = keys::help(app.key_context())
            .iter()
            .map(|(key, what)| format!("{}: {}", key, what))
            .collect::<Vec<_>>()
            .join(" | ");
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_layout_accounts_for_chrome() {
        let layout = list_layout(100, 30, false, &[], 1);
        // header + status bar, two borders, column header
        assert_eq!(layout.height, 30 - 2 - 2 - 1);
        assert_eq!(layout.width, 98);
    }

    #[test]
    fn detail_pane_narrows_list() {
        let wide = list_layout(100, 30, false, &[], 1);
        let narrow = list_layout(100, 30, true, &[Column::Reason], 2);
        assert!(narrow.width < wide.width);
        assert_eq!(narrow.height, wide.height);
        assert_eq!(narrow.item_height, 2);
        assert_eq!(narrow.hidden_columns, vec![Column::Reason]);
    }

    #[test]
    fn tiny_terminal_does_not_underflow() {
        let layout = list_layout(3, 2, true, &[], 1);
        assert_eq!(layout.height, 0);
    }
}
