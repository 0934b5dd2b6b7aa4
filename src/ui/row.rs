use chrono::{DateTime, Utc};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Column;
use crate::render_cache::LayoutKey;
use crate::types::Notification;

const MARK_WIDTH: usize = 2;
const TYPE_WIDTH: usize = 10;
const REPO_WIDTH: usize = 24;
const REASON_WIDTH: usize = 16;
const AGE_WIDTH: usize = 4;
const MIN_TITLE_WIDTH: usize = 10;

fn visible(layout: &LayoutKey, column: Column) -> bool {
    !layout.hidden_columns.contains(&column)
}

/// Width left for the title after the fixed columns and their gaps.
fn title_width(layout: &LayoutKey) -> usize {
    let fixed: usize = [
        (Column::Type, TYPE_WIDTH),
        (Column::Repository, REPO_WIDTH),
        (Column::Reason, REASON_WIDTH),
        (Column::Updated, AGE_WIDTH),
    ]
    .iter()
    .filter(|(column, _)| visible(layout, *column))
    .map(|(_, width)| width + 1)
    .sum();
    usize::from(layout.width)
        .saturating_sub(MARK_WIDTH + fixed)
        .max(MIN_TITLE_WIDTH)
}

/// Cut `text` to at most `width` display columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Truncate and then pad with spaces to exactly `width` columns.
pub fn fit(text: &str, width: usize) -> String {
    let mut out = truncate(text, width);
    let used = out.width();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

pub fn format_age(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(dt);

    if duration.num_days() > 0 {
        format!("{}d", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m", duration.num_minutes())
    } else {
        "now".to_string()
    }
}

pub fn render_row(
    n: &Notification,
    selected: bool,
    layout: &LayoutKey,
    now: DateTime<Utc>,
) -> Line<'static> {
    let title_style = match (selected, n.unread) {
        (true, _) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        (false, true) => Style::default().add_modifier(Modifier::BOLD),
        (false, false) => Style::default().fg(Color::Gray),
    };

    let mut spans = vec![Span::styled(
        if n.unread { "● " } else { "  " },
        Style::default().fg(Color::Blue),
    )];
    if visible(layout, Column::Type) {
        spans.push(Span::styled(
            fit(n.type_label(), TYPE_WIDTH),
            Style::default().fg(Color::Magenta),
        ));
        spans.push(Span::raw(" "));
    }
    if visible(layout, Column::Repository) {
        spans.push(Span::styled(
            fit(&n.repository, REPO_WIDTH),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw(" "));
    }
    if visible(layout, Column::Title) {
        spans.push(Span::styled(fit(&n.title, title_width(layout)), title_style));
        spans.push(Span::raw(" "));
    }
    if visible(layout, Column::Reason) {
        spans.push(Span::styled(
            fit(n.reason.label(), REASON_WIDTH),
            Style::default().fg(Color::Gray),
        ));
        spans.push(Span::raw(" "));
    }
    if visible(layout, Column::Updated) {
        spans.push(Span::styled(
            format_age(n.updated_at, now),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let line = Line::from(spans);
    if selected {
        line.style(Style::default().bg(Color::DarkGray))
    } else {
        line
    }
}

pub fn header_line(layout: &LayoutKey) -> Line<'static> {
    let style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::raw(" ".repeat(MARK_WIDTH))];
    let columns = [
        (Column::Type, "Type", TYPE_WIDTH),
        (Column::Repository, "Repository", REPO_WIDTH),
        (Column::Title, "Title", title_width(layout)),
        (Column::Reason, "Reason", REASON_WIDTH),
        (Column::Updated, "Age", AGE_WIDTH),
    ];
    for (column, name, width) in columns {
        if visible(layout, column) {
            spans.push(Span::styled(fit(name, width), style));
            spans.push(Span::raw(" "));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::types::fixtures::{base_time, notification};

    fn layout(width: u16, hidden: Vec<Column>) -> LayoutKey {
        LayoutKey {
            width,
            height: 20,
            hidden_columns: hidden,
            item_height: 1,
        }
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn truncate_by_display_width() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn fit_pads_to_width() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4).width(), 4);
    }

    #[test]
    fn format_age_units() {
        let now = base_time();
        assert_eq!(format_age(now - Duration::days(3), now), "3d");
        assert_eq!(format_age(now - Duration::hours(5), now), "5h");
        assert_eq!(format_age(now - Duration::minutes(7), now), "7m");
        assert_eq!(format_age(now, now), "now");
    }

    #[test]
    fn row_contains_visible_columns() {
        let n = notification("1", "acme/widgets", "Fix the flux capacitor", -2);
        let line = render_row(&n, false, &layout(120, Vec::new()), base_time());
        let rendered = text(&line);
        assert!(rendered.starts_with("● Issue"));
        assert!(rendered.contains("acme/widgets"));
        assert!(rendered.contains("Fix the flux capacitor"));
        assert!(rendered.contains("Mentioned"));
        assert!(rendered.ends_with("2h"));
    }

    #[test]
    fn hidden_columns_are_skipped() {
        let n = notification("1", "acme/widgets", "Title", 0);
        let line = render_row(
            &n,
            false,
            &layout(120, vec![Column::Reason, Column::Repository]),
            base_time(),
        );
        let rendered = text(&line);
        assert!(!rendered.contains("Mentioned"));
        assert!(!rendered.contains("acme/widgets"));
    }

    #[test]
    fn row_and_header_line_up() {
        let l = layout(100, Vec::new());
        let n = notification("1", "acme/widgets", "Title", 0);
        let row = text(&render_row(&n, true, &l, base_time()));
        let header = text(&header_line(&l));
        let title_col = header.find("Title").unwrap();
        assert_eq!(row.find("Title"), Some(title_col + "●".len() - 1));
    }

    #[test]
    fn selected_row_is_highlighted() {
        let n = notification("1", "o/r", "t", 0);
        let line = render_row(&n, true, &layout(80, Vec::new()), base_time());
        assert_eq!(line.style.bg, Some(Color::DarkGray));
    }
}
