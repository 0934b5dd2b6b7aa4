use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;

/// Which set of bindings is live. Passed in by the caller, never stored globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    List,
    Detail,
    Search,
}

pub fn map_key(context: KeyContext, key: KeyEvent) -> Action {
    match context {
        KeyContext::Search => map_search_key(key),
        KeyContext::List | KeyContext::Detail => map_list_key(key),
    }
}

fn map_search_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::ExitSearchMode,
        KeyCode::Enter => Action::SearchConfirm,
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::SearchInput(c)
        }
        _ => Action::None,
    }
}

fn map_list_key(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('d') => Action::PageDown,
            KeyCode::Char('u') => Action::PageUp,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Action::NextSection,
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => Action::PrevSection,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('R') => Action::RefreshAll,
        KeyCode::Char('a') => Action::MarkRead,
        KeyCode::Char('d') => Action::MarkDone,
        KeyCode::Char('S') => Action::ToggleSort,
        KeyCode::Char('t') => Action::ToggleSmartFilter,
        KeyCode::Char('/') => Action::EnterSearchMode,
        KeyCode::Char('p') | KeyCode::Enter => Action::ToggleDetail,
        KeyCode::Char('o') => Action::OpenInBrowser,
        KeyCode::Char('y') => Action::YankUrl,
        _ => Action::None,
    }
}

/// Key hints for the status bar, as (keys, description) pairs.
pub fn help(context: KeyContext) -> &'static [(&'static str, &'static str)] {
    match context {
        KeyContext::List => &[
            ("j/k/g/G", "nav"),
            ("h/l", "sections"),
            ("a", "read"),
            ("d", "done"),
            ("S", "sort"),
            ("t", "this repo"),
            ("/", "search"),
            ("p", "preview"),
            ("o", "open"),
            ("r/R", "refresh"),
            ("q", "quit"),
        ],
        KeyContext::Detail => &[
            ("j/k", "nav"),
            ("a", "read"),
            ("d", "done"),
            ("o", "open"),
            ("y", "copy url"),
            ("p", "close preview"),
            ("q", "quit"),
        ],
        KeyContext::Search => &[("Enter", "apply"), ("Esc", "cancel")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn list_bindings() {
        assert!(matches!(map_key(KeyContext::List, key(KeyCode::Char('j'))), Action::ScrollDown));
        assert!(matches!(map_key(KeyContext::List, key(KeyCode::Char('a'))), Action::MarkRead));
        assert!(matches!(map_key(KeyContext::List, key(KeyCode::Char('d'))), Action::MarkDone));
        assert!(matches!(map_key(KeyContext::List, key(KeyCode::Char('S'))), Action::ToggleSort));
        assert!(matches!(
            map_key(KeyContext::List, key(KeyCode::Char('t'))),
            Action::ToggleSmartFilter
        ));
        assert!(matches!(map_key(KeyContext::Detail, key(KeyCode::Char('R'))), Action::RefreshAll));
    }

    #[test]
    fn control_d_pages_instead_of_marking_done() {
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(matches!(map_key(KeyContext::List, ctrl_d), Action::PageDown));
    }

    #[test]
    fn search_captures_text() {
        assert!(matches!(
            map_key(KeyContext::Search, key(KeyCode::Char('q'))),
            Action::SearchInput('q')
        ));
        assert!(matches!(map_key(KeyContext::Search, key(KeyCode::Esc)), Action::ExitSearchMode));
    }

    #[test]
    fn help_depends_on_context() {
        assert!(help(KeyContext::List).iter().any(|(k, _)| *k == "/"));
        assert!(!help(KeyContext::Search).iter().any(|(k, _)| *k == "/"));
    }
}
