//! Memoized text for the visible rows of a list.
//!
//! Moving the cursor in a long list only changes two rows, so instead of
//! rebuilding the whole window the cache re-renders the row that lost the
//! selection and the row that gained it, and splices them in place.

use std::ops::Range;

use ratatui::text::Line;

use crate::config::Column;
use crate::viewport::Viewport;

/// Lists at or below this length are always fully re-rendered.
pub const SELECTION_ONLY_THRESHOLD: usize = 50;

/// Everything about the pane that changes how a row is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutKey {
    pub width: u16,
    pub height: u16,
    pub hidden_columns: Vec<Column>,
    pub item_height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Unchanged,
    SelectionOnly,
    Full,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    data_version: u64,
    layout: LayoutKey,
    window: Range<usize>,
}

#[derive(Debug, Default)]
pub struct RenderCache {
    lines: Vec<Line<'static>>,
    key: Option<CacheKey>,
    selected: usize,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    /// Force the next render to rebuild every visible row.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// Bring the cached lines up to date with `items` as seen through `viewport`.
    ///
    /// `data_version` must change whenever the contents or order of `items` do.
    pub fn render<T, F>(
        &mut self,
        items: &[T],
        data_version: u64,
        viewport: &Viewport,
        layout: &LayoutKey,
        mut render_row: F,
    ) -> RenderOutcome
    where
        F: FnMut(&T, bool) -> Line<'static>,
    {
        let window = viewport.window();
        let window = window.start.min(items.len())..window.end.min(items.len());
        if window.is_empty() {
            self.lines.clear();
            self.key = None;
            return RenderOutcome::Empty;
        }

        let selected = viewport.selected();
        let key = CacheKey {
            data_version,
            layout: layout.clone(),
            window: window.clone(),
        };

        if self.key.as_ref() == Some(&key) {
            if selected == self.selected {
                return RenderOutcome::Unchanged;
            }
            if items.len() > SELECTION_ONLY_THRESHOLD {
                let previous = self.selected;
                let item_height = usize::from(layout.item_height.max(1));
                for (row, is_selected) in [(previous, false), (selected, true)] {
                    if !window.contains(&row) {
                        continue;
                    }
                    let at = (row - window.start) * item_height;
                    if let Some(slot) = self.lines.get_mut(at) {
                        *slot = render_row(&items[row], is_selected);
                    }
                }
                self.selected = selected;
                tracing::trace!(previous, selected, "selection-only render");
                return RenderOutcome::SelectionOnly;
            }
        }

        let spacer = usize::from(layout.item_height.max(1)) - 1;
        let mut lines = Vec::with_capacity(window.len() * (spacer + 1));
        for row in window.clone() {
            lines.push(render_row(&items[row], row == selected));
            lines.extend(std::iter::repeat_with(Line::default).take(spacer));
        }
        tracing::trace!(rows = window.len(), data_version, "full render");

        self.lines = lines;
        self.key = Some(key);
        self.selected = selected;
        RenderOutcome::Full
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    fn layout(item_height: u16) -> LayoutKey {
        LayoutKey {
            width: 80,
            height: 20,
            hidden_columns: Vec::new(),
            item_height,
        }
    }

    fn viewport(count: usize, item_height: u16) -> Viewport {
        let mut vp = Viewport::new(item_height);
        vp.resize(20);
        vp.set_count(count);
        vp
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn row(calls: &Cell<usize>) -> impl FnMut(&usize, bool) -> Line<'static> + '_ {
        move |i, selected| {
            calls.set(calls.get() + 1);
            Line::from(format!("{}{}", if selected { ">" } else { " " }, i))
        }
    }

    #[test]
    fn long_list_cursor_move_touches_two_rows() {
        let items: Vec<usize> = (0..100).collect();
        let mut vp = viewport(100, 1);
        let mut cache = RenderCache::new();
        let calls = Cell::new(0);

        assert_eq!(cache.render(&items, 1, &vp, &layout(1), row(&calls)), RenderOutcome::Full);
        assert_eq!(calls.get(), 20);

        calls.set(0);
        vp.move_next();
        assert_eq!(
            cache.render(&items, 1, &vp, &layout(1), row(&calls)),
            RenderOutcome::SelectionOnly
        );
        assert_eq!(calls.get(), 2);
        assert_eq!(text(&cache.lines()[0]), " 0");
        assert_eq!(text(&cache.lines()[1]), ">1");
        assert_eq!(cache.lines().len(), 20);
    }

    #[test]
    fn short_list_always_renders_fully() {
        let items: Vec<usize> = (0..30).collect();
        let mut vp = viewport(30, 1);
        let mut cache = RenderCache::new();
        let calls = Cell::new(0);

        cache.render(&items, 1, &vp, &layout(1), row(&calls));
        vp.move_next();
        calls.set(0);
        assert_eq!(cache.render(&items, 1, &vp, &layout(1), row(&calls)), RenderOutcome::Full);
        assert_eq!(calls.get(), 20);
    }

    #[test]
    fn nothing_changed_reuses_lines() {
        let items: Vec<usize> = (0..100).collect();
        let vp = viewport(100, 1);
        let mut cache = RenderCache::new();
        let calls = Cell::new(0);

        cache.render(&items, 1, &vp, &layout(1), row(&calls));
        calls.set(0);
        assert_eq!(
            cache.render(&items, 1, &vp, &layout(1), row(&calls)),
            RenderOutcome::Unchanged
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn layout_or_data_change_forces_full_render() {
        let items: Vec<usize> = (0..100).collect();
        let mut vp = viewport(100, 1);
        let mut cache = RenderCache::new();
        let calls = Cell::new(0);
        cache.render(&items, 1, &vp, &layout(1), row(&calls));

        vp.move_next();
        let mut wider = layout(1);
        wider.width = 120;
        assert_eq!(cache.render(&items, 1, &vp, &wider, row(&calls)), RenderOutcome::Full);

        vp.move_next();
        assert_eq!(cache.render(&items, 2, &vp, &wider, row(&calls)), RenderOutcome::Full);

        let mut hidden = wider.clone();
        hidden.hidden_columns.push(Column::Reason);
        assert_eq!(cache.render(&items, 2, &vp, &hidden, row(&calls)), RenderOutcome::Full);
    }

    #[test]
    fn window_scroll_forces_full_render() {
        let items: Vec<usize> = (0..100).collect();
        let mut vp = viewport(100, 1);
        let mut cache = RenderCache::new();
        let calls = Cell::new(0);
        cache.render(&items, 1, &vp, &layout(1), row(&calls));

        vp.last();
        assert_eq!(cache.render(&items, 1, &vp, &layout(1), row(&calls)), RenderOutcome::Full);
        assert_eq!(text(&cache.lines()[19]), ">99");
    }

    #[test]
    fn splice_respects_item_height() {
        let items: Vec<usize> = (0..100).collect();
        let mut vp = viewport(100, 2);
        let mut cache = RenderCache::new();
        let calls = Cell::new(0);

        cache.render(&items, 1, &vp, &layout(2), row(&calls));
        assert_eq!(cache.lines().len(), 20);

        vp.move_next();
        vp.move_next();
        cache.render(&items, 1, &vp, &layout(2), row(&calls));
        assert_eq!(text(&cache.lines()[0]), " 0");
        assert_eq!(text(&cache.lines()[4]), ">2");
        assert_eq!(text(&cache.lines()[5]), "");
    }

    #[test]
    fn invalidate_and_empty() {
        let items: Vec<usize> = (0..100).collect();
        let vp = viewport(100, 1);
        let mut cache = RenderCache::new();
        let calls = Cell::new(0);
        cache.render(&items, 1, &vp, &layout(1), row(&calls));

        cache.invalidate();
        assert_eq!(cache.render(&items, 1, &vp, &layout(1), row(&calls)), RenderOutcome::Full);

        let empty: Vec<usize> = Vec::new();
        assert_eq!(
            cache.render(&empty, 2, &viewport(0, 1), &layout(1), row(&calls)),
            RenderOutcome::Empty
        );
        assert!(cache.lines().is_empty());
    }
}
