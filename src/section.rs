use ratatui::text::Line;

use crate::aggregator::{Aggregator, FetchPlan, FetchedPage, Limits, PageCursor};
use crate::config::SectionConfig;
use crate::query;
use crate::render_cache::{LayoutKey, RenderCache, RenderOutcome};
use crate::sort::SortMode;
use crate::types::{Notification, ThreadChange};
use crate::viewport::Viewport;

/// Start fetching the next page once the selection is this close to the end.
pub const PREFETCH_MARGIN: usize = 5;

/// A fetch the app should run in the background for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub section_id: usize,
    pub generation: u64,
    pub plan: FetchPlan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { grew: bool },
    Failed(String),
    Stale,
}

/// One tab of the dashboard: a query and everything derived from it.
#[derive(Debug)]
pub struct Section {
    pub id: usize,
    pub title: String,
    filters: String,
    search: String,
    // working directory's repository, applied while smart_filter is on
    current_repo: Option<String>,
    smart_filter: bool,
    limits: Limits,
    sort_mode: SortMode,
    aggregator: Aggregator,
    viewport: Viewport,
    cache: RenderCache,
    layout: LayoutKey,
    // bumped on every reset; completions carrying an older value are dropped
    generation: u64,
    // bumped whenever the contents or order of the list change
    data_version: u64,
    loading: bool,
}

impl Section {
    pub fn new(
        id: usize,
        config: &SectionConfig,
        limits: Limits,
        sort_mode: SortMode,
        item_height: u16,
    ) -> Self {
        Self {
            id,
            title: config.title.clone(),
            filters: config.filters.clone(),
            search: String::new(),
            current_repo: None,
            smart_filter: false,
            limits,
            sort_mode,
            aggregator: Aggregator::new(),
            viewport: Viewport::new(item_height),
            cache: RenderCache::new(),
            layout: LayoutKey {
                item_height,
                ..LayoutKey::default()
            },
            generation: 0,
            data_version: 0,
            loading: false,
        }
    }

    /// Scope the section to `repo` while smart filtering is on.
    pub fn with_current_repo(mut self, repo: Option<String>, smart_filter: bool) -> Self {
        self.current_repo = repo;
        self.smart_filter = smart_filter;
        self
    }

    pub fn query(&self) -> String {
        let query = query::combine(&self.filters, &self.search);
        match self.smart_scope() {
            Some(repo) => query::combine(&query, &format!("repo:{}", repo)),
            None => query,
        }
    }

    /// Repository added to the query by smart filtering. Sections whose
    /// filters or search already name a repository are left alone.
    pub fn smart_scope(&self) -> Option<&str> {
        if !self.smart_filter
            || query::has_explicit_repo_filter(&self.filters)
            || query::has_explicit_repo_filter(&self.search)
        {
            return None;
        }
        self.current_repo.as_deref()
    }

    pub fn current_repo(&self) -> Option<&str> {
        self.current_repo.as_deref()
    }

    pub fn smart_filter(&self) -> bool {
        self.smart_filter
    }

    /// Flip smart filtering. Returns whether the query changed, in which case
    /// the section was reset and needs a fresh fetch.
    pub fn toggle_smart_filter(&mut self) -> bool {
        let before = self.query();
        self.smart_filter = !self.smart_filter;
        if self.query() == before {
            return false;
        }
        self.reset();
        true
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn items(&self) -> &[Notification] {
        self.aggregator.items()
    }

    pub fn selected(&self) -> Option<&Notification> {
        self.aggregator.items().get(self.viewport.selected())
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn cursor(&self) -> PageCursor {
        self.aggregator.cursor()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn lines(&self) -> &[Line<'static>] {
        self.cache.lines()
    }

    pub fn layout(&self) -> &LayoutKey {
        &self.layout
    }

    /// Plan the next page. `None` while a fetch is in flight or when the
    /// aggregator has nothing left to ask for.
    pub fn begin_fetch(&mut self) -> Option<FetchRequest> {
        if self.loading {
            return None;
        }
        let plan = self.aggregator.plan(&self.query(), &self.limits)?;
        self.loading = true;
        Some(FetchRequest {
            section_id: self.id,
            generation: self.generation,
            plan,
        })
    }

    /// Drop all data and start a new generation. Any fetch still in flight
    /// will be ignored when it completes.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.aggregator.reset();
        self.viewport.first();
        self.data_changed();
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_string();
        self.reset();
    }

    pub fn on_fetched(
        &mut self,
        generation: u64,
        result: Result<FetchedPage, String>,
    ) -> FetchOutcome {
        if generation != self.generation {
            tracing::debug!(
                section = self.id,
                generation,
                current = self.generation,
                "dropping stale fetch"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                let grew = self.aggregator.apply(page);
                self.aggregator.sort(self.sort_mode);
                self.data_changed();
                FetchOutcome::Applied { grew }
            }
            Err(message) => {
                tracing::warn!(section = self.id, error = %message, "fetch failed");
                FetchOutcome::Failed(message)
            }
        }
    }

    /// Apply a confirmed thread change. Unknown ids are ignored.
    pub fn apply_change(&mut self, id: &str, change: ThreadChange) -> bool {
        let changed = match change {
            ThreadChange::Read => self.aggregator.mark_read(id),
            ThreadChange::Done => self.aggregator.mark_done(id),
        };
        if changed {
            self.data_changed();
        }
        changed
    }

    pub fn toggle_sort(&mut self) {
        self.sort_mode = self.sort_mode.toggle();
        self.aggregator.sort(self.sort_mode);
        self.data_changed();
    }

    pub fn move_next(&mut self) {
        self.viewport.move_next();
    }

    pub fn move_prev(&mut self) {
        self.viewport.move_prev();
    }

    pub fn page_down(&mut self) {
        self.viewport.page_down();
    }

    pub fn page_up(&mut self) {
        self.viewport.page_up();
    }

    pub fn first(&mut self) {
        self.viewport.first();
    }

    pub fn last(&mut self) {
        self.viewport.last();
    }

    /// Whether the selection is close enough to the end to warrant another page.
    pub fn near_end(&self) -> bool {
        self.aggregator.is_empty()
            || self.viewport.selected() + PREFETCH_MARGIN >= self.aggregator.len()
    }

    pub fn resize(&mut self, layout: LayoutKey) {
        if layout == self.layout {
            return;
        }
        if layout.item_height != self.viewport.item_height() {
            self.viewport.set_item_height(layout.item_height);
        }
        self.viewport.resize(layout.height);
        self.layout = layout;
    }

    /// Drop the cached rows, e.g. when relative timestamps go stale.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Refresh the cached window lines.
    pub fn sync_content<F>(&mut self, render_row: F) -> RenderOutcome
    where
        F: FnMut(&Notification, bool) -> Line<'static>,
    {
        self.cache.render(
            self.aggregator.items(),
            self.data_version,
            &self.viewport,
            &self.layout,
            render_row,
        )
    }

    fn data_changed(&mut self) {
        self.data_version += 1;
        self.viewport.set_count(self.aggregator.len());
    }
}
