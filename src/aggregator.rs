//! Incremental pagination over the notifications feed.
//!
//! The remote only offers `page`/`per_page`, so the aggregator keeps its own
//! cursor, decides whether another page is worth asking for, and folds each
//! page into one deduplicated collection. A fetch is split in three so the
//! network part can run on a spawned task:
//!
//! 1. [`Aggregator::plan`] on the event loop decides whether and what to fetch,
//! 2. [`execute`] talks to the [`NotificationSource`] and never touches the aggregator,
//! 3. [`Aggregator::apply`] on the event loop folds the result in.

use chrono::Utc;

use crate::dedup;
use crate::error::Result;
use crate::filters;
use crate::query;
use crate::sort::{self, SortMode};
use crate::source::NotificationSource;
use crate::types::Notification;

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Upper bound on raw pages walked by one repository-scoped fetch.
pub const MAX_SCOPED_PAGES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub page_size: usize,
    /// 0 = unbounded
    pub max_total: usize,
    /// 0 = unbounded
    pub max_age_days: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_total: 0,
            max_age_days: 0,
        }
    }
}

/// Pagination position. `has_more` only means the last raw page came back
/// full; the API has no authoritative end marker, so it can be wrong by one
/// fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// Last raw page fetched, 0 before the first fetch
    pub current_page: u32,
    pub has_more: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            current_page: 0,
            has_more: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    /// Normalized query
    pub query: String,
    pub start_page: u32,
    /// Raw `per_page`; kept constant so page offsets line up between fetches
    pub page_size: usize,
    /// Filtered results wanted from this fetch
    pub target: usize,
    /// Room left under `max_total`, if capped
    pub room: Option<usize>,
    pub max_age_days: u32,
    pub first_page: bool,
}

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub plan: FetchPlan,
    pub items: Vec<Notification>,
    pub last_page: u32,
    pub last_page_full: bool,
}

#[derive(Debug, Default)]
pub struct Aggregator {
    items: Vec<Notification>,
    cursor: PageCursor,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Forget everything; the next fetch starts again from page 1.
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = PageCursor::default();
    }

    /// Decide what the next fetch should be, or `None` when there is nothing to do.
    pub fn plan(&self, query: &str, limits: &Limits) -> Option<FetchPlan> {
        let count = self.items.len();
        if limits.max_total > 0 && count >= limits.max_total {
            tracing::debug!(count, max_total = limits.max_total, "cap reached, not fetching");
            return None;
        }

        let first_page = self.cursor.current_page == 0;
        if !first_page && !self.cursor.has_more {
            tracing::debug!(page = self.cursor.current_page, "no more pages");
            return None;
        }

        let page_size = limits.page_size.max(1);
        let room = (limits.max_total > 0).then(|| limits.max_total - count);
        let target = room.map_or(page_size, |room| page_size.min(room));

        Some(FetchPlan {
            query: query::normalize(query),
            start_page: self.cursor.current_page + 1,
            page_size,
            target,
            room,
            max_age_days: limits.max_age_days,
            first_page,
        })
    }

    /// Fold a completed fetch into the collection. Returns whether it grew.
    pub fn apply(&mut self, page: FetchedPage) -> bool {
        let before = self.items.len();
        let FetchedPage {
            plan,
            items,
            last_page,
            last_page_full,
        } = page;

        if plan.first_page {
            self.items = dedup::dedup(items);
        } else {
            let existing = std::mem::take(&mut self.items);
            self.items = dedup::merge(existing, items);
        }
        self.cursor = PageCursor {
            current_page: last_page,
            has_more: last_page_full,
        };

        tracing::debug!(
            first_page = plan.first_page,
            before,
            after = self.items.len(),
            page = last_page,
            has_more = last_page_full,
            "applied page"
        );
        if plan.first_page {
            !self.items.is_empty()
        } else {
            self.items.len() > before
        }
    }

    /// Plan, fetch and apply in one go.
    #[cfg(test)]
    pub async fn fetch_more(
        &mut self,
        source: &dyn NotificationSource,
        query: &str,
        limits: &Limits,
    ) -> Result<bool> {
        let Some(plan) = self.plan(query, limits) else {
            return Ok(false);
        };
        let page = execute(plan, source).await?;
        Ok(self.apply(page))
    }

    pub fn sort(&mut self, mode: SortMode) {
        sort::sort(&mut self.items, mode);
    }

    /// Clear the unread flag. Unknown ids are ignored.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.unread = false;
                true
            }
            None => false,
        }
    }

    /// Drop the notification. Unknown ids are ignored.
    pub fn mark_done(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }
}

/// Run a fetch plan against the source.
///
/// Without a repository scope this is a single raw page. With one, raw pages
/// are walked until enough matches are collected, a short page signals the end
/// of the feed, or [`MAX_SCOPED_PAGES`] is hit. Any error drops what was
/// collected so far.
pub async fn execute(plan: FetchPlan, source: &dyn NotificationSource) -> Result<FetchedPage> {
    let (items, last_page, last_page_full) = match query::repo_scope(&plan.query) {
        Some(scope) => {
            let ceiling = plan.start_page + MAX_SCOPED_PAGES - 1;
            let mut collected = Vec::new();
            let mut page = plan.start_page;
            loop {
                let raw = source.fetch_page(page, plan.page_size, &plan.query).await?;
                let full = raw.len() == plan.page_size;
                let raw_len = raw.len();
                collected.extend(filters::by_repo(raw, scope));
                tracing::debug!(page, raw = raw_len, collected = collected.len(), "scoped page");

                if !full || collected.len() >= plan.target || page >= ceiling {
                    break (collected, page, full);
                }
                page += 1;
            }
        }
        None => {
            let raw = source
                .fetch_page(plan.start_page, plan.page_size, &plan.query)
                .await?;
            let full = raw.len() == plan.page_size;
            (raw, plan.start_page, full)
        }
    };

    let mut items = filters::by_age(items, plan.max_age_days, Utc::now());
    if let Some(room) = plan.room {
        items.truncate(room);
    }

    Ok(FetchedPage {
        plan,
        items,
        last_page,
        last_page_full,
    })
}
