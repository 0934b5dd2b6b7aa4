use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;

use crate::types::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest first
    #[default]
    Updated,
    /// Repository A-Z, newest first within a repository
    Repository,
}

impl SortMode {
    pub fn toggle(self) -> Self {
        match self {
            SortMode::Updated => SortMode::Repository,
            SortMode::Repository => SortMode::Updated,
        }
    }

    fn compare(self, a: &Notification, b: &Notification) -> Ordering {
        match self {
            SortMode::Updated => b.updated_at.cmp(&a.updated_at),
            SortMode::Repository => a
                .repository
                .cmp(&b.repository)
                .then_with(|| b.updated_at.cmp(&a.updated_at)),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Updated => write!(f, "Updated"),
            SortMode::Repository => write!(f, "Repo"),
        }
    }
}

/// Stable in-place sort.
pub fn sort(notifications: &mut [Notification], mode: SortMode) {
    notifications.sort_by(|a, b| mode.compare(a, b));
}
