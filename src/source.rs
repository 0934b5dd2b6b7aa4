use async_trait::async_trait;

use crate::error::Result;
use crate::types::Notification;

/// Where notifications come from.
///
/// `fetch_page` is offset pagination only: there is no total count and no
/// next-page marker, and `query` is passed through so the implementation can
/// pick out the tokens the remote understands.
#[async_trait]
pub trait NotificationSource: Send + Sync + std::fmt::Debug {
    async fn fetch_page(&self, page: u32, per_page: usize, query: &str)
        -> Result<Vec<Notification>>;

    /// Clear the thread's unread state.
    async fn mark_read(&self, thread_id: &str) -> Result<()>;

    /// Remove the thread from the inbox.
    async fn mark_done(&self, thread_id: &str) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::NotificationSource;
    use crate::error::{NudgeError, Result};
    use crate::types::Notification;

    /// In-memory source serving a fixed list of raw notifications in pages.
    #[derive(Debug, Default)]
    pub struct FakeSource {
        pub items: Vec<Notification>,
        pub calls: Mutex<Vec<(u32, usize, String)>>,
        pub fail_on_page: Option<u32>,
        pub marked: Mutex<Vec<(String, &'static str)>>,
    }

    impl FakeSource {
        pub fn new(items: Vec<Notification>) -> Self {
            Self {
                items,
                ..Default::default()
            }
        }

        pub fn failing_on(mut self, page: u32) -> Self {
            self.fail_on_page = Some(page);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or(0)
        }

        pub fn pages_requested(&self) -> Vec<u32> {
            self.calls
                .lock()
                .map(|c| c.iter().map(|(page, _, _)| *page).collect())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl NotificationSource for FakeSource {
        async fn fetch_page(
            &self,
            page: u32,
            per_page: usize,
            query: &str,
        ) -> Result<Vec<Notification>> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((page, per_page, query.to_string()));
            }
            if self.fail_on_page == Some(page) {
                return Err(NudgeError::Api("boom".to_string()));
            }
            let start = (page as usize - 1) * per_page;
            Ok(self
                .items
                .iter()
                .skip(start)
                .take(per_page)
                .cloned()
                .collect())
        }

        async fn mark_read(&self, thread_id: &str) -> Result<()> {
            if let Ok(mut marked) = self.marked.lock() {
                marked.push((thread_id.to_string(), "read"));
            }
            Ok(())
        }

        async fn mark_done(&self, thread_id: &str) -> Result<()> {
            if let Ok(mut marked) = self.marked.lock() {
                marked.push((thread_id.to_string(), "done"));
            }
            Ok(())
        }
    }
}
