use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::aggregator;
use crate::config::{Column, Config};
use crate::event::Event;
use crate::keys::{self, KeyContext};
use crate::section::{FetchOutcome, Section};
use crate::source::NotificationSource;
use crate::types::ThreadChange;
use crate::ui;

pub struct App {
    pub sections: Vec<Section>,
    pub active: usize,
    pub show_detail: bool,
    pub search_mode: bool,
    pub search_input: String,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub should_quit: bool,
    hidden_columns: Vec<Column>,
    item_height: u16,
    size: (u16, u16),
    // minute the visible ages were last rendered for
    rendered_minute: i64,
    source: Arc<dyn NotificationSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        config: &Config,
        source: Arc<dyn NotificationSource>,
        current_repo: Option<String>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let item_height = config.item_height();
        let sections = config
            .sections
            .iter()
            .enumerate()
            .map(|(id, section)| {
                Section::new(
                    id,
                    section,
                    config.limits_for(section),
                    config.defaults.sort,
                    item_height,
                )
                .with_current_repo(current_repo.clone(), config.defaults.smart_filtering)
            })
            .collect();

        Self {
            sections,
            active: 0,
            show_detail: false,
            search_mode: false,
            search_input: String::new(),
            notice: None,
            error: None,
            should_quit: false,
            hidden_columns: config.layout.hidden_columns.clone(),
            item_height,
            size: (0, 0),
            rendered_minute: 0,
            source,
            action_tx,
        }
    }

    pub fn active_section(&self) -> Option<&Section> {
        self.sections.get(self.active)
    }

    fn active_section_mut(&mut self) -> Option<&mut Section> {
        self.sections.get_mut(self.active)
    }

    pub fn key_context(&self) -> KeyContext {
        if self.search_mode {
            KeyContext::Search
        } else if self.show_detail {
            KeyContext::Detail
        } else {
            KeyContext::List
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::RefreshAll,
            Event::Key(key) => keys::map_key(self.key_context(), key),
            Event::Resize(width, height) => Action::Resize(width, height),
            _ => Action::None,
        }
    }

    /// Bring the active section's rendered rows up to date before drawing.
    pub fn sync_view(&mut self) {
        let now = Utc::now();
        let minute = now.timestamp() / 60;
        let stale_ages = minute != self.rendered_minute;
        self.rendered_minute = minute;

        if let Some(section) = self.sections.get_mut(self.active) {
            if stale_ages {
                section.invalidate();
            }
            let layout = section.layout().clone();
            section.sync_content(|n, selected| ui::row::render_row(n, selected, &layout, now));
        }
    }

    pub fn update(&mut self, action: Action) {
        if is_user_input(&action) {
            self.error = None;
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ScrollDown => self.navigate(Section::move_next),
            Action::ScrollUp => self.navigate(Section::move_prev),
            Action::PageDown => self.navigate(Section::page_down),
            Action::PageUp => self.navigate(Section::page_up),
            Action::GoToTop => self.navigate(Section::first),
            Action::GoToBottom => self.navigate(Section::last),
            Action::NextSection => self.switch_section(1),
            Action::PrevSection => self.switch_section(self.sections.len().saturating_sub(1)),
            Action::Resize(width, height) => {
                self.size = (width, height);
                self.relayout();
            }

            Action::Refresh => {
                if let Some(section) = self.active_section_mut() {
                    section.reset();
                }
                self.spawn_fetch(self.active);
            }
            Action::RefreshAll => {
                for index in 0..self.sections.len() {
                    self.sections[index].reset();
                    self.spawn_fetch(index);
                }
            }
            Action::NotificationsFetched {
                section_id,
                generation,
                result,
            } => {
                let Some(section) = self.sections.get_mut(section_id) else {
                    return;
                };
                match section.on_fetched(generation, result) {
                    FetchOutcome::Applied { grew } => {
                        if grew && section.near_end() {
                            self.spawn_fetch(section_id);
                        }
                    }
                    FetchOutcome::Failed(message) => {
                        self.error = Some(message);
                    }
                    FetchOutcome::Stale => {}
                }
            }

            Action::MarkRead => self.spawn_thread_action(ThreadChange::Read),
            Action::MarkDone => self.spawn_thread_action(ThreadChange::Done),
            Action::ThreadUpdated { id, change } => {
                let mut applied = false;
                for section in &mut self.sections {
                    applied |= section.apply_change(&id, change);
                }
                if applied {
                    self.notice = Some(format!("Marked as {}", change));
                }
                if change == ThreadChange::Done {
                    let active = self.active;
                    if self.sections.get(active).is_some_and(Section::near_end) {
                        self.spawn_fetch(active);
                    }
                }
            }

            Action::ToggleSort => {
                if let Some(section) = self.active_section_mut() {
                    section.toggle_sort();
                }
            }

            Action::ToggleSmartFilter => {
                let active = self.active;
                let Some(section) = self.sections.get_mut(active) else {
                    return;
                };
                let Some(repo) = section.current_repo().map(str::to_string) else {
                    self.error = Some("Not inside a GitHub repository".to_string());
                    return;
                };
                let changed = section.toggle_smart_filter();
                self.notice = Some(if !changed {
                    "Section already names a repository".to_string()
                } else if section.smart_filter() {
                    format!("Showing {} only", repo)
                } else {
                    "Showing all repositories".to_string()
                });
                if changed {
                    self.spawn_fetch(active);
                }
            }

            Action::EnterSearchMode => {
                self.search_mode = true;
                self.search_input = self
                    .active_section()
                    .map(|s| s.search().to_string())
                    .unwrap_or_default();
            }
            Action::ExitSearchMode => {
                self.search_mode = false;
                self.search_input.clear();
            }
            Action::SearchInput(c) => {
                self.search_input.push(c);
            }
            Action::SearchBackspace => {
                self.search_input.pop();
            }
            Action::SearchConfirm => {
                self.search_mode = false;
                let search = std::mem::take(&mut self.search_input);
                if let Some(section) = self.active_section_mut() {
                    section.set_search(&search);
                }
                self.spawn_fetch(self.active);
            }

            Action::ToggleDetail => {
                self.show_detail = !self.show_detail;
                self.relayout();
            }
            Action::OpenInBrowser => {
                if let Some(url) = self.selected_url() {
                    if let Err(e) = open::that(&url) {
                        self.error = Some(format!("Failed to open browser: {}", e));
                    }
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.selected_url() {
                    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(url.clone())) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => self.error = Some(format!("Clipboard error: {}", e)),
                    }
                }
            }

            Action::Error(message) => {
                self.error = Some(message);
            }
            Action::None => {}
        }
    }

    fn navigate(&mut self, step: fn(&mut Section)) {
        let active = self.active;
        let Some(section) = self.sections.get_mut(active) else {
            return;
        };
        step(section);
        if section.near_end() {
            self.spawn_fetch(active);
        }
    }

    fn switch_section(&mut self, offset: usize) {
        if self.sections.is_empty() {
            return;
        }
        self.active = (self.active + offset) % self.sections.len();
        let active = self.active;
        // ages in a background section's cache may be minutes old
        self.sections[active].invalidate();
        if self.sections[active].cursor().current_page == 0 {
            self.spawn_fetch(active);
        }
    }

    fn relayout(&mut self) {
        let (width, height) = self.size;
        let layout = ui::list_layout(
            width,
            height,
            self.show_detail,
            &self.hidden_columns,
            self.item_height,
        );
        for section in &mut self.sections {
            section.resize(layout.clone());
        }
    }

    fn selected_url(&mut self) -> Option<String> {
        let url = self
            .active_section()
            .and_then(|s| s.selected())
            .map(|n| n.url.clone())?;
        if url.is_empty() {
            self.error = Some("No link for this notification".to_string());
            return None;
        }
        Some(url)
    }

    fn spawn_fetch(&mut self, index: usize) {
        let Some(request) = self.sections.get_mut(index).and_then(Section::begin_fetch) else {
            return;
        };
        tracing::debug!(
            section = request.section_id,
            page = request.plan.start_page,
            query = %request.plan.query,
            "fetching"
        );

        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let result = aggregator::execute(request.plan, source.as_ref())
                .await
                .map_err(|e| e.to_string());
            tx.send(Action::NotificationsFetched {
                section_id: request.section_id,
                generation: request.generation,
                result,
            })
            .ok();
        });
    }

    fn spawn_thread_action(&self, change: ThreadChange) {
        let Some(n) = self.active_section().and_then(|s| s.selected()) else {
            return;
        };
        let id = n.id.clone();
        let thread_id = n.thread_id.clone();

        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let result = match change {
                ThreadChange::Read => source.mark_read(&thread_id).await,
                ThreadChange::Done => source.mark_done(&thread_id).await,
            };
            let action = match result {
                Ok(()) => Action::ThreadUpdated { id, change },
                Err(e) => {
                    tracing::warn!(%thread_id, %change, error = %e, "thread action failed");
                    Action::from(e)
                }
            };
            tx.send(action).ok();
        });
    }
}

fn is_user_input(action: &Action) -> bool {
    !matches!(
        action,
        Action::NotificationsFetched { .. }
            | Action::ThreadUpdated { .. }
            | Action::Resize(..)
            | Action::Error(_)
            | Action::None
    )
}
