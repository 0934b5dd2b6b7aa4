use crate::aggregator::FetchedPage;
use crate::error::NudgeError;
use crate::types::ThreadChange;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    NextSection,
    PrevSection,
    Resize(u16, u16),

    // Fetching
    Refresh,
    RefreshAll,
    NotificationsFetched {
        section_id: usize,
        generation: u64,
        result: Result<FetchedPage, String>,
    },

    // Thread state
    MarkRead,
    MarkDone,
    ThreadUpdated {
        id: String,
        change: ThreadChange,
    },

    ToggleSort,
    ToggleSmartFilter,

    // Search
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    SearchConfirm,

    // Selected item
    ToggleDetail,
    OpenInBrowser,
    YankUrl,

    Error(String),
    None,
}

impl From<NudgeError> for Action {
    fn from(err: NudgeError) -> Self {
        Action::Error(err.to_string())
    }
}
