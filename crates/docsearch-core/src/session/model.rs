//! Per-folder session state.

use super::message::ChatTranscript;
use crate::error::ValidationError;
use crate::scope::SearchMode;
use crate::search::ResultRow;
use serde::{Deserialize, Serialize};

/// Sort direction for the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Column the result table is sorted by. `key: None` keeps server order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    /// Clicking the active column flips its direction; any other column
    /// starts ascending.
    pub fn toggled(&self, key: &str) -> Self {
        match &self.key {
            Some(current) if current == key => Self::by(key, self.direction.flipped()),
            _ => Self::by(key, SortDirection::Asc),
        }
    }
}

/// Allowed page sizes for the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(PageSize::Ten),
            20 => Ok(PageSize::Twenty),
            50 => Ok(PageSize::Fifty),
            100 => Ok(PageSize::Hundred),
            other => Err(ValidationError::InvalidPageSize(other)),
        }
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

/// All UI-visible state for one folder, covering both search modes.
///
/// Sessions are created with defaults the first time a folder is touched
/// and live exactly as long as the folder stays in the folder list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub query_table: String,
    pub query_chat: String,
    /// Latest committed table results, in server order
    pub rows: Vec<ResultRow>,
    pub sort: SortConfig,
    pub page_size: PageSize,
    /// 1-based page index
    pub current_page: usize,
    pub error: Option<String>,
    pub searching_table: bool,
    pub searching_chat: bool,
    pub chat_transcript: ChatTranscript,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_page_size(PageSize::default())
    }
}

impl Session {
    pub fn with_page_size(page_size: PageSize) -> Self {
        Self {
            query_table: String::new(),
            query_chat: String::new(),
            rows: Vec::new(),
            sort: SortConfig::default(),
            page_size,
            current_page: 1,
            error: None,
            searching_table: false,
            searching_chat: false,
            chat_transcript: ChatTranscript::new(),
        }
    }

    pub fn query_text(&self, mode: SearchMode) -> &str {
        match mode {
            SearchMode::Table => &self.query_table,
            SearchMode::Chat => &self.query_chat,
        }
    }

    pub fn set_query_text(&mut self, mode: SearchMode, text: impl Into<String>) {
        match mode {
            SearchMode::Table => self.query_table = text.into(),
            SearchMode::Chat => self.query_chat = text.into(),
        }
    }

    pub fn is_searching(&self, mode: SearchMode) -> bool {
        match mode {
            SearchMode::Table => self.searching_table,
            SearchMode::Chat => self.searching_chat,
        }
    }

    pub fn set_searching(&mut self, mode: SearchMode, searching: bool) {
        match mode {
            SearchMode::Table => self.searching_table = searching,
            SearchMode::Chat => self.searching_chat = searching,
        }
    }

    pub fn total_pages(&self) -> usize {
        crate::search::total_pages(self.rows.len(), self.page_size)
    }

    /// Changing the page size always returns to the first page.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.current_page = 1;
    }

    /// Moves to `page`, clamped to `1..=total_pages`.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = self.sort.toggled(key);
        self.current_page = 1;
    }

    /// Replaces the table results, resetting sort and pagination.
    pub fn commit_rows(&mut self, rows: Vec<ResultRow>) {
        self.rows = rows;
        self.sort = SortConfig::default();
        self.current_page = 1;
    }

    /// Merges `patch` into this session. Unset fields keep their values.
    pub fn apply(&mut self, patch: SessionPatch) {
        let SessionPatch {
            query_table,
            query_chat,
            rows,
            sort,
            page_size,
            current_page,
            error,
            searching_table,
            searching_chat,
            chat_transcript,
        } = patch;

        if let Some(v) = query_table {
            self.query_table = v;
        }
        if let Some(v) = query_chat {
            self.query_chat = v;
        }
        if let Some(v) = rows {
            self.rows = v;
        }
        if let Some(v) = sort {
            self.sort = v;
        }
        if let Some(v) = page_size {
            self.set_page_size(v);
        }
        if let Some(v) = current_page {
            self.current_page = v.max(1);
        }
        if let Some(v) = error {
            self.error = v;
        }
        if let Some(v) = searching_table {
            self.searching_table = v;
        }
        if let Some(v) = searching_chat {
            self.searching_chat = v;
        }
        if let Some(v) = chat_transcript {
            self.chat_transcript = v;
        }
    }
}

/// Partial update for a [`Session`]. `None` means "leave unchanged".
///
/// `error` is doubly optional so a patch can clear it (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub query_table: Option<String>,
    pub query_chat: Option<String>,
    pub rows: Option<Vec<ResultRow>>,
    pub sort: Option<SortConfig>,
    pub page_size: Option<PageSize>,
    pub current_page: Option<usize>,
    pub error: Option<Option<String>>,
    pub searching_table: Option<bool>,
    pub searching_chat: Option<bool>,
    pub chat_transcript: Option<ChatTranscript>,
}

impl SessionPatch {
    pub fn query(mode: SearchMode, text: impl Into<String>) -> Self {
        let text = text.into();
        match mode {
            SearchMode::Table => Self {
                query_table: Some(text),
                ..Default::default()
            },
            SearchMode::Chat => Self {
                query_chat: Some(text),
                ..Default::default()
            },
        }
    }
}
