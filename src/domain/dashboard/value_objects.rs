use crate::domain::market_data::{Asset, SortKey};
use crate::domain::preferences::FavoriteSet;
use serde::Serialize;

/// Everything the user can tweak about the table
#[derive(Debug, Clone, PartialEq)]
pub struct ViewControls {
    /// Raw text as typed, possibly not yet settled
    pub search_text: String,
    /// Debounced text actually used for filtering
    pub effective_search: String,
    pub sort_key: SortKey,
    pub favorites_only: bool,
    /// 1-based
    pub page: usize,
    pub favorites: FavoriteSet,
}

impl Default for ViewControls {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            effective_search: String::new(),
            sort_key: SortKey::MarketCap,
            favorites_only: false,
            page: 1,
            favorites: FavoriteSet::new(),
        }
    }
}

impl ViewControls {
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search_text = text.clone();
        self.effective_search = text;
        self
    }

    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    pub fn with_favorites_only(mut self, favorites_only: bool) -> Self {
        self.favorites_only = favorites_only;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_favorites(mut self, favorites: FavoriteSet) -> Self {
        self.favorites = favorites;
        self
    }
}

/// Table row view model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetRow {
    pub asset: Asset,
    pub is_favorite: bool,
}

/// One visible page of the table plus pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub rows: Vec<AssetRow>,
    /// Clamped into `1..=total_pages`
    pub current_page: usize,
    /// Never below 1, even for an empty result
    pub total_pages: usize,
    pub filtered_count: usize,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}
