//! Consumer-visible collection state

use crate::app::query::Query;

/// What a list view renders for one collection
///
/// `items`/`total` always come from one page: either a cache entry or one
/// response. They are kept while a new page loads and after a failed fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState<R> {
    pub items: Vec<R>,
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
    /// The most recently requested query, even while its page is loading
    pub active_query: Query,
}

impl<R> Default for CollectionState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
            active_query: Query::default(),
        }
    }
}

impl<R> CollectionState<R> {
    /// Whether nothing has been loaded yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the view should offer a retry
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
