//! Product category index
//!
//! A single-value cache for the category list used to filter products. The
//! index itself never guards against repeated fetches; callers that only want
//! the list loaded once use [`CategoryIndex::ensure_loaded`].

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::app::client::ApiClient;
use crate::errors::FetchResult;

/// What a category filter renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndexState {
    pub categories: Vec<String>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Cached product category list
#[derive(Debug)]
pub struct CategoryIndex {
    client: Arc<ApiClient>,
    state: watch::Sender<CategoryIndexState>,
}

impl CategoryIndex {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(CategoryIndexState::default());
        Self { client, state }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> CategoryIndexState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<CategoryIndexState> {
        self.state.subscribe()
    }

    /// Loaded categories, possibly empty
    pub fn categories(&self) -> Vec<String> {
        self.state.borrow().categories.clone()
    }

    /// Fetch the category list
    ///
    /// Always goes to the network. A failure records the message and keeps any
    /// previously loaded list.
    pub async fn fetch(&self) -> FetchResult<Vec<String>> {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        match self.client.fetch_categories().await {
            Ok(categories) => {
                debug!("Loaded {} product categories", categories.len());
                let loaded = categories.clone();
                self.state.send_modify(|state| {
                    state.categories = loaded;
                    state.loading = false;
                });
                Ok(categories)
            }
            Err(err) => {
                warn!("Failed to load categories: {}", err);
                let message = err.to_string();
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(message);
                });
                Err(err)
            }
        }
    }

    /// Fetch only when nothing is loaded yet
    ///
    /// Concurrent callers that both see an empty list will both fetch; the
    /// responses are identical so the later write is harmless.
    pub async fn ensure_loaded(&self) -> FetchResult<Vec<String>> {
        let current = self.categories();
        if current.is_empty() {
            self.fetch().await
        } else {
            Ok(current)
        }
    }

    /// Forget the loaded list
    pub fn reset(&self) {
        self.state.send_replace(CategoryIndexState::default());
    }
}
