//! Query-keyed collection store
//!
//! One [`CollectionStore`] exists per collection (users, products). It turns
//! consumer queries into canonical cache keys, serves repeated keys from its
//! LRU cache without touching the network, and otherwise fetches, caches and
//! publishes the page.
//!
//! State is published through a `watch` channel so views can subscribe. The
//! cache and the request ledger live behind one mutex, and every state write
//! happens while that mutex is held, so a cache write and the matching state
//! write are observed together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//! use console_store::app::client::{ApiClient, ClientConfig};
//! use console_store::app::collection::CollectionStore;
//! use console_store::app::models::User;
//! use console_store::app::query::QueryParams;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(ApiClient::new("https://dummyjson.com", &ClientConfig::default())?);
//! let users = CollectionStore::<User>::new(client, NonZeroUsize::new(32).unwrap());
//!
//! let page = users.fetch(QueryParams::new().with_search("ann")).await?;
//! println!("{} of {} users", page.items.len(), page.total);
//!
//! // Same query again: served from the cache
//! users.fetch(QueryParams::new().with_search("ann")).await?;
//! # Ok(())
//! # }
//! ```

pub mod ledger;
pub mod state;

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::app::cache::{CacheEntry, CacheStats, QueryCache};
use crate::app::client::ApiClient;
use crate::app::models::CollectionResource;
use crate::app::query::{Query, QueryParams};
use crate::errors::{FetchError, FetchResult};

pub use ledger::{AbortHandle, AbortToken, RequestLedger, RequestTicket};
pub use state::CollectionState;

/// Cache and request bookkeeping, guarded together
#[derive(Debug)]
struct CollectionLedger<R> {
    cache: QueryCache<R>,
    requests: RequestLedger,
}

/// Cache-first store for one remote collection
#[derive(Debug)]
pub struct CollectionStore<R: CollectionResource> {
    client: Arc<ApiClient>,
    ledger: Mutex<CollectionLedger<R>>,
    state: watch::Sender<CollectionState<R>>,
}

impl<R: CollectionResource> CollectionStore<R> {
    /// Create an empty store caching at most `capacity` distinct queries
    pub fn new(client: Arc<ApiClient>, capacity: NonZeroUsize) -> Self {
        let (state, _) = watch::channel(CollectionState::default());
        Self {
            client,
            ledger: Mutex::new(CollectionLedger {
                cache: QueryCache::new(capacity),
                requests: RequestLedger::new(),
            }),
            state,
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> CollectionState<R> {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<CollectionState<R>> {
        self.state.subscribe()
    }

    /// Fetch one page, serving repeated queries from the cache
    ///
    /// On a cache hit the page is published immediately and `loading`/`error`
    /// are left alone. On a miss `loading` is raised and the previous page
    /// stays visible until the response arrives. A failure keeps the previous
    /// page, records the message in `error` and is returned to the caller.
    ///
    /// # Errors
    ///
    /// - `FetchError::Status`/`Transport`/`Decode` when the request fails
    /// - `FetchError::Superseded` when a newer request for this collection was
    ///   issued before this one completed; state is left to the newer request
    pub async fn fetch(&self, params: QueryParams) -> FetchResult<CacheEntry<R>> {
        let query = Query::canonical::<R>(params);
        let key = query.key();

        let (ticket, url) = {
            let mut ledger = self.ledger.lock().await;

            if let Some(entry) = ledger.cache.lookup(&key) {
                let aborted = ledger.requests.supersede();
                debug!("Cache hit for {} query {}", R::COLLECTION, key);
                self.state.send_modify(|state| {
                    state.items = entry.items.clone();
                    state.total = entry.total;
                    state.active_query = query;
                    if aborted {
                        // The aborted request was the only one outstanding
                        state.loading = false;
                    }
                });
                return Ok(entry);
            }

            let url = self.client.collection_url::<R>(&query)?;
            let ticket = ledger.requests.issue();
            debug!(
                "Cache miss for {} query {}, issuing request #{}",
                R::COLLECTION,
                key,
                ticket.seq
            );
            let requested = query.clone();
            self.state.send_modify(|state| {
                state.loading = true;
                state.error = None;
                state.active_query = requested;
            });
            (ticket, url)
        };

        let RequestTicket { seq, token } = ticket;
        let outcome = tokio::select! {
            biased;
            _ = token.aborted() => None,
            result = self.client.fetch_page::<R>(&url) => Some(result),
        };

        let Some(result) = outcome else {
            debug!("Request #{} for {} aborted", seq, R::COLLECTION);
            return Err(FetchError::Superseded {
                operation: R::COLLECTION,
            });
        };

        let mut ledger = self.ledger.lock().await;
        if !ledger.requests.complete(seq) {
            warn!(
                "Discarding stale {} response for request #{} (latest is #{})",
                R::COLLECTION,
                seq,
                ledger.requests.latest()
            );
            return Err(FetchError::Superseded {
                operation: R::COLLECTION,
            });
        }

        match result {
            Ok(entry) => {
                ledger.cache.insert(key, entry.clone());
                self.state.send_modify(|state| {
                    state.items = entry.items.clone();
                    state.total = entry.total;
                    state.active_query = query;
                    state.loading = false;
                    state.error = None;
                });
                Ok(entry)
            }
            Err(err) => {
                warn!("Failed to load {}: {}", R::COLLECTION, err);
                let message = err.to_string();
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(message);
                });
                Err(err)
            }
        }
    }

    /// Re-issue the active query, e.g. from a retry button
    pub async fn retry(&self) -> FetchResult<CacheEntry<R>> {
        let params = self.state.borrow().active_query.to_params();
        self.fetch(params).await
    }

    /// Fetch one resource by id for a detail view
    ///
    /// Pass-through: not cached and not projected into collection state.
    pub async fn fetch_single(&self, id: u64) -> FetchResult<R> {
        self.client.fetch_single::<R>(id).await
    }

    /// Whether a query's page is cached
    pub async fn is_cached(&self, params: QueryParams) -> bool {
        let key = Query::canonical::<R>(params).key();
        self.ledger.lock().await.cache.contains(&key)
    }

    /// Cache counters
    pub async fn cache_stats(&self) -> CacheStats {
        self.ledger.lock().await.cache.stats()
    }

    /// Abort the outstanding request, if any
    pub async fn cancel(&self) {
        let mut ledger = self.ledger.lock().await;
        if ledger.requests.abort_in_flight() {
            self.state.send_modify(|state| state.loading = false);
        }
    }

    /// Abort outstanding work and drop cached pages and visible state
    pub async fn clear(&self) {
        let mut ledger = self.ledger.lock().await;
        ledger.requests.abort_in_flight();
        ledger.cache.clear();
        self.state.send_replace(CollectionState::default());
    }
}
