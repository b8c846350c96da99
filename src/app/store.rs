//! The admin store service
//!
//! [`AdminStore`] wires one API client to the session manager, both
//! collection stores and the category index. Consumers construct it
//! explicitly, call [`AdminStore::initialize`] to restore the persisted
//! session, and [`AdminStore::dispose`] when done.

use std::sync::Arc;

use tracing::info;

use crate::app::cache::{CacheConfig, CacheEntry};
use crate::app::categories::CategoryIndex;
use crate::app::client::{ApiClient, ClientConfig};
use crate::app::collection::CollectionStore;
use crate::app::dashboard::DashboardSummary;
use crate::app::guard::AuthGuard;
use crate::app::models::{Product, Session, User};
use crate::app::query::QueryParams;
use crate::app::session::{HydrationGate, SessionManager, SessionStorage};
use crate::constants::api;
use crate::errors::{AuthResult, ConfigResult, FetchResult};

/// Runtime settings for an [`AdminStore`]
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub client: ClientConfig,
    pub cache: CacheConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: api::DEFAULT_BASE_URL.to_string(),
            client: ClientConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Defaults pointed at another API root
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Client-side state and cache layer of the admin console
#[derive(Debug)]
pub struct AdminStore {
    client: Arc<ApiClient>,
    sessions: SessionManager,
    users: CollectionStore<User>,
    products: CollectionStore<Product>,
    categories: CategoryIndex,
}

impl AdminStore {
    /// Build the store; nothing is loaded until [`initialize`](Self::initialize)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL or client settings are invalid
    pub fn new(config: StoreConfig, storage: Arc<dyn SessionStorage>) -> ConfigResult<Self> {
        let client = Arc::new(ApiClient::new(&config.base_url, &config.client)?);
        let sessions = SessionManager::new(client.clone(), storage, Arc::new(HydrationGate::new()));

        Ok(Self {
            users: CollectionStore::new(client.clone(), config.cache.users_capacity_non_zero()),
            products: CollectionStore::new(
                client.clone(),
                config.cache.products_capacity_non_zero(),
            ),
            categories: CategoryIndex::new(client.clone()),
            sessions,
            client,
        })
    }

    /// Restore the persisted session and open the hydration gate
    pub async fn initialize(&self) {
        info!("Initializing store against {}", self.client.base_url());
        self.sessions.hydrate().await;
    }

    /// Abort in-flight fetches and drop cached pages and collection state
    ///
    /// The session is left as is; it is already persisted.
    pub async fn dispose(&self) {
        self.users.clear().await;
        self.products.clear().await;
        self.categories.reset();
        info!("Store disposed");
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn users(&self) -> &CollectionStore<User> {
        &self.users
    }

    pub fn products(&self) -> &CollectionStore<Product> {
        &self.products
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    pub fn gate(&self) -> &HydrationGate {
        self.sessions.gate()
    }

    pub fn guard(&self) -> AuthGuard<'_> {
        AuthGuard::new(&self.sessions)
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthResult<Session> {
        self.sessions.login(username, password).await
    }

    pub async fn logout(&self) {
        self.sessions.logout().await;
    }

    pub async fn fetch_users(&self, params: QueryParams) -> FetchResult<CacheEntry<User>> {
        self.users.fetch(params).await
    }

    pub async fn fetch_products(&self, params: QueryParams) -> FetchResult<CacheEntry<Product>> {
        self.products.fetch(params).await
    }

    pub async fn fetch_user(&self, id: u64) -> FetchResult<User> {
        self.users.fetch_single(id).await
    }

    pub async fn fetch_product(&self, id: u64) -> FetchResult<Product> {
        self.products.fetch_single(id).await
    }

    pub async fn fetch_categories(&self) -> FetchResult<Vec<String>> {
        self.categories.fetch().await
    }

    /// Summary over the currently loaded pages
    pub fn dashboard(&self) -> DashboardSummary {
        DashboardSummary::build(
            &self.sessions.session(),
            &self.users.state(),
            &self.products.state(),
        )
    }
}
