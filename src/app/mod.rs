//! Core of the admin console: session, query cache and derived views
//!
//! This module contains the API client, the data models, the query-keyed
//! collection stores with their LRU caches, the category index, the session
//! manager with its hydration gate, and the [`AdminStore`] that ties them
//! together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use console_store::app::{AdminStore, MemorySessionStorage, QueryParams, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = AdminStore::new(StoreConfig::default(), Arc::new(MemorySessionStorage::default()))?;
//! store.initialize().await;
//!
//! store.login("emilys", "emilyspass").await?;
//! let page = store
//!     .fetch_products(QueryParams::new().with_category("beauty").with_limit(5))
//!     .await?;
//! for product in &page.items {
//!     println!("{} - ${:.2}", product.title, product.price);
//! }
//!
//! store.dispose().await;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod categories;
pub mod client;
pub mod collection;
pub mod dashboard;
pub mod guard;
pub mod models;
pub mod pagination;
pub mod query;
pub mod session;
pub mod store;

// Re-export main public API
pub use cache::{CacheConfig, CacheEntry, CacheStats, QueryCache};
pub use categories::{CategoryIndex, CategoryIndexState};
pub use client::{ApiClient, ClientConfig};
pub use collection::{CollectionState, CollectionStore};
pub use dashboard::DashboardSummary;
pub use guard::{AuthGuard, GuardDecision};
pub use models::{CollectionResource, LoginResponse, Product, Session, User, UserProfile};
pub use query::{Query, QueryKey, QueryParams};
pub use session::{
    AuthState, FileSessionStorage, HydrationGate, MemorySessionStorage, SessionManager,
    SessionStorage,
};
pub use store::{AdminStore, StoreConfig};
