//! Prelude module for the Console Store Library
//!
//! Re-exports the items most integrations need, so a single
//! `use console_store::prelude::*;` is enough for typical usage.
//!
//! # Usage
//!
//! ```rust,no_run
//! use console_store::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let storage = Arc::new(FileSessionStorage::new("session.json", "console-session"));
//!     let store = AdminStore::new(StoreConfig::default(), storage)?;
//!     store.initialize().await;
//!
//!     if store.guard().evaluate("/users") == GuardDecision::Allow {
//!         store.fetch_users(QueryParams::new().with_search("ann")).await?;
//!     }
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, AuthError, FetchError, Result};

// The store and what it hands out
pub use crate::app::{
    AdminStore, AuthGuard, AuthState, CacheConfig, CacheEntry, CacheStats, CategoryIndexState,
    ClientConfig, CollectionState, DashboardSummary, FileSessionStorage, GuardDecision,
    MemorySessionStorage, Product, QueryParams, Session, SessionStorage, StoreConfig, User,
    UserProfile,
};

// Configuration
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_LIMIT, DEMO_PASSWORD, DEMO_USERNAME, USER_AGENT};

pub use std::sync::Arc;
