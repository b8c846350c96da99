//! Authenticated session
//!
//! # Module Organization
//!
//! - [`manager`] - Login, logout and restore
//! - [`storage`] - Persistence backends for the session record
//! - [`hydration`] - Gate that opens once the persisted session is restored
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use console_store::app::client::{ApiClient, ClientConfig};
//! use console_store::app::session::{HydrationGate, MemorySessionStorage, SessionManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(ApiClient::new("https://dummyjson.com", &ClientConfig::default())?);
//! let sessions = SessionManager::new(
//!     client,
//!     Arc::new(MemorySessionStorage::default()),
//!     Arc::new(HydrationGate::new()),
//! );
//!
//! sessions.hydrate().await;
//! sessions.login("emilys", "emilyspass").await?;
//! assert!(sessions.is_authenticated());
//! # Ok(())
//! # }
//! ```

pub mod hydration;
pub mod manager;
pub mod storage;

pub use hydration::HydrationGate;
pub use manager::{AuthState, SessionManager};
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionStorage};
