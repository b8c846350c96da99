//! Query-keyed page cache
//!
//! Each collection owns one [`QueryCache`]: an LRU map from canonical query
//! key to the page the server returned for it. Entries never go stale during
//! a process lifetime because the console never writes to the remote
//! service; the capacity bound is what keeps memory in check.
//!
//! # Module Organization
//!
//! - [`config`] - Per-collection capacities
//! - [`store`] - The LRU cache and its entries
//! - [`stats`] - Hit, miss and eviction counters
//!
//! # Examples
//!
//! ```rust
//! use std::num::NonZeroUsize;
//! use console_store::app::cache::{CacheEntry, QueryCache};
//! use console_store::app::models::User;
//! use console_store::app::query::{Query, QueryParams};
//!
//! let mut cache: QueryCache<String> = QueryCache::new(NonZeroUsize::new(8).unwrap());
//! let key = Query::canonical::<User>(QueryParams::new().with_search("ann")).key();
//!
//! assert!(cache.lookup(&key).is_none());
//! cache.insert(key.clone(), CacheEntry::new(vec!["Ann".to_string()], 1));
//! assert_eq!(cache.lookup(&key).unwrap().total, 1);
//! ```

pub mod config;
pub mod stats;
pub mod store;

// Re-export main public API
pub use config::CacheConfig;
pub use stats::CacheStats;
pub use store::{CacheEntry, QueryCache};
