//! Console Store Library
//!
//! Client-side state and cache layer for an admin console over a read-only
//! users/products API. Owns the authenticated session, canonicalises list
//! queries, caches pages by query and exposes loading/error state to views.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
