//! Collection cache configuration types and defaults

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::constants::cache;

/// Capacity of each collection's query cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Distinct user queries kept before least-recently-used eviction
    pub users_capacity: usize,
    /// Distinct product queries kept before least-recently-used eviction
    pub products_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            users_capacity: cache::DEFAULT_CAPACITY,
            products_capacity: cache::DEFAULT_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Same capacity for every collection
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            users_capacity: capacity,
            products_capacity: capacity,
        }
    }

    /// Users capacity; zero is clamped to one
    pub fn users_capacity_non_zero(&self) -> NonZeroUsize {
        non_zero(self.users_capacity)
    }

    /// Products capacity; zero is clamped to one
    pub fn products_capacity_non_zero(&self) -> NonZeroUsize {
        non_zero(self.products_capacity)
    }
}

fn non_zero(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}
