//! Collection queries and their canonical cache keys
//!
//! Consumers hand the store a [`QueryParams`] with whatever they know; the
//! store canonicalizes it into a [`Query`] with every default applied, and
//! the query's [`QueryKey`] indexes the collection cache. Two queries share a
//! cache entry exactly when all canonical fields are equal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::query::{DEFAULT_LIMIT, DEFAULT_SKIP};

use super::models::CollectionResource;

/// Query as supplied by a consumer; unset fields take defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
}

impl QueryParams {
    /// Start from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the offset
    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the free-text search term
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Set the category filter
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A canonical collection query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    pub limit: u32,
    pub skip: u32,
    pub search: String,
    pub category: String,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            skip: DEFAULT_SKIP,
            search: String::new(),
            category: String::new(),
        }
    }
}

impl Query {
    /// Apply defaults for the given collection
    ///
    /// A zero limit falls back to the default page size. Collections without
    /// category filtering drop the category so it cannot split cache entries.
    pub fn canonical<R: CollectionResource>(params: QueryParams) -> Self {
        let limit = match params.limit {
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_LIMIT,
        };
        let category = if R::SUPPORTS_CATEGORY {
            params.category.unwrap_or_default()
        } else {
            String::new()
        };

        Self {
            limit,
            skip: params.skip.unwrap_or(DEFAULT_SKIP),
            search: params.search.unwrap_or_default(),
            category,
        }
    }

    /// Cache key for this query
    pub fn key(&self) -> QueryKey {
        QueryKey {
            limit: self.limit,
            skip: self.skip,
            search: self.search.clone(),
            category: self.category.clone(),
        }
    }

    /// Back to consumer parameters, e.g. to retry the active query
    pub fn to_params(&self) -> QueryParams {
        QueryParams {
            limit: Some(self.limit),
            skip: Some(self.skip),
            search: Some(self.search.clone()),
            category: Some(self.category.clone()),
        }
    }

    /// Which endpoint family serves this query
    pub fn target(&self) -> QueryTarget<'_> {
        if !self.search.is_empty() {
            QueryTarget::Search(&self.search)
        } else if !self.category.is_empty() {
            QueryTarget::Category(&self.category)
        } else {
            QueryTarget::List
        }
    }
}

/// Endpoint family selected for a query; search wins over category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTarget<'a> {
    List,
    Search(&'a str),
    Category(&'a str),
}

/// Canonical cache key: the ordered tuple `(limit, skip, search, category)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    limit: u32,
    skip: u32,
    search: String,
    category: String,
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug-quote the free-text parts so the rendering is unambiguous
        write!(
            f,
            "{}-{}-{:?}-{:?}",
            self.limit, self.skip, self.search, self.category
        )
    }
}
