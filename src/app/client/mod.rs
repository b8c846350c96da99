//! HTTP client for the remote admin API
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `auth`: login flow and server message extraction
//! - `http`: throttled single-shot requests with status mapping
//!
//! [`ApiClient`] owns the base URL and turns canonical queries into endpoint
//! URLs. Path segments are appended through `url` so search terms and
//! category names are percent-encoded.

use serde_json::Value;
use url::Url;

use crate::app::cache::CacheEntry;
use crate::app::models::{CollectionResource, LoginResponse};
use crate::app::query::{Query, QueryTarget};
use crate::constants::api;
use crate::errors::{AuthError, AuthResult, ConfigError, ConfigResult, FetchError, FetchResult};

pub mod auth;
pub mod config;
pub mod http;

pub use config::ClientConfig;

use auth::AuthHandler;
use http::HttpHandler;

/// Client for the remote admin API
#[derive(Debug)]
pub struct ApiClient {
    http_handler: HttpHandler,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for `base_url` with the given settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is invalid or the HTTP client
    /// cannot be built
    pub fn new(base_url: &str, config: &ClientConfig) -> ConfigResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps)?;

        tracing::debug!("Created API client for {}", base_url);

        Ok(Self {
            http_handler,
            base_url,
        })
    }

    /// Get the base URL of the remote API
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended as path segments
    fn endpoint(&self, segments: &[&str]) -> FetchResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve the endpoint serving `query` for collection `R`
    ///
    /// Non-empty search selects the search endpoint, else a non-empty category
    /// selects the category-scoped endpoint, else the plain listing.
    pub fn collection_url<R: CollectionResource>(&self, query: &Query) -> FetchResult<Url> {
        let mut url = match query.target() {
            QueryTarget::Search(term) => {
                let mut url = self.endpoint(&[R::COLLECTION, api::SEARCH_SEGMENT])?;
                url.query_pairs_mut().append_pair(api::SEARCH_PARAM, term);
                url
            }
            QueryTarget::Category(category) if R::SUPPORTS_CATEGORY => {
                self.endpoint(&[R::COLLECTION, api::CATEGORY_SEGMENT, category])?
            }
            QueryTarget::Category(_) | QueryTarget::List => self.endpoint(&[R::COLLECTION])?,
        };

        url.query_pairs_mut()
            .append_pair("limit", &query.limit.to_string())
            .append_pair("skip", &query.skip.to_string());

        tracing::debug!("Resolved {} query to {}", R::COLLECTION, url);
        Ok(url)
    }

    /// Detail endpoint for one resource of collection `R`
    pub fn detail_url<R: CollectionResource>(&self, id: u64) -> FetchResult<Url> {
        self.endpoint(&[R::COLLECTION, &id.to_string()])
    }

    /// Endpoint of the category list
    pub fn categories_url(&self) -> FetchResult<Url> {
        self.endpoint(api::CATEGORY_LIST_PATH)
    }

    /// Endpoint of the login call
    pub fn login_url(&self) -> AuthResult<Url> {
        self.endpoint(api::LOGIN_PATH)
            .map_err(|e| AuthError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Post credentials to the auth endpoint
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<LoginResponse> {
        let url = self.login_url()?;
        AuthHandler::authenticate(&self.http_handler, &url, username, password).await
    }

    /// Fetch one page of collection `R` from `url`
    ///
    /// The body is `{ <collection>: [...], total }`; a missing total falls
    /// back to the number of items received.
    pub async fn fetch_page<R: CollectionResource>(
        &self,
        url: &Url,
    ) -> FetchResult<CacheEntry<R>> {
        let body: Value = self.http_handler.get_json(url, R::COLLECTION).await?;
        Self::parse_page(body)
    }

    fn parse_page<R: CollectionResource>(body: Value) -> FetchResult<CacheEntry<R>> {
        let decode_error = |reason: String| FetchError::Decode {
            operation: R::COLLECTION,
            reason,
        };

        let Value::Object(mut object) = body else {
            return Err(decode_error("expected a JSON object".to_string()));
        };

        let items = object
            .remove(R::COLLECTION)
            .ok_or_else(|| decode_error(format!("missing field `{}`", R::COLLECTION)))?;
        let items: Vec<R> = serde_json::from_value(items).map_err(|e| decode_error(e.to_string()))?;

        let total = object
            .get(api::TOTAL_FIELD)
            .and_then(Value::as_u64)
            .unwrap_or(items.len() as u64);

        Ok(CacheEntry::new(items, total))
    }

    /// Fetch a single resource by id; no caching
    pub async fn fetch_single<R: CollectionResource>(&self, id: u64) -> FetchResult<R> {
        let url = self.detail_url::<R>(id)?;
        self.http_handler.get_json(&url, R::SINGULAR).await
    }

    /// Fetch the product category list
    pub async fn fetch_categories(&self) -> FetchResult<Vec<String>> {
        let url = self.categories_url()?;
        self.http_handler.get_json(&url, "categories").await
    }
}
