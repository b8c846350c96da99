//! Core HTTP operations with client-side throttling
//!
//! Each call sends exactly one request. There is no automatic retry here:
//! retrying is a deliberate re-invocation by the caller.

use std::num::NonZeroU32;

use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::errors::{ConfigError, ConfigResult, FetchError, FetchResult};

/// HTTP operations handler
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limit
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the rate limit is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> ConfigResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    fn build_rate_limiter(
        rate_limit_rps: u32,
    ) -> ConfigResult<RateLimiter<NotKeyed, InMemoryState, DefaultClock>> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| ConfigError::InvalidValue {
            field: "client.rate_limit_rps".to_string(),
            value: rate_limit_rps.to_string(),
            reason: "Rate limit must be non-zero".to_string(),
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    /// Wait until the throttle admits another request
    async fn throttle(&self) {
        self.rate_limiter.until_ready().await;
    }

    /// GET `url` and decode a JSON body
    ///
    /// `operation` names the resource for error messages ("users", "product", ...).
    ///
    /// # Errors
    ///
    /// - `FetchError::Transport` if no response arrived
    /// - `FetchError::Status` for non-success statuses
    /// - `FetchError::Decode` if the body is not the expected JSON
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        operation: &'static str,
    ) -> FetchResult<T> {
        self.throttle().await;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("GET {} failed with HTTP {}", url, status.as_u16());
            return Err(FetchError::status(operation, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { operation, source })?;

        tracing::debug!("Fetched {} ({} bytes)", url, body.len());

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            operation,
            reason: e.to_string(),
        })
    }

    /// POST a JSON body and return the raw response for status inspection
    ///
    /// # Errors
    ///
    /// Returns the transport error if no response arrived
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: &B,
    ) -> reqwest::Result<Response> {
        self.throttle().await;
        self.client.post(url.clone()).json(body).send().await
    }
}
