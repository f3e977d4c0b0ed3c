//! HTTP implementation of the collaborator traits
//!
//! One `RestClient` serves every trait; the impls are split by domain.

mod categories;
mod channels;
mod posts;
mod preferences;
mod statuses;

use std::time::Duration;

use chat_common::ServerConfig;
use chat_core::ApiResult;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::response;
use crate::routes::Routes;

/// Errors raised while building a client
#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("Invalid auth token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// REST client for the server's v4 API
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    routes: Routes,
}

impl RestClient {
    /// Create a client for `base_url`, sending `token` as a bearer token
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ClientBuildError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            routes: Routes::new(base_url),
        })
    }

    /// Create a client from the server section of the configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self, ClientBuildError> {
        Self::new(
            config.base_url(),
            config.token.as_deref(),
            config.request_timeout(),
        )
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    // ===== Request helpers =====

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> ApiResult<T> {
        debug!(url = %url, "Sending request");
        let response = request
            .send()
            .await
            .map_err(|e| response::transport_error(&e, url))?;
        response::json(response, url).await
    }

    async fn send_empty(&self, request: RequestBuilder, url: &str) -> ApiResult<()> {
        debug!(url = %url, "Sending request");
        let response = request
            .send()
            .await
            .map_err(|e| response::transport_error(&e, url))?;
        response::empty(response, url).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        self.send_json(self.http.get(url), url).await
    }

    async fn get_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        self.send_json(self.http.get(url).query(query), url).await
    }
}
