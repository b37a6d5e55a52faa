//! # HTTP client
//!
//! Thin JSON transport over `reqwest`. Every call takes the bearer credential
//! as an explicit parameter — there is deliberately no shared "current token"
//! default on the client, so a stale token from a previous session can never
//! leak into a request.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use serde::Serialize;
use serde_json::Value;
use store::ClientConfig;

use crate::error::ApiClientError;

/// Fixed request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(150);

/// JSON transport bound to one backend base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiClientError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ApiClientError::internal(format!("No se pudo inicializar el cliente HTTP: {e}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiClientError> {
        Self::with_timeout(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Value, ApiClientError> {
        self.send(self.http.get(self.url(path)), token).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<Value, ApiClientError> {
        self.send(self.http.post(self.url(path)).json(body), token)
            .await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<Value, ApiClientError> {
        self.send(self.http.put(self.url(path)).json(body), token)
            .await
    }

    async fn send(
        &self,
        mut request: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> Result<Value, ApiClientError> {
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(ApiClientError::network)?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Error bodies matter for classification; a non-JSON body is fine.
        let body = response.json::<Value>().await.ok();

        if (200..300).contains(&status) {
            Ok(body.unwrap_or(Value::Null))
        } else {
            Err(ApiClientError::classify(
                status,
                retry_after.as_deref(),
                body,
            ))
        }
    }
}
