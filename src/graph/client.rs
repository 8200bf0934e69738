//! Authenticated request dispatch against Microsoft Graph.

use super::retry::{self, RetryPolicy};
use crate::auth::{AccessToken, TokenSource};
use crate::config::{self, Config, HttpConfig};
use crate::error::{ApiError, AppError};
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;
use uuid::Uuid;

/// Correlation header understood by Graph diagnostics.
const CLIENT_REQUEST_ID: &str = "client-request-id";

/// Build the shared HTTP client with the configured timeouts.
pub fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .build()
}

/// One Graph call: method, resource path, optional query and JSON body, and
/// the status code the caller considers success.
#[derive(Debug, Clone)]
pub struct GraphRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    expected: StatusCode,
    /// Replaying after an unknown outcome leaves the resource in the same state.
    idempotent: bool,
}

impl GraphRequest {
    /// Create a request for `segments` below the Graph base URL. The expected
    /// status defaults to 201 for POST, 204 for DELETE and 200 otherwise.
    pub fn new(method: Method, segments: Vec<String>) -> Self {
        let expected = match method {
            Method::POST => StatusCode::CREATED,
            Method::DELETE => StatusCode::NO_CONTENT,
            _ => StatusCode::OK,
        };

        // DELETE is idempotent in HTTP terms, but a replay after a lost
        // response reports 404 for a delete that succeeded.
        let idempotent = matches!(
            method,
            Method::GET | Method::HEAD | Method::PUT | Method::PATCH
        );

        Self {
            method,
            segments,
            query: Vec::new(),
            body: None,
            expected,
            idempotent,
        }
    }

    pub fn get(segments: Vec<String>) -> Self {
        Self::new(Method::GET, segments)
    }

    pub fn post(segments: Vec<String>) -> Self {
        Self::new(Method::POST, segments)
    }

    pub fn patch(segments: Vec<String>) -> Self {
        Self::new(Method::PATCH, segments)
    }

    pub fn delete(segments: Vec<String>) -> Self {
        Self::new(Method::DELETE, segments)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Resource path as written in logs, e.g. `/me/events`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Status and parsed body of a successful Graph call.
#[derive(Debug, Clone)]
pub struct GraphResponse {
    status: StatusCode,
    body: Option<serde_json::Value>,
}

impl GraphResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Parsed JSON body, `None` for empty responses such as 204.
    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Decode the body into a typed structure.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let body = self
            .body
            .ok_or_else(|| ApiError::Decode("response body is empty".to_string()))?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// A failed attempt and the server's requested delay, if any.
struct Failure {
    error: ApiError,
    retry_after: Option<Duration>,
}

impl Failure {
    /// Whether the request can be sent again. Non-idempotent requests are only
    /// replayed when the server cannot have acted on them: the connection was
    /// never made, the call was throttled, or the service asked to come back
    /// later with `Retry-After`.
    fn is_retryable(&self, idempotent: bool) -> bool {
        if idempotent {
            return self.error.is_transient();
        }

        match &self.error {
            ApiError::Network(e) => e.is_connect(),
            ApiError::UnexpectedStatus { status: 429, .. } => true,
            ApiError::UnexpectedStatus { status: 503, .. } => self.retry_after.is_some(),
            _ => false,
        }
    }
}

impl From<ApiError> for Failure {
    fn from(error: ApiError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

/// Microsoft Graph API client bound to one bearer token.
pub struct GraphClient {
    http_client: reqwest::Client,
    base_url: Url,
    user: String,
    token: AccessToken,
    retry: RetryPolicy,
}

impl GraphClient {
    pub fn new(
        http_client: reqwest::Client,
        base_url: Url,
        user: impl Into<String>,
        token: AccessToken,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http_client,
            base_url,
            user: user.into(),
            token,
            retry,
        }
    }

    /// Create a client from configuration around an already acquired token.
    pub fn from_config(
        config: &Config,
        http_client: reqwest::Client,
        token: AccessToken,
    ) -> Result<Self, AppError> {
        let base_url = config::parse_base_url(&config.api.graph_base_url)
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;

        Ok(Self::new(
            http_client,
            base_url,
            config.api.user.trim(),
            token,
            RetryPolicy::from_config(&config.retry),
        ))
    }

    /// Acquire the run's token once and create a client around it.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let http_client = build_http_client(&config.http)?;
        let token = TokenSource::from_config(config, http_client.clone())
            .acquire()
            .await?;
        Self::from_config(config, http_client, token)
    }

    /// Path segments rooted at the configured user: `me/...` or `users/{id}/...`.
    pub fn user_segments(&self, rest: &[&str]) -> Vec<String> {
        let mut segments = if self.user == "me" {
            vec!["me".to_string()]
        } else {
            vec!["users".to_string(), self.user.clone()]
        };
        segments.extend(rest.iter().map(|s| s.to_string()));
        segments
    }

    fn url_for(&self, request: &GraphRequest) -> Result<Url, ApiError> {
        if request.segments.iter().any(|s| s.trim().is_empty()) {
            return Err(ApiError::InvalidPath(request.path()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidPath(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        Ok(url)
    }

    /// Send `request`, retrying transient failures per the retry policy.
    pub async fn send(&self, request: GraphRequest) -> Result<GraphResponse, ApiError> {
        let url = self.url_for(&request)?;
        let path = request.path();
        let mut attempt = 1;

        loop {
            match self.attempt(&request, &url, attempt).await {
                Ok(response) => return Ok(response),
                Err(failure)
                    if failure.is_retryable(request.idempotent)
                        && self.retry.should_retry(attempt) =>
                {
                    let delay = self.retry.delay(attempt, failure.retry_after);
                    warn!(
                        "{} {} failed (attempt {}/{}), retrying in {:?}: {}",
                        request.method,
                        path,
                        attempt,
                        self.retry.max_attempts(),
                        delay,
                        failure.error
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => {
                    error!("{} {} failed: {}", request.method, path, failure.error);
                    return Err(failure.error);
                }
            }
        }
    }

    async fn attempt(
        &self,
        request: &GraphRequest,
        url: &Url,
        attempt: u32,
    ) -> Result<GraphResponse, Failure> {
        let request_id = Uuid::new_v4().to_string();
        debug!(
            "{} {} (attempt {}, {} {})",
            request.method,
            request.path(),
            attempt,
            CLIENT_REQUEST_ID,
            request_id
        );

        let mut builder = self
            .http_client
            .request(request.method.clone(), url.clone())
            .bearer_auth(self.token.secret())
            .header(ACCEPT, "application/json")
            .header(CLIENT_REQUEST_ID, request_id);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::Network)?;

        let status = response.status();
        let retry_after = retry::retry_after(response.headers());
        let text = response.text().await.map_err(ApiError::Network)?;

        if status != request.expected {
            return Err(Failure {
                error: ApiError::UnexpectedStatus {
                    status: status.as_u16(),
                    body: text,
                },
                retry_after,
            });
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?)
        };

        Ok(GraphResponse { status, body })
    }
}
