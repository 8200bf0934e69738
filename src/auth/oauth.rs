//! OAuth2 client-credentials grant against Azure AD.

use super::secure::SecureString;
use super::token::AccessToken;
use crate::config::Config;
use crate::error::AuthError;
use serde::Deserialize;
use tracing::{debug, error, info};

/// Application credentials for the client-credentials grant.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub tenant: String,
    pub client_id: String,
    pub client_secret: SecureString,
    pub scope: String,
}

impl ClientCredentials {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tenant: config.oauth.tenant.clone(),
            client_id: config.oauth.client_id.clone(),
            client_secret: config.oauth.client_secret.clone(),
            scope: config.oauth.scope.clone(),
        }
    }
}

/// Exchanges client credentials for a bearer token.
pub struct ClientCredentialsProvider {
    credentials: ClientCredentials,
    token_url: String,
    http_client: reqwest::Client,
}

impl ClientCredentialsProvider {
    pub fn new(
        credentials: ClientCredentials,
        token_url: impl Into<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            http_client,
        }
    }

    /// Create a provider for the tenant token endpoint named in `config`.
    pub fn from_config(config: &Config, http_client: reqwest::Client) -> Self {
        Self::new(
            ClientCredentials::from_config(config),
            config.token_url(),
            http_client,
        )
    }

    /// Perform the client-credentials exchange.
    pub async fn fetch_token(&self) -> Result<AccessToken, AuthError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", self.credentials.scope.as_str()),
        ];

        debug!(
            "Requesting client-credentials token for tenant {}",
            self.credentials.tenant
        );

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(AuthError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(AuthError::Network)?;

        if !status.is_success() {
            error!("Token request failed: HTTP {}", status);
            return Err(rejection(status.as_u16(), &body));
        }

        let token_response = parse_token_response(&body)?;
        let token = AccessToken::from_fields(token_response);

        match token.expires_at() {
            Some(expires_at) => info!("Acquired access token, expires at {}", expires_at),
            None => info!("Acquired access token"),
        }

        Ok(token)
    }
}

/// Successful token response from Azure AD.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Error response shape defined by RFC 6749 section 5.2.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Validated token fields.
#[derive(Debug)]
pub struct TokenFields {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
}

fn parse_token_response(body: &str) -> Result<TokenFields, AuthError> {
    let response: TokenResponse =
        serde_json::from_str(body).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

    match response.access_token {
        Some(access_token) if !access_token.is_empty() => Ok(TokenFields {
            access_token,
            token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
            expires_in: response.expires_in,
        }),
        _ => Err(AuthError::MissingAccessToken(body.to_string())),
    }
}

fn rejection(status: u16, body: &str) -> AuthError {
    match serde_json::from_str::<OAuthErrorResponse>(body) {
        Ok(err) => AuthError::Rejected {
            status,
            description: err.error_description.unwrap_or_else(|| err.error.clone()),
            error: err.error,
        },
        Err(_) => AuthError::Rejected {
            status,
            error: "unknown_error".to_string(),
            description: body.to_string(),
        },
    }
}
