//! Configuration loading and management.
//!
//! Loads configuration from embedded config.toml with environment variable overrides.

use crate::auth::SecureString;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use url::Url;

/// Embedded configuration file content.
const CONFIG_TOML: &str = include_str!("../config.toml");

/// Environment variable holding a pre-obtained bearer token.
pub const ACCESS_TOKEN_VAR: &str = "MS_GRAPH_ACCESS_TOKEN";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub oauth: OAuthConfig,
    pub api: ApiConfig,
    pub http: HttpConfig,
    pub retry: RetryConfig,
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,

    /// Pre-obtained bearer token. When set, the client-credentials exchange is skipped.
    #[serde(skip)]
    pub access_token: Option<SecureString>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    pub tenant: String,
    pub client_id: String,
    pub client_secret: SecureString,
    pub scope: String,
    pub authority_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub graph_base_url: String,
    /// `me`, or a user id / UPN addressed through `/users/{user}`.
    pub user: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Windows or IANA time zone name sent with created events.
    pub time_zone: String,
    /// Number of upcoming events fetched by the listing step.
    pub list_top: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from embedded config.toml with environment variable overrides.
    pub fn load() -> Result<Self> {
        Self::load_with(CONFIG_TOML, |key| env::var(key).ok())
    }

    /// Parse `source`, apply overrides looked up through `var`, then validate.
    pub fn load_with(source: &str, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config: Config =
            toml::from_str(source).context("Failed to parse config.toml")?;

        config.apply_overrides(var);
        config.validate()?;

        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(tenant) = var("AZURE_TENANT_ID") {
            self.oauth.tenant = tenant;
        }

        if let Some(client_id) = var("AZURE_CLIENT_ID") {
            self.oauth.client_id = client_id;
        }

        if let Some(secret) = var("AZURE_CLIENT_SECRET") {
            self.oauth.client_secret = SecureString::new(secret);
        }

        if let Some(scope) = var("AZURE_SCOPE") {
            self.oauth.scope = scope;
        }

        if let Some(authority) = var("AZURE_AUTHORITY_URL") {
            self.oauth.authority_url = authority;
        }

        if let Some(base_url) = var("GRAPH_BASE_URL") {
            self.api.graph_base_url = base_url;
        }

        if let Some(user) = var("GRAPH_USER") {
            self.api.user = user;
        }

        if let Some(token) = var(ACCESS_TOKEN_VAR).filter(|t| !t.trim().is_empty()) {
            self.access_token = Some(SecureString::new(token.trim().to_string()));
        }

        if let Some(log_level) = var("RUST_LOG") {
            self.logging.level = log_level;
        }
    }

    /// Validate that required configuration is present.
    fn validate(&self) -> Result<()> {
        // A pre-obtained token makes the client credentials irrelevant.
        if self.access_token.is_none() {
            if is_placeholder(&self.oauth.tenant, "YOUR_TENANT_ID") {
                anyhow::bail!(
                    "Azure AD tenant not configured. Set AZURE_TENANT_ID environment variable \
                     or update config.toml"
                );
            }

            if is_placeholder(&self.oauth.client_id, "YOUR_CLIENT_ID") {
                anyhow::bail!(
                    "Azure AD client_id not configured. Set AZURE_CLIENT_ID environment variable \
                     or update config.toml"
                );
            }

            if is_placeholder(self.oauth.client_secret.as_str(), "YOUR_CLIENT_SECRET") {
                anyhow::bail!(
                    "Azure AD client secret not configured. Set AZURE_CLIENT_SECRET environment \
                     variable or {} with a pre-obtained token",
                    ACCESS_TOKEN_VAR
                );
            }
        }

        if self.retry.max_attempts == 0 {
            anyhow::bail!("retry.max_attempts must be at least 1");
        }

        if self.api.user.trim().is_empty() {
            anyhow::bail!("api.user must not be empty (use \"me\" for the signed-in user)");
        }

        parse_base_url(&self.api.graph_base_url).context("Invalid api.graph_base_url")?;
        parse_base_url(&self.oauth.authority_url).context("Invalid oauth.authority_url")?;

        Ok(())
    }

    /// Get the token URL for Azure AD.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.oauth.authority_url.trim_end_matches('/'),
            self.oauth.tenant
        )
    }
}

/// Load a `.env` file from the working directory, if there is one.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}

fn is_placeholder(value: &str, placeholder: &str) -> bool {
    value.trim().is_empty() || value == placeholder
}

/// Parse an absolute base URL that can carry path segments.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("'{}' is not a valid URL", raw))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("'{}' must be an absolute http(s) URL", raw);
    }
    Ok(url)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    /// Config pointing both the identity and Graph endpoints at `server_uri`.
    pub(crate) fn mock_config(server_uri: &str) -> Config {
        let authority = server_uri.to_string();
        let graph = format!("{}/v1.0", server_uri);
        Config::load_with(
            CONFIG_TOML,
            env_of(&[
                ("AZURE_TENANT_ID", "test-tenant"),
                ("AZURE_CLIENT_ID", "test-client"),
                ("AZURE_CLIENT_SECRET", "test-secret"),
                ("AZURE_AUTHORITY_URL", authority.as_str()),
                ("GRAPH_BASE_URL", graph.as_str()),
            ]),
        )
        .map(|mut config| {
            config.retry.initial_backoff_ms = 1;
            config.retry.max_backoff_ms = 5;
            config
        })
        .unwrap()
    }

    #[test]
    fn test_config_parsing() {
        let result = toml::from_str::<Config>(CONFIG_TOML);
        assert!(result.is_ok(), "Config parsing failed: {:?}", result.err());
    }

    #[test]
    fn test_placeholders_rejected() {
        let err = Config::load_with(CONFIG_TOML, env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("AZURE_TENANT_ID"));

        let err = Config::load_with(
            CONFIG_TOML,
            env_of(&[("AZURE_TENANT_ID", "t"), ("AZURE_CLIENT_ID", "c")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("AZURE_CLIENT_SECRET"));
    }

    #[test]
    fn test_static_token_skips_credentials() {
        let config =
            Config::load_with(CONFIG_TOML, env_of(&[(ACCESS_TOKEN_VAR, " abc \n")])).unwrap();
        assert_eq!(config.access_token.unwrap().as_str(), "abc");
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::load_with(
            CONFIG_TOML,
            env_of(&[
                ("AZURE_TENANT_ID", "contoso"),
                ("AZURE_CLIENT_ID", "client"),
                ("AZURE_CLIENT_SECRET", "s3cret"),
                ("GRAPH_USER", "alice@contoso.com"),
                ("RUST_LOG", "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.oauth.tenant, "contoso");
        assert_eq!(config.oauth.client_secret.as_str(), "s3cret");
        assert_eq!(config.api.user, "alice@contoso.com");
        assert_eq!(config.logging.level, "debug");
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_urls() {
        let config = mock_config("http://127.0.0.1:9999/");
        assert_eq!(
            config.token_url(),
            "http://127.0.0.1:9999/test-tenant/oauth2/v2.0/token"
        );

        let config = Config::load_with(CONFIG_TOML, env_of(&[(ACCESS_TOKEN_VAR, "t")])).unwrap();
        assert_eq!(
            config.token_url(),
            "https://login.microsoftonline.com/YOUR_TENANT_ID/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = Config::load_with(
            CONFIG_TOML,
            env_of(&[(ACCESS_TOKEN_VAR, "t"), ("GRAPH_BASE_URL", "not a url")]),
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("graph_base_url"));

        assert!(parse_base_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_secret_redacted_in_debug() {
        let config = mock_config("http://127.0.0.1:9999");
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("test-secret"));
    }
}
