//! Bearer tokens and where they come from.

use super::oauth::{ClientCredentialsProvider, TokenFields};
use super::secure::SecureString;
use crate::config::Config;
use crate::error::AuthError;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// A bearer token for the Graph API.
///
/// The expiry is informational only; tokens are fetched once per run.
#[derive(Debug, Clone)]
pub struct AccessToken {
    secret: SecureString,
    token_type: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Wrap a token obtained outside this process.
    pub fn pre_obtained(secret: SecureString) -> Self {
        Self {
            secret,
            token_type: "Bearer".to_string(),
            expires_at: None,
        }
    }

    pub(crate) fn from_fields(fields: TokenFields) -> Self {
        let expires_at = fields
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs as i64));

        Self {
            secret: SecureString::new(fields.access_token),
            token_type: fields.token_type,
            expires_at,
        }
    }

    /// The raw token value for the `Authorization` header.
    pub fn secret(&self) -> &str {
        self.secret.as_str()
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Remaining lifetime, or `None` when unknown or already expired.
    pub fn time_until_expiry(&self) -> Option<Duration> {
        let expiry = self.expires_at?;
        let now = Utc::now();

        if expiry > now {
            Some(expiry - now)
        } else {
            None
        }
    }
}

/// Where the run's bearer token comes from.
pub enum TokenSource {
    /// A token handed in through `MS_GRAPH_ACCESS_TOKEN`.
    Static(AccessToken),
    /// The client-credentials exchange against Azure AD.
    ClientCredentials(ClientCredentialsProvider),
}

impl TokenSource {
    /// Pick the source implied by `config`: a pre-obtained token wins.
    pub fn from_config(config: &Config, http_client: reqwest::Client) -> Self {
        match &config.access_token {
            Some(token) => Self::Static(AccessToken::pre_obtained(token.clone())),
            None => Self::ClientCredentials(ClientCredentialsProvider::from_config(
                config,
                http_client,
            )),
        }
    }

    /// Obtain the token for this run.
    pub async fn acquire(&self) -> Result<AccessToken, AuthError> {
        match self {
            Self::Static(token) => {
                info!("Using pre-obtained access token");
                Ok(token.clone())
            }
            Self::ClientCredentials(provider) => {
                let token = provider.fetch_token().await?;
                if let Some(remaining) = token.time_until_expiry() {
                    info!("Access token valid for {}", format_duration(remaining));
                }
                Ok(token)
            }
        }
    }
}

/// Format duration as human-readable string (e.g., "45 min", "1 hour").
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes();

    if total_minutes < 1 {
        "< 1 min".to_string()
    } else if total_minutes < 60 {
        format!("{} min", total_minutes)
    } else {
        let hours = total_minutes / 60;
        let mins = total_minutes % 60;
        if mins == 0 {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(30)), "< 1 min");
        assert_eq!(format_duration(Duration::minutes(45)), "45 min");
        assert_eq!(format_duration(Duration::hours(1)), "1 hour");
        assert_eq!(format_duration(Duration::hours(2)), "2 hours");
        assert_eq!(format_duration(Duration::minutes(90)), "1h 30m");
    }

    #[test]
    fn test_time_until_expiry() {
        let token = AccessToken::from_fields(TokenFields {
            access_token: "abc".into(),
            token_type: "Bearer".into(),
            expires_in: Some(3600),
        });
        assert!(token.time_until_expiry().unwrap().num_minutes() > 55);

        let expired = AccessToken::from_fields(TokenFields {
            access_token: "abc".into(),
            token_type: "Bearer".into(),
            expires_in: Some(0),
        });
        assert!(expired.time_until_expiry().is_none());

        let unknown = AccessToken::pre_obtained("abc".into());
        assert!(unknown.time_until_expiry().is_none());
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::pre_obtained("very-secret".into());
        assert!(!format!("{:?}", token).contains("very-secret"));
    }

    #[tokio::test]
    async fn test_static_source_needs_no_network() {
        let source = TokenSource::Static(AccessToken::pre_obtained("pre".into()));
        let token = source.acquire().await.unwrap();
        assert_eq!(token.secret(), "pre");
    }
}
