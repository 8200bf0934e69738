//! Teams online meeting models.

use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for `POST /me/onlineMeetings`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOnlineMeeting {
    pub subject: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
}

/// Online meeting as returned by Graph.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineMeeting {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub start_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub join_url: Option<String>,
    #[serde(default)]
    pub join_web_url: Option<String>,
}

impl OnlineMeeting {
    /// The join link; `joinUrl` first, then the newer `joinWebUrl`.
    pub fn join_url(&self) -> Result<&str, ApiError> {
        self.join_url
            .as_deref()
            .or(self.join_web_url.as_deref())
            .filter(|url| !url.is_empty())
            .ok_or(ApiError::MissingField("joinUrl"))
    }
}
