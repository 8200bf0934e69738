//! Teams online meetings.

pub mod models;

pub use models::{NewOnlineMeeting, OnlineMeeting};

use crate::error::ApiError;
use crate::graph::{GraphClient, GraphRequest};
use tracing::info;

impl GraphClient {
    /// Create a standalone online meeting; Graph answers 201.
    pub async fn create_online_meeting(
        &self,
        meeting: &NewOnlineMeeting,
    ) -> Result<OnlineMeeting, ApiError> {
        if meeting.end_date_time <= meeting.start_date_time {
            return Err(ApiError::Encode(
                "meeting must end after it starts".to_string(),
            ));
        }

        let request =
            GraphRequest::post(self.user_segments(&["onlineMeetings"])).json(meeting)?;

        let created: OnlineMeeting = self.send(request).await?.json()?;
        info!("Created online meeting {}", created.id);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::client::tests::client_for;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn meeting() -> NewOnlineMeeting {
        let start = Utc.with_ymd_and_hms(2025, 4, 3, 12, 0, 0).unwrap();
        NewOnlineMeeting {
            subject: "Test Meeting".into(),
            start_date_time: start,
            end_date_time: start + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn test_create_online_meeting_returns_join_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1.0/me/onlineMeetings"))
            .and(body_partial_json(json!({ "subject": "Test Meeting" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "meeting-123",
                "subject": "Test Meeting",
                "startDateTime": "2025-04-03T12:00:00Z",
                "endDateTime": "2025-04-03T13:00:00Z",
                "joinUrl": "https://teams.microsoft.com/l/meetup-join/123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client_for(&server, "me")
            .create_online_meeting(&meeting())
            .await
            .unwrap();
        assert_eq!(created.id, "meeting-123");
        assert_eq!(
            created.join_url().unwrap(),
            "https://teams.microsoft.com/l/meetup-join/123"
        );
    }

    #[tokio::test]
    async fn test_create_online_meeting_rejects_inverted_range() {
        let server = MockServer::start().await;
        let mut inverted = meeting();
        inverted.end_date_time = inverted.start_date_time - Duration::minutes(5);

        let err = client_for(&server, "me")
            .create_online_meeting(&inverted)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("end after it starts"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
