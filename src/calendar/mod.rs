//! Outlook calendar event operations.

pub mod models;

pub use models::{
    BodyContentType, DateTimeTimeZone, Event, EventList, EventUpdate, ItemBody, Location, NewEvent,
};

use crate::error::ApiError;
use crate::graph::{GraphClient, GraphRequest};
use tracing::info;

fn require_id(event_id: &str) -> Result<&str, ApiError> {
    let trimmed = event_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidPath("event id must not be empty".to_string()));
    }
    Ok(trimmed)
}

impl GraphClient {
    /// List the next `top` events ordered by start time.
    pub async fn list_events(&self, top: u32) -> Result<Vec<Event>, ApiError> {
        let request = GraphRequest::get(self.user_segments(&["events"]))
            .query("$orderby", "start/dateTime")
            .query("$top", top);

        let list: EventList = self.send(request).await?.json()?;
        info!("Fetched {} events", list.value.len());
        Ok(list.value)
    }

    /// Create an event; Graph answers 201 with the stored event.
    pub async fn create_event(&self, event: &NewEvent) -> Result<Event, ApiError> {
        let request = GraphRequest::post(self.user_segments(&["events"])).json(event)?;

        let created: Event = self.send(request).await?.json()?;
        info!("Created event {}", created.id);
        Ok(created)
    }

    /// Patch an event by id.
    pub async fn update_event(
        &self,
        event_id: &str,
        update: &EventUpdate,
    ) -> Result<Event, ApiError> {
        let event_id = require_id(event_id)?;
        if update.is_empty() {
            return Err(ApiError::Encode(
                "event update must set at least one field".to_string(),
            ));
        }

        let request =
            GraphRequest::patch(self.user_segments(&["events", event_id])).json(update)?;

        let updated: Event = self.send(request).await?.json()?;
        info!("Updated event {}", updated.id);
        Ok(updated)
    }

    /// Delete an event by id; Graph answers 204.
    pub async fn delete_event(&self, event_id: &str) -> Result<(), ApiError> {
        let event_id = require_id(event_id)?;

        self.send(GraphRequest::delete(
            self.user_segments(&["events", event_id]),
        ))
        .await?;
        info!("Deleted event {}", event_id);
        Ok(())
    }
}
