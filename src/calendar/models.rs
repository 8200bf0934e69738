//! Outlook calendar event models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyContentType {
    #[serde(rename = "text", alias = "Text")]
    Text,
    #[serde(rename = "html", alias = "HTML", alias = "Html")]
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub content_type: BodyContentType,
    pub content: String,
}

/// Local date-time paired with the time zone it is expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    /// e.g. `2024-04-10T10:00:00`, no offset.
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Event as returned by the Graph `events` endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<ItemBody>,
    #[serde(default)]
    pub start: Option<DateTimeTimeZone>,
    #[serde(default)]
    pub end: Option<DateTimeTimeZone>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub web_link: Option<String>,
    #[serde(default)]
    pub is_online_meeting: Option<bool>,
}

impl Event {
    pub fn subject_or_default(&self) -> &str {
        self.subject
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("(no subject)")
    }

    /// One-line summary: `subject (start - end)`.
    pub fn display_line(&self) -> String {
        let start = self.start.as_ref().map_or("?", |s| s.date_time.as_str());
        let end = self.end.as_ref().map_or("?", |e| e.date_time.as_str());
        format!("{} ({} - {})", self.subject_or_default(), start, end)
    }
}

/// Collection envelope used by Graph list endpoints.
#[derive(Debug, Deserialize)]
pub struct EventList {
    pub value: Vec<Event>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Request body for creating an event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ItemBody>,
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// PATCH body; only fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ItemBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTimeTimeZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTimeTimeZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl EventUpdate {
    pub fn subject(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.body.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.location.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_from_graph_json() {
        let event: Event = serde_json::from_value(json!({
            "id": "AAMkAGI2",
            "subject": "Planning",
            "body": { "contentType": "html", "content": "<p>hi</p>" },
            "start": { "dateTime": "2024-04-10T10:00:00.0000000", "timeZone": "Asia/Tokyo" },
            "end": { "dateTime": "2024-04-10T11:00:00.0000000", "timeZone": "Asia/Tokyo" },
            "location": { "displayName": "Online" },
            "isOnlineMeeting": false,
            "webLink": "https://outlook.office365.com/owa/?itemid=AAMkAGI2"
        }))
        .unwrap();

        assert_eq!(event.id, "AAMkAGI2");
        assert_eq!(event.body.unwrap().content_type, BodyContentType::Html);
        assert_eq!(
            event.location.unwrap().display_name.as_deref(),
            Some("Online")
        );
    }

    #[test]
    fn test_event_without_optional_fields() {
        let event: Event = serde_json::from_value(json!({ "id": "1" })).unwrap();
        assert_eq!(event.display_line(), "(no subject) (? - ?)");
    }

    #[test]
    fn test_event_missing_id_is_an_error() {
        let result = serde_json::from_value::<Event>(json!({ "subject": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_only_serializes_set_fields() {
        let update = EventUpdate::subject("Renamed");
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "subject": "Renamed" })
        );
        assert!(EventUpdate::default().is_empty());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_new_event_wire_shape() {
        let event = NewEvent {
            subject: "Demo".into(),
            body: Some(ItemBody {
                content_type: BodyContentType::Html,
                content: "Created by graphcal.".into(),
            }),
            start: DateTimeTimeZone {
                date_time: "2024-04-10T10:00:00".into(),
                time_zone: "Asia/Tokyo".into(),
            },
            end: DateTimeTimeZone {
                date_time: "2024-04-10T11:00:00".into(),
                time_zone: "Asia/Tokyo".into(),
            },
            location: None,
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["body"]["contentType"], "html");
        assert_eq!(value["start"]["timeZone"], "Asia/Tokyo");
        assert!(value.get("location").is_none());
    }
}
