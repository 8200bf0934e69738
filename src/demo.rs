//! The two demonstration sequences.
//!
//! Each step aborts the rest of its sequence on failure. Nothing is rolled
//! back: an event created before a failing update stays in the calendar.

use crate::calendar::{
    BodyContentType, DateTimeTimeZone, Event, EventUpdate, ItemBody, Location, NewEvent,
};
use crate::config::CalendarConfig;
use crate::error::AppError;
use crate::graph::GraphClient;
use crate::meetings::{NewOnlineMeeting, OnlineMeeting};
use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use std::io::Write;
use tracing::{info, warn};

const GRAPH_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S";

/// What the calendar demo did, step by step.
#[derive(Debug)]
pub struct CalendarDemoReport {
    pub listed: Vec<Event>,
    pub created_id: String,
    pub updated_subject: Option<String>,
}

/// Wall-clock time of `now` in `time_zone`. Graph also accepts Windows zone
/// names such as `Tokyo Standard Time`; those fall back to UTC.
pub fn local_now(now: DateTime<Utc>, time_zone: &str) -> NaiveDateTime {
    match time_zone.parse::<Tz>() {
        Ok(tz) => now.with_timezone(&tz).naive_local(),
        Err(_) => {
            warn!(
                "Unknown IANA time zone '{}', computing the event date in UTC",
                time_zone
            );
            now.naive_utc()
        }
    }
}

/// Event scheduled for 10:00-11:00 on the day after `now`, where `now` is the
/// wall-clock time in `time_zone`.
pub fn demo_event(now: NaiveDateTime, time_zone: &str) -> NewEvent {
    let day = now.date() + Duration::days(1);
    let start = day.and_time(NaiveTime::MIN) + Duration::hours(10);
    let end = start + Duration::hours(1);

    NewEvent {
        subject: "Meeting created by graphcal".to_string(),
        body: Some(ItemBody {
            content_type: BodyContentType::Html,
            content: "This meeting was created from Rust through Microsoft Graph.".to_string(),
        }),
        start: DateTimeTimeZone {
            date_time: start.format(GRAPH_DATE_TIME).to_string(),
            time_zone: time_zone.to_string(),
        },
        end: DateTimeTimeZone {
            date_time: end.format(GRAPH_DATE_TIME).to_string(),
            time_zone: time_zone.to_string(),
        },
        location: Some(Location {
            display_name: Some("Online meeting".to_string()),
        }),
    }
}

/// Meeting starting an hour after `now` and lasting one hour.
pub fn demo_meeting(now: DateTime<Utc>) -> NewOnlineMeeting {
    let start = now + Duration::hours(1);
    NewOnlineMeeting {
        subject: "Test Meeting".to_string(),
        start_date_time: start,
        end_date_time: start + Duration::hours(1),
    }
}

/// List, create, update and delete an event, in that order.
pub async fn run_calendar_demo(
    graph: &GraphClient,
    calendar: &CalendarConfig,
    out: &mut impl Write,
) -> Result<CalendarDemoReport, AppError> {
    let listed = graph.list_events(calendar.list_top).await?;
    writeln!(out, "Upcoming events:")?;
    if listed.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for event in &listed {
        writeln!(out, "- {}", event.display_line())?;
    }

    let new_event = demo_event(
        local_now(Utc::now(), &calendar.time_zone),
        &calendar.time_zone,
    );
    let created = graph.create_event(&new_event).await?;
    writeln!(out, "Created event. ID: {}", created.id)?;

    let update = EventUpdate::subject(format!("[Updated] {}", new_event.subject));
    let updated = graph.update_event(&created.id, &update).await?;
    writeln!(out, "Updated event subject.")?;

    graph.delete_event(&created.id).await?;
    writeln!(out, "Deleted event.")?;

    info!("Calendar demo finished");
    Ok(CalendarDemoReport {
        listed,
        created_id: created.id,
        updated_subject: updated.subject,
    })
}

/// Create an online meeting and print its join URL.
pub async fn run_teams_demo(
    graph: &GraphClient,
    out: &mut impl Write,
) -> Result<OnlineMeeting, AppError> {
    let meeting = graph
        .create_online_meeting(&demo_meeting(Utc::now()))
        .await?;
    writeln!(out, "Teams meeting URL: {}", meeting.join_url()?)?;

    info!("Teams demo finished");
    Ok(meeting)
}
