//! Calendar events produced from the timetable and exam tables.

use std::fmt;

use chrono::NaiveDateTime;
use uuid::Uuid;

/// A single dated occurrence, in the institution's local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub summary: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl CalendarEvent {
    /// UID derived from the event's content. Identical input gives identical UIDs.
    pub fn uid(&self) -> String {
        let key = format!(
            "{}|{}|{}|{}",
            self.summary,
            self.start.format("%Y%m%dT%H%M"),
            self.end.format("%Y%m%dT%H%M"),
            self.location.as_deref().unwrap_or_default()
        );
        format!("{}@ntu-ical", Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()))
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} {}",
            self.start.format("%a %Y-%m-%d"),
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.summary
        )?;
        if let Some(ref location) = self.location {
            write!(f, " @ {location}")?;
        }
        Ok(())
    }
}
