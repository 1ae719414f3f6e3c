//! ICS file generation.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike, Property};

use crate::config::SemesterConfig;
use crate::error::TimetableResult;
use crate::event::CalendarEvent;

/// Generate a calendar holding every event.
///
/// `dtstamp` is written as each event's DTSTAMP. Passing a fixed value makes
/// the output byte-identical across runs.
pub fn generate_ics<'a>(
    events: impl IntoIterator<Item = &'a CalendarEvent>,
    config: &SemesterConfig,
    dtstamp: DateTime<Utc>,
) -> TimetableResult<String> {
    let tz = config.tz()?;
    let dtstamp = dtstamp.format("%Y%m%dT%H%M%SZ").to_string();
    let mut cal = Calendar::new();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event.uid());
        ics_event.summary(&event.summary);
        ics_event.add_property("DTSTAMP", &dtstamp);

        add_datetime_property(&mut ics_event, "DTSTART", &event.start, tz);
        add_datetime_property(&mut ics_event, "DTEND", &event.end, tz);

        if let Some(ref desc) = event.description {
            ics_event.description(desc);
        }

        if let Some(ref loc) = event.location {
            ics_event.location(loc);
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();
    Ok(finish_ics(&cal.to_string(), &config.prod_id))
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with the configured identifier
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn finish_ics(ics: &str, prod_id: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(prod_id);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// Floating local time, or local time labelled with a TZID.
fn add_datetime_property(
    ics_event: &mut icalendar::Event,
    name: &str,
    time: &NaiveDateTime,
    tz: Option<Tz>,
) {
    let value = time.format("%Y%m%dT%H%M%S").to_string();
    match tz {
        Some(tz) => {
            let mut prop = Property::new(name, value);
            prop.add_parameter("TZID", tz.name());
            ics_event.append_property(prop);
        }
        None => {
            ics_event.add_property(name, value);
        }
    }
}
