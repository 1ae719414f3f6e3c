//! Week annotations and their expansion into dated events.
//!
//! Annotations look like `wk1-6`, `wk 8` or `wk2,4,6`: `wk` or a comma,
//! followed by a single week or an inclusive range. A block without any
//! annotation runs every teaching week.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use regex::Regex;

use crate::block::ClassBlock;
use crate::config::SemesterConfig;
use crate::error::{TimetableError, TimetableResult};
use crate::event::CalendarEvent;

static WEEK_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:wk|,)[ \t]*(?:(?P<range>\d+[ \t]*-[ \t]*\d+)|(?P<single>\d+))")
        .expect("valid week rule regex")
});

/// Which weeks a block runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekRule {
    Single(u32),
    /// Inclusive.
    Range(u32, u32),
}

impl WeekRule {
    pub fn contains(&self, week: u32) -> bool {
        match *self {
            WeekRule::Single(w) => w == week,
            WeekRule::Range(from, to) => (from..=to).contains(&week),
        }
    }
}

/// Whether a line carries at least one week annotation.
pub fn is_annotation(line: &str) -> bool {
    WEEK_RULE.is_match(line)
}

/// All week rules found anywhere in `detail`.
///
/// Tokens that match the pattern but do not fit in a `u32` are dropped.
pub fn parse_rules(detail: &str) -> Vec<WeekRule> {
    WEEK_RULE
        .captures_iter(detail)
        .filter_map(|caps| {
            if let Some(range) = caps.name("range") {
                let (from, to) = range.as_str().split_once('-')?;
                Some(WeekRule::Range(
                    from.trim().parse().ok()?,
                    to.trim().parse().ok()?,
                ))
            } else {
                caps.name("single")
                    .and_then(|single| single.as_str().parse().ok())
                    .map(WeekRule::Single)
            }
        })
        .collect()
}

/// Lines of `detail` that mention `wk` without yielding any rule.
///
/// A block whose annotations all land here still runs every week.
pub fn unmatched_annotations(detail: &str) -> Vec<String> {
    detail
        .lines()
        .map(str::trim)
        .filter(|line| line.to_ascii_lowercase().contains("wk"))
        .filter(|line| parse_rules(line).is_empty())
        .map(str::to_string)
        .collect()
}

/// Teaching weeks `1..=total` selected by `rules`; every week when there are none.
pub fn allowed_weeks(rules: &[WeekRule], total: u32) -> Vec<u32> {
    (1..=total)
        .filter(|week| rules.is_empty() || rules.iter().any(|rule| rule.contains(*week)))
        .collect()
}

/// Calendar date of `weekday` in teaching week `week`.
///
/// Weeks run Sunday to Saturday. Dates on or after the recess week move one
/// week later; week numbering is unaffected.
pub fn occurrence_date(config: &SemesterConfig, week: u32, weekday: Weekday) -> NaiveDate {
    let naive = config.semester_start + Duration::weeks(i64::from(week) - 1);
    let sunday = naive - Duration::days(i64::from(naive.weekday().num_days_from_sunday()));
    let date = sunday + Duration::days(i64::from(weekday.num_days_from_sunday()));

    if date >= config.recess_week {
        date + Duration::weeks(1)
    } else {
        date
    }
}

/// Parse a day header such as `MON` or `Monday`.
pub fn parse_weekday(label: &str) -> TimetableResult<Weekday> {
    label
        .trim()
        .parse::<Weekday>()
        .map_err(|_| TimetableError::UnknownDay(label.to_string()))
}

/// Parse `HHMM`: first two digits are the hour, last two the minute.
pub fn parse_hhmm(value: &str) -> TimetableResult<NaiveTime> {
    let invalid = || TimetableError::InvalidTime(value.to_string());

    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hour = value[..2].parse().map_err(|_| invalid())?;
    let minute = value[2..].parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// One event per allowed week of the block.
pub fn expand(block: &ClassBlock, config: &SemesterConfig) -> TimetableResult<Vec<CalendarEvent>> {
    let weekday = parse_weekday(&block.day)?;
    let begin = parse_hhmm(&block.begin)?;
    let end = parse_hhmm(&block.end)?;

    let rules = parse_rules(&block.detail);
    let summary = block.summary();
    let location = Some(block.room.clone()).filter(|room| !room.is_empty());
    let description = Some(block.description()).filter(|desc| !desc.is_empty());

    Ok(allowed_weeks(&rules, config.weeks)
        .into_iter()
        .map(|week| {
            let date = occurrence_date(config, week, weekday);
            CalendarEvent {
                start: date.and_time(begin),
                end: date.and_time(end),
                summary: summary.clone(),
                location: location.clone(),
                description: description.clone(),
            }
        })
        .collect())
}
