//! Exam schedule decoding.
//!
//! The exam table has a header row, one row per course and a trailing notes
//! row. Column 2 is the course code and column 5 reads like
//! `15-Nov-2019 0900-1100`. Placeholder rows ("Not Applicable", "TBA") are
//! common and are skipped, not treated as failures.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use scraper::ElementRef;
use tracing::debug;

use crate::event::CalendarEvent;
use crate::html::{cell_text, direct_rows};

static EXAM_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<begin>[0-9]{4})-(?P<end>[0-9]{4})$").expect("valid exam time regex")
});

const CODE_COLUMN: usize = 1;
const DATE_COLUMN: usize = 4;

/// Course code and raw date cell of one exam row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamEntry {
    pub code: String,
    pub date: String,
}

/// An exam row that produced no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamRowSkip {
    /// 1-based row number in the table.
    pub row: usize,
    pub reason: String,
}

impl ExamEntry {
    /// Parse the date cell into an event; `Err` carries the skip reason.
    pub fn to_event(&self) -> Result<CalendarEvent, String> {
        let mut parts = self.date.split_whitespace();
        let (Some(raw_date), Some(raw_time)) = (parts.next(), parts.next()) else {
            return Err(format!("'{}' has no date and time", self.date));
        };

        let date = NaiveDate::parse_from_str(raw_date, "%d-%b-%Y")
            .map_err(|_| format!("invalid date '{raw_date}'"))?;

        let caps = EXAM_TIME
            .captures(raw_time)
            .ok_or_else(|| format!("invalid time '{raw_time}'"))?;
        let begin = hhmm(&caps["begin"]).ok_or_else(|| format!("invalid time '{raw_time}'"))?;
        let end = hhmm(&caps["end"]).ok_or_else(|| format!("invalid time '{raw_time}'"))?;

        Ok(CalendarEvent {
            start: date.and_time(begin),
            end: date.and_time(end),
            summary: self.code.clone(),
            location: None,
            description: None,
        })
    }
}

fn hhmm(digits: &str) -> Option<NaiveTime> {
    let hour = digits.get(..2)?.parse().ok()?;
    let minute = digits.get(2..)?.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Course rows of the exam table, without the header and trailer rows.
///
/// Rows too short to have a date column are reported as skips.
pub fn exam_entries(table: ElementRef<'_>) -> (Vec<(usize, ExamEntry)>, Vec<ExamRowSkip>) {
    let rows = direct_rows(table);
    let body = rows.get(1..rows.len().saturating_sub(1)).unwrap_or_default();

    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for (i, row) in body.iter().enumerate() {
        let row_number = i + 2;
        match (cell_text(*row, CODE_COLUMN), cell_text(*row, DATE_COLUMN)) {
            (Some(code), Some(date)) => entries.push((row_number, ExamEntry { code, date })),
            _ => skipped.push(ExamRowSkip {
                row: row_number,
                reason: "row has fewer than 5 cells".to_string(),
            }),
        }
    }

    (entries, skipped)
}

/// Decode the exam table into one event per valid row.
pub fn decode_exams(table: ElementRef<'_>) -> (Vec<CalendarEvent>, Vec<ExamRowSkip>) {
    let (entries, mut skipped) = exam_entries(table);
    let mut events = Vec::new();

    for (row, entry) in entries {
        match entry.to_event() {
            Ok(event) => events.push(event),
            Err(reason) => skipped.push(ExamRowSkip {
                row,
                reason: format!("{}: {reason}", entry.code),
            }),
        }
    }

    skipped.sort_by_key(|skip| skip.row);
    debug!(exams = events.len(), skipped = skipped.len(), "decoded exam table");

    (events, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::nth_table;
    use scraper::Html;

    fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn exam_table(rows: &[(&str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(code, date)| {
                format!("<tr><td>1</td><td>{code}</td><td>Title</td><td>3</td><td>{date}</td></tr>")
            })
            .collect();
        format!(
            "<table><tr><td>No</td><td>Course</td><td>Title</td><td>AU</td><td>Exam</td></tr>\
             {body}<tr><td colspan=5>Total AU</td></tr></table>"
        )
    }

    fn decode(html: &str) -> (Vec<CalendarEvent>, Vec<ExamRowSkip>) {
        let document = Html::parse_document(html);
        decode_exams(nth_table(&document, 0).unwrap())
    }

    #[test]
    fn valid_row_becomes_event() {
        let (events, skipped) = decode(&exam_table(&[("CS101", "15-Nov-2019 0900-1100")]));

        assert!(skipped.is_empty(), "unexpected skips: {skipped:?}");
        assert_eq!(
            events,
            vec![CalendarEvent {
                start: at(2019, 11, 15, 9, 0),
                end: at(2019, 11, 15, 11, 0),
                summary: "CS101".to_string(),
                location: None,
                description: None,
            }]
        );
    }

    #[test]
    fn garbage_row_is_skipped() {
        let (events, skipped) = decode(&exam_table(&[("CS101", "garbage")]));
        assert!(events.is_empty());
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].row, 2);
    }

    #[test]
    fn mixed_rows_keep_valid_ones() {
        let (events, skipped) = decode(&exam_table(&[
            ("CZ3005", "26-Nov-2019 1300-1500"),
            ("CZ3006", "Not Applicable"),
            ("CZ3007", "31-Feb-2019 0900-1100"),
            ("CZ3008", "02-Dec-2019 9am-11am"),
            ("CZ3009", "02-Dec-2019 1700-1900"),
        ]));

        let codes: Vec<_> = events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(codes, vec!["CZ3005", "CZ3009"]);
        assert_eq!(skipped.iter().map(|s| s.row).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(skipped[1].reason.contains("invalid date"), "{:?}", skipped[1]);
        assert!(skipped[2].reason.contains("invalid time"), "{:?}", skipped[2]);
    }

    #[test]
    fn header_and_trailer_rows_are_ignored() {
        let (events, skipped) = decode(&exam_table(&[]));
        assert!(events.is_empty());
        assert!(skipped.is_empty());
    }

    #[test]
    fn short_rows_are_reported() {
        let html = "<table><tr><td>h</td></tr><tr><td>1</td><td>CS101</td></tr><tr><td>t</td></tr></table>";
        let (events, skipped) = decode(html);
        assert!(events.is_empty());
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn out_of_range_time_is_rejected() {
        let entry = ExamEntry {
            code: "CS101".to_string(),
            date: "15-Nov-2019 2500-2600".to_string(),
        };
        assert!(entry.to_event().is_err());
    }
}
