//! Timetable decoding for ntu-ical.
//!
//! This crate turns a course registration export (an HTML page holding a
//! legend table, a weekly timetable grid and an exam schedule) into dated
//! calendar events:
//! - `grid` reads the timetable's row-spanning cells into raw blocks
//! - `block` splits cell text into class sections
//! - `merge` stitches sections continuing across row-span segments
//! - `weeks` expands week annotations into dated occurrences
//! - `exam` reads the exam table
//! - `schedule` runs the whole pipeline; `ics` serializes the result

pub mod block;
pub mod config;
pub mod error;
pub mod event;
pub mod exam;
pub mod grid;
pub mod html;
pub mod ics;
pub mod merge;
pub mod schedule;
pub mod weeks;

pub use config::SemesterConfig;
pub use error::{TimetableError, TimetableResult};
pub use event::CalendarEvent;
pub use schedule::{Diagnostics, Schedule};
