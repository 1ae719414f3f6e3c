//! Terminal rendering for decoded timetable types.
//!
//! Extension traits that add colored output to ntu-ical-core types using
//! owo_colors.

use ntu_ical_core::block::ClassBlock;
use ntu_ical_core::Diagnostics;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ClassBlock {
    fn render(&self) -> String {
        let slot = format!("{} {}-{}", self.day, self.begin, self.end);
        let mut line = format!("{} {}", slot.cyan(), self.summary().bold());
        if !self.room.is_empty() {
            line.push_str(&format!(" @ {}", self.room));
        }
        line
    }
}

impl Render for Diagnostics {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        for skip in &self.skipped_blocks {
            lines.push(format!(
                "{} skipped block {} {}: {}",
                "!".yellow(),
                skip.day,
                skip.begin,
                skip.reason.dimmed()
            ));
        }

        for annotation in &self.unmatched_annotations {
            lines.push(format!(
                "{} {}: \"{}\" not understood, assuming every week",
                "!".yellow(),
                annotation.course,
                annotation.line
            ));
        }

        for skip in &self.skipped_exam_rows {
            lines.push(format!(
                "{} skipped exam row {}: {}",
                "!".yellow(),
                skip.row,
                skip.reason.dimmed()
            ));
        }

        lines.join("\n")
    }
}

/// Compact week list, e.g. `weeks 1-6, 8`.
pub fn format_weeks(weeks: &[u32]) -> String {
    if weeks.is_empty() {
        return "no weeks".to_string();
    }

    let mut ranges: Vec<(u32, u32)> = Vec::new();
    for &week in weeks {
        match ranges.last_mut() {
            Some((_, end)) if *end + 1 == week => *end = week,
            _ => ranges.push((week, week)),
        }
    }

    let parts: Vec<String> = ranges
        .into_iter()
        .map(|(from, to)| {
            if from == to {
                from.to_string()
            } else {
                format!("{from}-{to}")
            }
        })
        .collect();

    format!("{} {}", pluralize("week", weeks.len()), parts.join(", "))
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> &str {
    if count == 1 {
        word
    } else {
        match word {
            "event" => "events",
            "week" => "weeks",
            _ => word,
        }
    }
}
