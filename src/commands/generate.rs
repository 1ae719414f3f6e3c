use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use ntu_ical_core::Schedule;
use owo_colors::OwoColorize;

use super::{read_input, SemesterArgs};
use crate::render::{pluralize, Render};

pub fn run(input: &Path, output: Option<&Path>, semester: &SemesterArgs) -> Result<()> {
    let config = semester.resolve()?;
    let html = read_input(input)?;

    let schedule = Schedule::from_html(&html, &config);

    if !schedule.diagnostics.is_empty() {
        eprintln!("{}", schedule.diagnostics.render());
    }

    let (classes, exams) = match (&schedule.classes, &schedule.exams) {
        (Err(class_err), Err(exam_err)) => {
            anyhow::bail!("Nothing to write.\n  Timetable: {class_err}\n  Exams: {exam_err}")
        }
        (classes, exams) => (
            report_table("Timetable", classes),
            report_table("Exams", exams),
        ),
    };

    let ics = schedule.to_ics(&config, Utc::now())?;

    match output {
        Some(path) => {
            std::fs::write(path, ics)
                .with_context(|| format!("Could not write {}", path.display()))?;
            eprintln!(
                "{} {} class {} and {} exam {} to {}",
                "✓".green(),
                classes,
                pluralize("event", classes),
                exams,
                pluralize("event", exams),
                path.display()
            );
        }
        None => print!("{ics}"),
    }

    Ok(())
}

/// Event count of a decoded table, printing the error of a failed one.
fn report_table<E: std::fmt::Display>(
    label: &str,
    result: &Result<Vec<ntu_ical_core::CalendarEvent>, E>,
) -> usize {
    match result {
        Ok(events) => events.len(),
        Err(e) => {
            eprintln!("{} {}: {}", "✗".red(), label, e.red());
            0
        }
    }
}
