//! Whole-document assembly.
//!
//! The timetable and the exam table are decoded independently, so a broken
//! timetable still yields exam events and vice versa. Problems that only
//! affect one block, annotation or exam row are collected in [`Diagnostics`]
//! instead of failing the run.

use chrono::{DateTime, Utc};
use scraper::Html;
use tracing::warn;

use crate::block::ClassBlock;
use crate::config::SemesterConfig;
use crate::error::{TimetableError, TimetableResult};
use crate::event::CalendarEvent;
use crate::exam::{decode_exams, ExamRowSkip};
use crate::grid::decode_grid;
use crate::html::{nth_table, EXAM_TABLE_INDEX, TIMETABLE_INDEX};
use crate::ics::generate_ics;
use crate::merge::merge_blocks;
use crate::weeks::{expand, unmatched_annotations};

/// A timetable block dropped because of a block-level error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    pub day: String,
    pub begin: String,
    pub reason: String,
}

/// An annotation-looking line that yielded no week rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedAnnotation {
    pub course: String,
    pub line: String,
}

/// Everything that was recovered from rather than reported as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub skipped_blocks: Vec<SkippedBlock>,
    pub unmatched_annotations: Vec<UnmatchedAnnotation>,
    pub skipped_exam_rows: Vec<ExamRowSkip>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.skipped_blocks.is_empty()
            && self.unmatched_annotations.is_empty()
            && self.skipped_exam_rows.is_empty()
    }

    fn skip_block(&mut self, day: &str, begin: &str, error: &TimetableError) {
        warn!(day, begin, %error, "skipping timetable block");
        self.skipped_blocks.push(SkippedBlock {
            day: day.to_string(),
            begin: begin.to_string(),
            reason: error.to_string(),
        });
    }
}

/// Decoded events of one document.
#[derive(Debug)]
pub struct Schedule {
    pub classes: TimetableResult<Vec<CalendarEvent>>,
    pub exams: TimetableResult<Vec<CalendarEvent>>,
    pub diagnostics: Diagnostics,
}

impl Schedule {
    pub fn from_html(html: &str, config: &SemesterConfig) -> Self {
        let document = Html::parse_document(html);
        let mut diagnostics = Diagnostics::default();

        let classes = class_blocks(&document, config, &mut diagnostics)
            .map(|blocks| class_events(&blocks, config, &mut diagnostics));
        if let Err(ref error) = classes {
            warn!(%error, "timetable could not be decoded");
        }

        let exams = nth_table(&document, EXAM_TABLE_INDEX).map(|table| {
            let (events, skipped) = decode_exams(table);
            for skip in &skipped {
                warn!(row = skip.row, reason = %skip.reason, "skipping exam row");
            }
            diagnostics.skipped_exam_rows = skipped;
            events
        });
        if let Err(ref error) = exams {
            warn!(%error, "exam table could not be decoded");
        }

        Schedule {
            classes,
            exams,
            diagnostics,
        }
    }

    /// Events of every table that decoded, classes first.
    pub fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        let classes = self.classes.as_deref().unwrap_or_default();
        let exams = self.exams.as_deref().unwrap_or_default();
        classes.iter().chain(exams)
    }

    pub fn to_ics(&self, config: &SemesterConfig, dtstamp: DateTime<Utc>) -> TimetableResult<String> {
        generate_ics(self.events(), config, dtstamp)
    }
}

/// [`class_blocks`] for an unparsed HTML document.
pub fn class_blocks_from_html(
    html: &str,
    config: &SemesterConfig,
    diagnostics: &mut Diagnostics,
) -> TimetableResult<Vec<ClassBlock>> {
    class_blocks(&Html::parse_document(html), config, diagnostics)
}

/// Timetable class blocks after splitting, merging and course-name lookup.
///
/// Cells that fail to split are skipped and recorded in `diagnostics`.
pub fn class_blocks(
    document: &Html,
    config: &SemesterConfig,
    diagnostics: &mut Diagnostics,
) -> TimetableResult<Vec<ClassBlock>> {
    let table = nth_table(document, TIMETABLE_INDEX)?;
    let mut blocks = Vec::new();

    for raw in decode_grid(table)? {
        match raw.split() {
            Ok(sections) => blocks.extend(sections),
            Err(error) => diagnostics.skip_block(&raw.day, &raw.begin, &error),
        }
    }

    let mut blocks = merge_blocks(blocks);
    for block in &mut blocks {
        block.name = config.course_name(&block.course).map(str::to_string);
    }

    Ok(blocks)
}

/// Expand every block into its weekly events.
pub fn class_events(
    blocks: &[ClassBlock],
    config: &SemesterConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    for block in blocks {
        for line in unmatched_annotations(&block.detail) {
            warn!(course = %block.course, %line, "week annotation not understood, assuming every week");
            diagnostics.unmatched_annotations.push(UnmatchedAnnotation {
                course: block.course.clone(),
                line,
            });
        }

        match expand(block, config) {
            Ok(expanded) => events.extend(expanded),
            Err(error) => diagnostics.skip_block(&block.day, &block.begin, &error),
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, TimeZone};

    const LEGEND: &str = "<table><tr><td>Legend</td></tr></table>";

    fn at(m: u32, d: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, m, d)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn timetable(days: &[&str], rows: &[(&str, &str)]) -> String {
        let header: String = days.iter().map(|d| format!("<td>{d}</td>")).collect();
        let body: String = rows
            .iter()
            .map(|(time, cells)| format!("<tr><td>{time}</td>{cells}</tr>"))
            .collect();
        format!("<table><tr><td></td>{header}</tr>{body}</table>")
    }

    fn exams(rows: &[(&str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(code, date)| {
                format!("<tr><td>1</td><td>{code}</td><td>T</td><td>3</td><td>{date}</td></tr>")
            })
            .collect();
        format!("<table><tr><td>Header</td></tr>{body}<tr><td>Total</td></tr></table>")
    }

    fn document(timetable: &str, exams: &str) -> String {
        format!("<html><body>{LEGEND}{timetable}{exams}</body></html>")
    }

    fn hourly_slots(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| format!("{:02}00-{:02}00", 8 + i, 9 + i))
            .collect()
    }

    #[test]
    fn round_trip_two_slot_class() {
        let html = document(
            &timetable(
                &["MON"],
                &[
                    ("0800-0900", "<td rowspan=2>CS101 LEC G1 LT1<br>wk1-2</td>"),
                    ("0900-1000", ""),
                ],
            ),
            &exams(&[]),
        );
        let schedule = Schedule::from_html(&html, &SemesterConfig::default());
        let classes = schedule.classes.as_ref().unwrap();

        assert_eq!(classes.len(), 2);
        assert_eq!((classes[0].start, classes[0].end), (at(8, 12, 8), at(8, 12, 10)));
        assert_eq!((classes[1].start, classes[1].end), (at(8, 19, 8), at(8, 19, 10)));
        for event in classes {
            assert_eq!(event.summary, "CS101 LEC G1");
            assert_eq!(event.location.as_deref(), Some("LT1"));
        }
        assert!(schedule.diagnostics.is_empty());
    }

    #[test]
    fn span_of_any_length_yields_one_block() {
        let config = SemesterConfig::default();

        for rowspan in 1..=4usize {
            let slots = hourly_slots(rowspan);
            let expected_end = format!("{:02}00", 8 + rowspan);

            // One cell spanning every slot.
            let mut rows: Vec<(&str, String)> =
                vec![(slots[0].as_str(), format!("<td rowspan={rowspan}>CS101 LAB L1 HWLAB</td>"))];
            rows.extend(slots[1..].iter().map(|s| (s.as_str(), String::new())));
            let single: Vec<(&str, &str)> = rows.iter().map(|(t, c)| (*t, c.as_str())).collect();

            // The same class written as one single-slot cell per row.
            let segmented: Vec<(&str, &str)> = slots
                .iter()
                .map(|s| (s.as_str(), "<td rowspan=1>CS101 LAB L1 HWLAB</td>"))
                .collect();

            for layout in [single, segmented] {
                let doc = Html::parse_document(&document(&timetable(&["WED"], &layout), ""));
                let mut diagnostics = Diagnostics::default();
                let blocks = class_blocks(&doc, &config, &mut diagnostics).unwrap();

                assert_eq!(blocks.len(), 1, "rowspan {rowspan}: {blocks:?}");
                assert_eq!(blocks[0].begin, "0800");
                assert_eq!(blocks[0].end, expected_end, "rowspan {rowspan}");
            }
        }
    }

    #[test]
    fn unannotated_class_fills_the_semester() {
        let html = document(
            &timetable(
                &["MON", "TUE"],
                &[("1030-1130", "<td></td><td rowspan=1>CZ3005 TUT TS1 TR+19</td>")],
            ),
            &exams(&[]),
        );
        let schedule = Schedule::from_html(&html, &SemesterConfig::default());
        let classes = schedule.classes.unwrap();

        assert_eq!(classes.len(), 13);
        assert_eq!(classes[0].start, NaiveDate::from_ymd_opt(2019, 8, 13).unwrap().and_hms_opt(10, 30, 0).unwrap());
        assert_eq!(classes[12].start.date(), NaiveDate::from_ymd_opt(2019, 11, 12).unwrap());
    }

    #[test]
    fn exams_and_classes_are_combined() {
        let html = document(
            &timetable(&["FRI"], &[("0800-0900", "<td rowspan=1>CS101 LEC G1 LT1<br>wk1</td>")]),
            &exams(&[("CS101", "15-Nov-2019 0900-1100"), ("CS102", "garbage")]),
        );
        let schedule = Schedule::from_html(&html, &SemesterConfig::default());

        let summaries: Vec<_> = schedule.events().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["CS101 LEC G1", "CS101"]);
        assert_eq!(schedule.diagnostics.skipped_exam_rows.len(), 1);
    }

    #[test]
    fn broken_timetable_does_not_block_exams() {
        let html = document(
            &timetable(&["MON"], &[("0800-0900", "<td rowspan=5>CS101 LEC G1 LT1</td>")]),
            &exams(&[("CS101", "15-Nov-2019 0900-1100")]),
        );
        let schedule = Schedule::from_html(&html, &SemesterConfig::default());

        assert!(matches!(
            schedule.classes,
            Err(TimetableError::MissingTerminalRow { .. })
        ));
        assert_eq!(schedule.exams.as_ref().unwrap().len(), 1);
        assert_eq!(schedule.events().count(), 1);
    }

    #[test]
    fn missing_exam_table_keeps_classes() {
        let html = format!(
            "{LEGEND}{}",
            timetable(&["MON"], &[("0800-0900", "<td rowspan=1>CS101 LEC G1 LT1<br>wk2</td>")])
        );
        let schedule = Schedule::from_html(&html, &SemesterConfig::default());

        assert_eq!(schedule.classes.as_ref().unwrap().len(), 1);
        assert!(matches!(schedule.exams, Err(TimetableError::MissingTable(2))));
    }

    #[test]
    fn block_level_problems_are_diagnosed() {
        let html = document(
            &timetable(
                &["MON", "Someday"],
                &[(
                    "0800-0900",
                    "<td rowspan=1>wk1<br>CS101 LEC G1 LT1</td><td rowspan=1>CS102 LEC G1 LT2</td>",
                )],
            ),
            &exams(&[]),
        );
        let schedule = Schedule::from_html(&html, &SemesterConfig::default());

        assert!(schedule.classes.as_ref().unwrap().is_empty());
        let reasons: Vec<_> = schedule
            .diagnostics
            .skipped_blocks
            .iter()
            .map(|s| s.day.as_str())
            .collect();
        assert_eq!(reasons, vec!["MON", "Someday"]);
    }

    #[test]
    fn unmatched_annotation_is_reported_and_runs_every_week() {
        let html = document(
            &timetable(&["THU"], &[("0800-0900", "<td rowspan=1>CS101 LEC G1 LT1 wk odd</td>")]),
            &exams(&[]),
        );
        let schedule = Schedule::from_html(&html, &SemesterConfig::default());

        assert_eq!(schedule.classes.as_ref().unwrap().len(), 13);
        assert_eq!(
            schedule.diagnostics.unmatched_annotations,
            vec![UnmatchedAnnotation {
                course: "CS101".to_string(),
                line: "wk odd".to_string(),
            }]
        );
    }

    #[test]
    fn course_names_come_from_config() {
        let mut config = SemesterConfig::default();
        config
            .courses
            .insert("CS101".to_string(), "Intro to Computing".to_string());
        let html = document(
            &timetable(&["MON"], &[("0800-0900", "<td rowspan=1>CS101 LEC G1 LT1<br>wk1</td>")]),
            &exams(&[]),
        );
        let schedule = Schedule::from_html(&html, &config);

        assert_eq!(
            schedule.classes.unwrap()[0].summary,
            "CS101: Intro to Computing LEC G1"
        );
    }

    #[test]
    fn rerunning_is_idempotent() {
        let html = document(
            &timetable(
                &["MON", "TUE"],
                &[
                    ("0830-0930", "<td rowspan=2>CZ3005 LEC SS1 LT2A<br>wk1-6,8</td><td></td>"),
                    ("0930-1030", "<td rowspan=1>CZ3006 TUT T2 TR+5</td>"),
                ],
            ),
            &exams(&[("CZ3005", "26-Nov-2019 1300-1500")]),
        );
        let config = SemesterConfig::default();
        let stamp = Utc.with_ymd_and_hms(2019, 8, 1, 0, 0, 0).unwrap();

        let first = Schedule::from_html(&html, &config);
        let second = Schedule::from_html(&html, &config);

        assert_eq!(
            first.events().collect::<Vec<_>>(),
            second.events().collect::<Vec<_>>()
        );
        assert_eq!(
            first.to_ics(&config, stamp).unwrap(),
            second.to_ics(&config, stamp).unwrap()
        );
    }
}
