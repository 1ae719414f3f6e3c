//! Class blocks and the cell text splitter.
//!
//! One timetable cell can hold several class sections, e.g. a lecture and a
//! tutorial sharing a slot. Each section starts with a positional line
//! (`course type group room [remarks...]`) and may be followed by week
//! annotation lines such as `wk2-13` or `Remark:wk1,3,5`.

use crate::error::{TimetableError, TimetableResult};
use crate::weeks::is_annotation;

/// One occupied grid cell segment, before splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub day: String,
    /// HHMM
    pub begin: String,
    /// HHMM
    pub end: String,
    pub raw: String,
}

/// One logical class section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBlock {
    pub day: String,
    pub begin: String,
    pub end: String,
    pub course: String,
    pub kind: String,
    pub group: String,
    pub room: String,
    /// Course title, when known.
    pub name: Option<String>,
    /// Remarks and week annotations, newline separated.
    pub detail: String,
    /// First line plus annotation lines; merge key for continuation segments.
    pub raw: String,
}

impl ClassBlock {
    /// Event summary, e.g. `CS101 LEC G1` or `CS101: Intro LEC G1`.
    pub fn summary(&self) -> String {
        match self.name {
            Some(ref name) if !name.is_empty() => {
                format!("{}: {} {} {}", self.course, name, self.kind, self.group)
            }
            _ => format!("{} {} {}", self.course, self.kind, self.group),
        }
    }

    /// Event description: group, location and detail lines that are present.
    pub fn description(&self) -> String {
        [
            ("Group", &self.group),
            ("Location", &self.room),
            ("Detail", &self.detail),
        ]
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl RawBlock {
    /// Split the cell text into its class sections.
    ///
    /// A cell with no visible text yields no sections.
    pub fn split(&self) -> TimetableResult<Vec<ClassBlock>> {
        let mut sections: Vec<(&str, Vec<&str>)> = Vec::new();

        for line in self.raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if is_annotation(line) {
                match sections.last_mut() {
                    Some((_, annotations)) => annotations.push(line),
                    None => return Err(TimetableError::OrphanAnnotation(line.to_string())),
                }
            } else {
                sections.push((line, Vec::new()));
            }
        }

        Ok(sections
            .into_iter()
            .map(|(main, annotations)| self.section(main, &annotations))
            .collect())
    }

    fn section(&self, main: &str, annotations: &[&str]) -> ClassBlock {
        let mut tokens = main.split_whitespace();
        let mut next = || tokens.next().unwrap_or_default().to_string();
        let (course, kind, group, room) = (next(), next(), next(), next());
        let remarks = tokens.collect::<Vec<_>>().join(" ");

        let detail = annotations
            .iter()
            .copied()
            .chain(std::iter::once(remarks.as_str()))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let raw = std::iter::once(main)
            .chain(annotations.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");

        ClassBlock {
            day: self.day.clone(),
            begin: self.begin.clone(),
            end: self.end.clone(),
            course,
            kind,
            group,
            room,
            name: None,
            detail,
            raw,
        }
    }
}
