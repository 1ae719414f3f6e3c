//! Semester configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{TimetableError, TimetableResult};

pub const DEFAULT_WEEKS: u32 = 13;
pub const MAX_WEEKS: u32 = 53;
pub const DEFAULT_PROD_ID: &str = "//duong.cz//ntu-ical//EN";

fn default_semester_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 8, 12).unwrap_or_default()
}

fn default_recess_week() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 9, 30).unwrap_or_default()
}

/// Everything that pins a week-numbered timetable to real dates.
///
/// Stored at ~/.config/ntu-ical/config.toml. Dates are written as quoted
/// `YYYY-MM-DD` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemesterConfig {
    /// Any day in teaching week 1. Usually its Monday.
    pub semester_start: NaiveDate,

    /// First day of the recess week. Occurrences landing on or after it move
    /// one week later.
    pub recess_week: NaiveDate,

    /// Number of teaching weeks.
    pub weeks: u32,

    /// PRODID written into the generated calendar.
    pub prod_id: String,

    /// IANA zone name attached to event times as TZID. Times are never converted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Course titles by course code, used in event summaries.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub courses: BTreeMap<String, String>,
}

impl Default for SemesterConfig {
    fn default() -> Self {
        SemesterConfig {
            semester_start: default_semester_start(),
            recess_week: default_recess_week(),
            weeks: DEFAULT_WEEKS,
            prod_id: DEFAULT_PROD_ID.to_string(),
            timezone: None,
            courses: BTreeMap::new(),
        }
    }
}

impl SemesterConfig {
    pub fn config_path() -> TimetableResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TimetableError::Config("Could not determine config directory".into()))?
            .join("ntu-ical");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> TimetableResult<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from_path(path: &Path) -> TimetableResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> TimetableResult<Self> {
        let config: SemesterConfig =
            toml::from_str(content).map_err(|e| TimetableError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TimetableResult<()> {
        if !(1..=MAX_WEEKS).contains(&self.weeks) {
            return Err(TimetableError::Config(format!(
                "weeks must be between 1 and {MAX_WEEKS}, got {}",
                self.weeks
            )));
        }

        if self.recess_week < self.semester_start {
            return Err(TimetableError::Config(format!(
                "recess_week {} is before semester_start {}",
                self.recess_week, self.semester_start
            )));
        }

        self.tz()?;
        Ok(())
    }

    /// Parsed timezone, if one is configured.
    pub fn tz(&self) -> TimetableResult<Option<Tz>> {
        match self.timezone {
            Some(ref name) => name
                .parse::<Tz>()
                .map(Some)
                .map_err(|_| TimetableError::Config(format!("Unknown timezone '{name}'"))),
            None => Ok(None),
        }
    }

    pub fn course_name(&self, code: &str) -> Option<&str> {
        self.courses.get(code).map(String::as_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TimetableResult<()> {
        let contents = format!(
            "\
# ntu-ical configuration

# First day of teaching week 1:
# semester_start = \"{}\"

# First day of the recess week:
# recess_week = \"{}\"

# Number of teaching weeks:
# weeks = {}

# PRODID of the generated calendar:
# prod_id = \"{}\"

# Attach a TZID to event times:
# timezone = \"Asia/Singapore\"

# Course titles shown in event summaries:
# [courses]
# CZ3005 = \"Artificial Intelligence\"
",
            default_semester_start(),
            default_recess_week(),
            DEFAULT_WEEKS,
            DEFAULT_PROD_ID
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TimetableError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TimetableError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
