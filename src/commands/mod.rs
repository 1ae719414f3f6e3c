pub mod blocks;
pub mod config;
pub mod generate;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use ntu_ical_core::SemesterConfig;

/// Semester settings shared by commands that decode a timetable.
///
/// Flags override the values from the config file.
#[derive(Args, Debug, Default)]
pub struct SemesterArgs {
    /// Config file to use instead of ~/.config/ntu-ical/config.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First day of teaching week 1 (YYYY-MM-DD)
    #[arg(long)]
    pub semester_start: Option<NaiveDate>,

    /// First day of the recess week (YYYY-MM-DD)
    #[arg(long)]
    pub recess_week: Option<NaiveDate>,

    /// Number of teaching weeks
    #[arg(long)]
    pub weeks: Option<u32>,

    /// IANA timezone attached to event times (e.g. "Asia/Singapore")
    #[arg(long)]
    pub timezone: Option<String>,
}

impl SemesterArgs {
    /// Load the config file and apply flag overrides.
    pub fn resolve(&self) -> Result<SemesterConfig> {
        let mut config = match self.config {
            Some(ref path) => SemesterConfig::load_from_path(path)
                .with_context(|| format!("Could not load config from {}", path.display()))?,
            None => SemesterConfig::load().context("Could not load config")?,
        };

        if let Some(start) = self.semester_start {
            config.semester_start = start;
        }
        if let Some(recess) = self.recess_week {
            config.recess_week = recess;
        }
        if let Some(weeks) = self.weeks {
            config.weeks = weeks;
        }
        if let Some(ref tz) = self.timezone {
            config.timezone = Some(tz.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Read the HTML export from a file, or stdin for "-".
pub fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("Could not read HTML from stdin")?;
        return Ok(html);
    }

    std::fs::read_to_string(input).with_context(|| format!("Could not read {}", input.display()))
}
