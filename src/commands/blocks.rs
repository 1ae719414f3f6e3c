use std::path::Path;

use anyhow::Result;
use ntu_ical_core::schedule::class_blocks_from_html;
use ntu_ical_core::weeks::{allowed_weeks, parse_rules};
use ntu_ical_core::Diagnostics;
use owo_colors::OwoColorize;

use super::{read_input, SemesterArgs};
use crate::render::{format_weeks, Render};

pub fn run(input: &Path, semester: &SemesterArgs) -> Result<()> {
    let config = semester.resolve()?;
    let html = read_input(input)?;

    let mut diagnostics = Diagnostics::default();
    let blocks = class_blocks_from_html(&html, &config, &mut diagnostics)?;

    if blocks.is_empty() {
        println!("{}", "No class blocks found".dimmed());
    }

    for block in &blocks {
        let weeks = allowed_weeks(&parse_rules(&block.detail), config.weeks);
        println!("{}  {}", block.render(), format_weeks(&weeks).dimmed());
    }

    if !diagnostics.is_empty() {
        eprintln!("{}", diagnostics.render());
    }

    Ok(())
}
