use anyhow::Result;
use ntu_ical_core::SemesterConfig;
use owo_colors::OwoColorize;

pub fn run(init: bool) -> Result<()> {
    let config_path = SemesterConfig::config_path()?;

    if init {
        if config_path.exists() {
            println!("{} already exists", config_path.display());
        } else {
            SemesterConfig::create_default_config(&config_path)?;
            println!("{} Created {}", "✓".green(), config_path.display());
        }
    }

    let config = SemesterConfig::load()?;

    println!("{}", "Paths".bold());
    println!("  Config:          {}", config_path.display());
    println!();
    println!("{}", "Semester".bold());
    println!("  Start:           {}", config.semester_start);
    println!("  Recess week:     {}", config.recess_week);
    println!("  Teaching weeks:  {}", config.weeks);
    println!("  PRODID:          {}", config.prod_id);
    println!(
        "  Timezone:        {}",
        config.timezone.as_deref().unwrap_or("floating (none)")
    );

    if !config.courses.is_empty() {
        println!();
        println!("{}", "Courses".bold());
        for (code, name) in &config.courses {
            println!("  {code:<16} {name}");
        }
    }

    Ok(())
}
