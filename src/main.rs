mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::SemesterArgs;

#[derive(Parser)]
#[command(name = "ntu-ical")]
#[command(about = "Turn a timetable and exam schedule HTML export into an .ics calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an .ics calendar from a timetable export
    Generate {
        /// HTML export to read ("-" for stdin)
        input: PathBuf,

        /// Where to write the calendar (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        semester: SemesterArgs,
    },
    /// List the class blocks decoded from the timetable
    Blocks {
        /// HTML export to read ("-" for stdin)
        input: PathBuf,

        #[command(flatten)]
        semester: SemesterArgs,
    },
    /// Show the configuration file location and effective settings
    Config {
        /// Write a commented default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            semester,
        } => commands::generate::run(&input, output.as_deref(), &semester),
        Commands::Blocks { input, semester } => commands::blocks::run(&input, &semester),
        Commands::Config { init } => commands::config::run(init),
    }
}
