//! Error types for timetable decoding.

use thiserror::Error;

/// Errors that can occur while decoding a timetable export.
///
/// Table-level variants abort the table they occur in. Block-level variants
/// (`OrphanAnnotation`, `UnknownDay`, `InvalidTime`) only drop the offending
/// block and are reported through diagnostics.
#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Table #{0} not found in document")]
    MissingTable(usize),

    #[error("Timetable header row has no day labels")]
    MissingDays,

    #[error("Invalid rowspan '{value}' in row {row}")]
    InvalidRowspan { row: usize, value: String },

    #[error("Cell in row {row} spans {rowspan} rows but the table ends first")]
    MissingTerminalRow { row: usize, rowspan: usize },

    #[error("Cell in row {row} resolves to column {column}, but only {days} days exist")]
    ColumnOutOfRange { row: usize, column: usize, days: usize },

    #[error("Week annotation '{0}' has no class line before it")]
    OrphanAnnotation(String),

    #[error("Unknown day label '{0}'")]
    UnknownDay(String),

    #[error("Invalid time '{0}', expected HHMM")]
    InvalidTime(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for timetable operations.
pub type TimetableResult<T> = Result<T, TimetableError>;
