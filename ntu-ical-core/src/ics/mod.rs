//! ICS generation.
//!
//! Turns decoded events into an RFC 5545 calendar document.

mod generate;

pub use generate::generate_ics;
