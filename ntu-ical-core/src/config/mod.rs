//! Configuration types for ntu-ical.

mod semester;

pub use semester::SemesterConfig;
