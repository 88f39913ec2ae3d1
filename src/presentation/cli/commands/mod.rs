pub mod analyze;
pub mod config;
pub mod import;
pub mod schedule;
pub mod show;
