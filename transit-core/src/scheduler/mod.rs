//! Refresh scheduler
//!
//! Drives a task once at startup and then on a fixed period.

pub mod executor;

pub use executor::{Scheduler, DEFAULT_PERIOD_MS};
