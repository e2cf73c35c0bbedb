// src/models/mod.rs

//! Domain models for the schedule client.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod course;
mod filter;
mod schedule;

// Re-export all public types
pub use config::{ApiConfig, CacheConfig, Config, Credentials, PagingConfig};
pub use course::{CourseSelection, CourseSelectionSet};
pub use filter::{FilterConfig, SortBy, TimePreference};
pub use schedule::{Event, Schedule, SchedulePage};
