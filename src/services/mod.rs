//! Service layer for the schedule client.
//!
//! This module contains the HTTP boundary with the scheduler backend
//! (`SchedulerApi`). Everything above it works on already-deserialized
//! in-memory data.

mod api;

pub use api::SchedulerApi;
