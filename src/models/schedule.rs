//! Schedule and event data structures.
//!
//! A schedule arrives from the backend as a mapping of composite course key
//! (`"TYPE*CODE*SECTION"`) to an ordered list of events. Schedules are
//! immutable once received; the client only derives statistics from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One meeting of a course section.
///
/// All fields are free-text as published in the course listings. Missing
/// fields deserialize to empty strings so a sparse backend record never
/// fails the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Meeting kind (e.g. "LEC", "LAB", "EXAM")
    #[serde(default)]
    pub event_type: String,

    /// Day token list (e.g. "MWF", "TTh")
    #[serde(default)]
    pub days: String,

    /// Time range in listing shorthand (e.g. "9:00AM-9:50AM")
    #[serde(default)]
    pub times: String,

    /// Room / building
    #[serde(default)]
    pub location: String,

    /// Instructor name, when published
    #[serde(default)]
    pub instructor: Option<String>,
}

/// One conflict-free schedule as computed by the backend.
///
/// BTreeMap keeps course iteration deterministic, which matters for color
/// assignment and for referential transparency of the pipeline.
pub type Schedule = BTreeMap<String, Vec<Event>>;

/// One page of the backend's schedule stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePage {
    /// Schedules in this batch, in backend arrival order
    #[serde(default)]
    pub schedules: Vec<Schedule>,

    /// Whether the backend has more batches after this one
    #[serde(default)]
    pub has_more: bool,

    /// Offset this batch starts at
    #[serde(default)]
    pub offset: usize,

    /// Batch size that was requested
    #[serde(default)]
    pub limit: usize,
}
