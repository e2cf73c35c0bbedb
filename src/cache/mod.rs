//! Best-effort schedule cache.
//!
//! Avoids re-requesting backend-computed schedules when the same
//! term+course combination is generated again within the TTL window. The
//! cache is strictly best-effort: a corrupt, missing, stale, or mismatched
//! entry is a silent miss, never an error, and the pipeline works
//! identically with the cache disabled.
//!
//! Course-set matching is order-independent over normalized selections.
//! `course_section` participates in equality (absent and empty both
//! normalize to `None`), so a run pinned to a section never answers for an
//! unpinned run of the same course: the backend computes different
//! schedules for the two.

pub mod local;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::{CourseSelection, Schedule};

// Re-export for convenience
pub use local::LocalCache;
pub use memory::MemoryCache;

/// Default entry time-to-live: one hour.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// One cached generate result, stored under `schedules_<term>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Term the schedules were generated for
    pub term: String,

    /// Normalized course selections the schedules answer for
    pub courses: Vec<CourseSelection>,

    /// Fingerprint of term + normalized course set, for logs and quick
    /// comparison
    pub fingerprint: String,

    /// When the entry was written
    pub timestamp: DateTime<Utc>,

    /// The backend-computed schedules, in arrival order
    pub schedules: Vec<Schedule>,
}

impl CacheEntry {
    pub fn new(
        term: &str,
        courses: &[CourseSelection],
        schedules: Vec<Schedule>,
        now: DateTime<Utc>,
    ) -> Self {
        let courses = normalize_set(courses);
        Self {
            fingerprint: fingerprint(term, &courses),
            term: term.to_string(),
            courses,
            timestamp: now,
            schedules,
        }
    }

    /// Whether the entry is still inside its TTL window at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp < ttl
    }

    /// Whether the entry answers for the given course set, ignoring order.
    pub fn matches(&self, courses: &[CourseSelection]) -> bool {
        self.courses == normalize_set(courses)
    }
}

/// Normalize and sort a course set into canonical comparison order.
fn normalize_set(courses: &[CourseSelection]) -> Vec<CourseSelection> {
    let mut normalized: Vec<CourseSelection> =
        courses.iter().map(CourseSelection::normalized).collect();
    normalized.sort_by(|a, b| {
        (&a.course_type, &a.course_code, &a.course_section)
            .cmp(&(&b.course_type, &b.course_code, &b.course_section))
    });
    normalized
}

/// Stable fingerprint over term and a normalized course set.
pub fn fingerprint(term: &str, courses: &[CourseSelection]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(term.as_bytes());
    for course in normalize_set(courses) {
        hasher.update(b"|");
        hasher.update(course.to_string().as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Trait for schedule cache backends.
#[async_trait]
pub trait ScheduleCache: Send + Sync {
    /// Return the cached schedules for this term+course set, or `None` on
    /// any kind of miss. Never errors.
    async fn load(&self, term: &str, courses: &[CourseSelection]) -> Option<Vec<Schedule>>;

    /// Store schedules for this term+course set, replacing any previous
    /// entry for the term.
    async fn save(
        &self,
        term: &str,
        courses: &[CourseSelection],
        schedules: &[Schedule],
    ) -> Result<()>;

    /// Drop the entry for a term, if present.
    async fn invalidate(&self, term: &str) -> Result<()>;
}
