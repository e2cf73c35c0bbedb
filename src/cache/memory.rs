//! In-memory cache backend.
//!
//! Same semantics as the filesystem backend without touching disk. Used in
//! tests and wherever persistence across runs is not wanted.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::cache::{CacheEntry, DEFAULT_TTL_SECS, ScheduleCache};
use crate::error::Result;
use crate::models::{CourseSelection, Schedule};

/// Process-local schedule cache.
#[derive(Debug)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL_SECS)
    }

    pub fn with_ttl(ttl_secs: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A poisoned lock only means a panic elsewhere; cached data is
        // still plain values, so keep serving it.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ScheduleCache for MemoryCache {
    async fn load(&self, term: &str, courses: &[CourseSelection]) -> Option<Vec<Schedule>> {
        let entries = self.lock();
        let entry = entries.get(term)?;

        if !entry.is_fresh(Utc::now(), self.ttl) || !entry.matches(courses) {
            return None;
        }
        Some(entry.schedules.clone())
    }

    async fn save(
        &self,
        term: &str,
        courses: &[CourseSelection],
        schedules: &[Schedule],
    ) -> Result<()> {
        let entry = CacheEntry::new(term, courses, schedules.to_vec(), Utc::now());
        self.lock().insert(term.to_string(), entry);
        Ok(())
    }

    async fn invalidate(&self, term: &str) -> Result<()> {
        self.lock().remove(term);
        Ok(())
    }
}
