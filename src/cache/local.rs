//! Local filesystem cache backend.
//!
//! One JSON file per term under the storage directory:
//!
//! ```text
//! {root}/
//! ├── config.toml                  # Client configuration
//! ├── schedules_fall_2025.json     # Cached generate results per term
//! └── schedules_winter_2026.json
//! ```
//!
//! Writes are atomic (temp file, then rename). Reads treat anything that
//! fails to open or parse as a miss.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::io::AsyncWriteExt;

use crate::cache::{CacheEntry, DEFAULT_TTL_SECS, ScheduleCache};
use crate::error::{AppError, Result};
use crate::models::{CourseSelection, Schedule};

/// Filesystem-backed schedule cache.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root_dir: PathBuf,
    ttl: Duration,
}

impl LocalCache {
    /// Create a cache rooted at the given directory with the default
    /// one-hour TTL.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self::with_ttl(root_dir, DEFAULT_TTL_SECS)
    }

    /// Create a cache with a custom TTL in seconds.
    pub fn with_ttl(root_dir: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            root_dir: root_dir.into(),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// File path for a term's cache entry.
    fn path(&self, term: &str) -> PathBuf {
        self.root_dir.join(format!("schedules_{}.json", sanitize(term)))
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Read an entry, returning None when missing or unparseable.
    async fn read_entry(&self, term: &str) -> Option<CacheEntry> {
        let path = self.path(term);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::debug!("Cache read failed for {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::debug!("Corrupt cache entry at {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Leading slice of a fingerprint for log lines. A stored entry may carry
/// a fingerprint of any length, so never index past its end.
fn short_fingerprint(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}

/// Lower a term label into a safe file name fragment.
fn sanitize(term: &str) -> String {
    term.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl ScheduleCache for LocalCache {
    async fn load(&self, term: &str, courses: &[CourseSelection]) -> Option<Vec<Schedule>> {
        let entry = self.read_entry(term).await?;

        if !entry.is_fresh(Utc::now(), self.ttl) {
            log::debug!("Cache entry for term '{term}' expired");
            return None;
        }
        if !entry.matches(courses) {
            log::debug!("Cache entry for term '{term}' is for a different course set");
            return None;
        }

        log::info!(
            "Cache hit for term '{term}' ({} schedules, fingerprint {})",
            entry.schedules.len(),
            short_fingerprint(&entry.fingerprint)
        );
        Some(entry.schedules)
    }

    async fn save(
        &self,
        term: &str,
        courses: &[CourseSelection],
        schedules: &[Schedule],
    ) -> Result<()> {
        let entry = CacheEntry::new(term, courses, schedules.to_vec(), Utc::now());
        let bytes = serde_json::to_vec(&entry)?;
        self.write_bytes(&self.path(term), &bytes).await?;
        log::debug!(
            "Cached {} schedules for term '{term}' (fingerprint {})",
            schedules.len(),
            short_fingerprint(&entry.fingerprint)
        );
        Ok(())
    }

    async fn invalidate(&self, term: &str) -> Result<()> {
        let path = self.path(term);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use tempfile::TempDir;

    fn courses() -> Vec<CourseSelection> {
        vec![
            CourseSelection::new("CIS", "1500"),
            CourseSelection::new("MATH", "1200"),
        ]
    }

    fn schedules() -> Vec<Schedule> {
        let mut s = Schedule::new();
        s.insert(
            "CIS*1500*01".to_string(),
            vec![Event {
                event_type: "LEC".into(),
                days: "MWF".into(),
                times: "9:00AM-9:50AM".into(),
                location: "THRN 1200".into(),
                instructor: Some("A. Turing".into()),
            }],
        );
        vec![s]
    }

    #[tokio::test]
    async fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());

        cache.save("Fall 2025", &courses(), &schedules()).await.unwrap();
        let loaded = cache.load("Fall 2025", &courses()).await;
        assert_eq!(loaded, Some(schedules()));
    }

    #[tokio::test]
    async fn test_miss_when_empty() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());
        assert!(cache.load("Fall 2025", &courses()).await.is_none());
    }

    #[tokio::test]
    async fn test_miss_on_course_set_mismatch() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());

        cache.save("Fall 2025", &courses(), &schedules()).await.unwrap();
        let subset = vec![CourseSelection::new("CIS", "1500")];
        assert!(cache.load("Fall 2025", &subset).await.is_none());
    }

    #[tokio::test]
    async fn test_hit_ignores_course_order() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());

        cache.save("Fall 2025", &courses(), &schedules()).await.unwrap();
        let mut reversed = courses();
        reversed.reverse();
        assert!(cache.load("Fall 2025", &reversed).await.is_some());
    }

    #[tokio::test]
    async fn test_miss_on_pinned_section_difference() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());

        let unpinned = vec![CourseSelection::new("CIS", "1500")];
        cache.save("Fall 2025", &unpinned, &schedules()).await.unwrap();

        let pinned = vec![CourseSelection::pinned("CIS", "1500", "02")];
        assert!(cache.load("Fall 2025", &pinned).await.is_none());
        assert!(cache.load("Fall 2025", &unpinned).await.is_some());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::with_ttl(tmp.path(), 0);

        cache.save("Fall 2025", &courses(), &schedules()).await.unwrap();
        assert!(cache.load("Fall 2025", &courses()).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());

        cache.save("Fall 2025", &courses(), &schedules()).await.unwrap();
        let path = cache.path("Fall 2025");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        assert!(cache.load("Fall 2025", &courses()).await.is_none());
    }

    #[tokio::test]
    async fn test_short_fingerprint_entry_still_loads() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());

        // Hand-written entry whose fingerprint is shorter than a log slice.
        let mut entry = CacheEntry::new("Fall 2025", &courses(), schedules(), Utc::now());
        entry.fingerprint = "abc".to_string();
        let bytes = serde_json::to_vec(&entry).unwrap();
        tokio::fs::write(cache.path("Fall 2025"), bytes).await.unwrap();

        let loaded = cache.load("Fall 2025", &courses()).await;
        assert_eq!(loaded, Some(schedules()));
    }

    #[test]
    fn test_fingerprint_log_slice_is_length_safe() {
        assert_eq!(short_fingerprint("abc"), "abc");
        assert_eq!(short_fingerprint("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_fingerprint(""), "");
    }

    #[tokio::test]
    async fn test_invalidate() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());

        cache.save("Fall 2025", &courses(), &schedules()).await.unwrap();
        cache.invalidate("Fall 2025").await.unwrap();
        assert!(cache.load("Fall 2025", &courses()).await.is_none());

        // Invalidating a missing term is fine.
        cache.invalidate("Fall 2025").await.unwrap();
    }

    #[tokio::test]
    async fn test_terms_do_not_collide() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());

        cache.save("Fall 2025", &courses(), &schedules()).await.unwrap();
        assert!(cache.load("Winter 2026", &courses()).await.is_none());
    }

    #[test]
    fn test_sanitize_term_labels() {
        assert_eq!(sanitize("Fall 2025"), "fall_2025");
        assert_eq!(sanitize("W/S-26"), "w_s_26");
    }
}
