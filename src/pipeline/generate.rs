// src/pipeline/generate.rs

//! Schedule generation pipeline.
//!
//! Validates the request locally, consults the cache, and otherwise streams
//! conflict-free schedule batches from the backend into a pager until the
//! stream is exhausted. A batch failure mid-stream keeps everything already
//! accumulated and surfaces the error through the pager; retry is purely
//! user-initiated.

use std::time::Duration;

use crate::cache::ScheduleCache;
use crate::error::{AppError, Result};
use crate::models::{Config, CourseSelectionSet, FilterConfig};
use crate::pipeline::pager::SchedulePager;
use crate::services::SchedulerApi;

/// Run a generate request end to end, returning the populated pager.
///
/// Returns `Err` only for local validation failures; network failures are
/// recorded on the pager so partial results stay usable.
pub async fn run_generate(
    api: &SchedulerApi,
    cache: &dyn ScheduleCache,
    config: &Config,
    term: &str,
    courses: &CourseSelectionSet,
    filter: FilterConfig,
) -> Result<SchedulePager> {
    // Validation failures never reach the network.
    if term.trim().is_empty() {
        return Err(AppError::validation("Select a term before generating"));
    }
    if courses.is_empty() {
        return Err(AppError::validation(
            "Select at least one course before generating",
        ));
    }
    filter.validate()?;

    let mut pager = SchedulePager::new(config.paging.page_size);
    let generation = pager.begin();
    // Applied up front so every batch (and a failure's partial results)
    // lands under the requested configuration.
    pager.set_filter(filter);

    if config.cache.enabled {
        if let Some(schedules) = cache.load(term, courses.as_slice()).await {
            pager.ingest_batch(generation, schedules, false);
            return Ok(pager);
        }
    }

    log::info!(
        "Generating schedules for term '{term}' with {} course(s)",
        courses.len()
    );

    let delay = Duration::from_millis(config.api.request_delay_ms);
    let limit = config.paging.batch_size;
    let mut offset = 0;

    loop {
        let page = match api
            .conflict_free_schedule(courses.as_slice(), term, offset, limit)
            .await
        {
            Ok(page) => page,
            Err(error) => {
                // Keep what we have; halt automatic loading.
                let error = AppError::fetch(format!("batch at offset {offset}"), error);
                pager.fail(generation, error.to_string());
                return Ok(pager);
            }
        };

        let count = page.schedules.len();
        let has_more = page.has_more;
        pager.ingest_batch(generation, page.schedules, has_more);
        log::info!(
            "Batch at offset {offset}: {count} schedule(s), total {} (has_more: {has_more})",
            pager.total_count()
        );

        if !has_more {
            break;
        }
        if count == 0 {
            log::warn!("Backend reported more data but sent an empty batch; stopping");
            break;
        }

        offset += count;
        if delay.as_millis() > 0 {
            tokio::time::sleep(delay).await;
        }
    }

    if config.cache.enabled {
        if let Err(error) = cache
            .save(term, courses.as_slice(), pager.all_schedules())
            .await
        {
            // Cache writes are best-effort.
            log::warn!("Failed to cache schedules for term '{term}': {error}");
        }
    }

    Ok(pager)
}
