//! Incremental pagination controller for the schedule result stream.
//!
//! Accumulates backend batches into an arrival-ordered list, keeps the
//! filtered view and the visible window over it, and guards against stale
//! responses with a generation token: every fresh fetch sequence bumps the
//! generation, and batches carrying an old token are discarded instead of
//! being appended to state they no longer belong to.

use crate::models::{FilterConfig, Schedule};
use crate::pipeline::colors::{ColorTable, assign_colors};
use crate::pipeline::filter::apply_filters;
use crate::pipeline::stats::{ScheduleStats, compute_stats};

/// Distance from the viewport bottom at which prefetching starts, so the
/// user never scrolls into a visible stall.
pub const SCROLL_THRESHOLD_PX: u32 = 1000;

/// Where the controller is in the fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerPhase {
    /// No generate request has been made
    Idle,
    /// Generate requested, first batch not yet ingested
    Fetching,
    /// At least one batch ingested and the backend reports more
    Streaming,
    /// Backend exhausted; only client-side reveals remain
    Settled,
    /// A batch failed; accumulated schedules stay usable
    Failed(String),
}

/// Snapshot of the visible window, for display and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Visible prefix length of the filtered list
    pub visible: usize,
    /// Size of the filtered list
    pub filtered: usize,
    /// Total schedules accumulated from the backend
    pub total: usize,
    /// Whether more can be shown or fetched
    pub has_more: bool,
}

/// Pagination and filtering state over the accumulated schedule stream.
#[derive(Debug, Clone)]
pub struct SchedulePager {
    page_size: usize,
    generation: u64,
    phase: PagerPhase,
    schedules: Vec<Schedule>,
    stats: Vec<ScheduleStats>,
    filter: FilterConfig,
    filtered: Vec<usize>,
    window_target: usize,
    colors: ColorTable,
}

impl SchedulePager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            generation: 0,
            phase: PagerPhase::Idle,
            schedules: Vec::new(),
            stats: Vec::new(),
            filter: FilterConfig::default(),
            filtered: Vec::new(),
            window_target: 0,
            colors: ColorTable::new(),
        }
    }

    /// Start a fresh fetch sequence, discarding all accumulated state.
    ///
    /// Returns the generation token that subsequent `ingest_batch`/`fail`
    /// calls must present; anything carrying an older token is ignored.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.phase = PagerPhase::Fetching;
        self.schedules.clear();
        self.stats.clear();
        self.filtered.clear();
        self.window_target = self.page_size;
        self.colors = ColorTable::new();
        self.generation
    }

    /// Ingest one backend batch. Returns false when the token is stale and
    /// the batch was discarded.
    pub fn ingest_batch(&mut self, generation: u64, batch: Vec<Schedule>, has_more: bool) -> bool {
        if generation != self.generation {
            log::debug!(
                "Discarding stale batch (generation {generation}, current {})",
                self.generation
            );
            return false;
        }
        if matches!(self.phase, PagerPhase::Failed(_)) {
            log::debug!("Discarding batch after failure in generation {generation}");
            return false;
        }

        self.colors = assign_colors(&batch, std::mem::take(&mut self.colors));
        for schedule in batch {
            self.stats.push(compute_stats(&schedule));
            self.schedules.push(schedule);
        }

        self.refilter();
        self.phase = if has_more {
            PagerPhase::Streaming
        } else {
            PagerPhase::Settled
        };
        true
    }

    /// Record a batch failure. Accumulated schedules stay visible; automatic
    /// loading halts until a fresh `begin`.
    pub fn fail(&mut self, generation: u64, message: impl Into<String>) {
        if generation != self.generation {
            return;
        }
        let message = message.into();
        log::warn!("Batch fetch failed: {message}");
        self.phase = PagerPhase::Failed(message);
    }

    /// Replace the filter configuration: re-derives the filtered list from
    /// the full accumulated set and resets the visible window to the first
    /// page.
    pub fn set_filter(&mut self, filter: FilterConfig) {
        self.filter = filter;
        self.window_target = self.page_size;
        self.refilter();
    }

    /// Grow the visible window by one page. The window never shrinks while
    /// the filter configuration is unchanged.
    pub fn reveal_more(&mut self) {
        if self.visible_count() < self.filtered.len() {
            self.window_target += self.page_size;
        }
    }

    fn refilter(&mut self) {
        self.filtered = apply_filters(&self.stats, &self.filter);
    }

    /// Schedules currently exposed to the view, in filtered order.
    pub fn visible(&self) -> Vec<&Schedule> {
        self.filtered
            .iter()
            .take(self.window_target)
            .map(|&i| &self.schedules[i])
            .collect()
    }

    /// Stats for the visible schedules, parallel to `visible()`.
    pub fn visible_stats(&self) -> Vec<&ScheduleStats> {
        self.filtered
            .iter()
            .take(self.window_target)
            .map(|&i| &self.stats[i])
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.window_target.min(self.filtered.len())
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn total_count(&self) -> usize {
        self.schedules.len()
    }

    /// Full accumulated schedule list, in arrival order.
    pub fn all_schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn phase(&self) -> &PagerPhase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    /// Failure message, when the last fetch sequence broke.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            PagerPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Color assigned to each course key seen so far.
    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Whether anything more can be revealed or fetched.
    pub fn has_more(&self) -> bool {
        self.visible_count() < self.filtered.len() || self.phase == PagerPhase::Streaming
    }

    /// Whether the next backend batch should be requested.
    pub fn wants_next_batch(&self) -> bool {
        self.phase == PagerPhase::Streaming
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            visible: self.visible_count(),
            filtered: self.filtered.len(),
            total: self.schedules.len(),
            has_more: self.has_more(),
        }
    }
}

/// Scroll-driven load trigger: fire only when not already loading, more
/// data remains, and the viewport is close enough to the bottom.
pub fn should_trigger_load(distance_to_bottom_px: u32, is_loading: bool, has_more: bool) -> bool {
    !is_loading && has_more && distance_to_bottom_px <= SCROLL_THRESHOLD_PX
}
