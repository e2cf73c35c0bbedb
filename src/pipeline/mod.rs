//! The schedule result pipeline.
//!
//! - `times`: course-listing time shorthand parsing
//! - `stats`: per-schedule statistics derivation
//! - `filter`: filter & sort engine over derived statistics
//! - `colors`: deterministic course color assignment
//! - `pager`: batch accumulation, visible window, generation guarding
//! - `generate`: end-to-end orchestration of one generate request

pub mod colors;
pub mod filter;
pub mod generate;
pub mod pager;
pub mod stats;
pub mod times;

pub use colors::{ColorTable, color_for};
pub use filter::apply_filters;
pub use generate::run_generate;
pub use pager::{PagerPhase, SCROLL_THRESHOLD_PX, SchedulePager, should_trigger_load};
pub use stats::{ScheduleStats, compute_stats};
pub use times::parse_time_range;
