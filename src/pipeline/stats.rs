//! Per-schedule statistics derivation.
//!
//! Converts one schedule's raw event list into the numbers the filter and
//! sort stages operate on. Pure function of the schedule; malformed events
//! contribute nothing rather than erroring.

use std::collections::BTreeSet;

use crate::models::Schedule;
use crate::pipeline::times::parse_time_range;

/// Derived statistics for one schedule. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleStats {
    /// Distinct day tokens across all events
    pub days: BTreeSet<String>,

    /// Number of distinct days on campus (`== days.len()`)
    pub days_count: usize,

    /// Earliest event start, minutes since midnight (0 when untimed)
    pub earliest_time: u32,

    /// Latest event end, minutes since midnight (0 when untimed)
    pub latest_time: u32,

    /// `latest_time - earliest_time`, minutes
    pub time_spread: u32,

    /// Mean of strictly positive inter-event gaps, minutes.
    /// 0 when fewer than two timed events or no positive gap exists.
    pub avg_gap: f64,

    /// Total events across all courses, timed or not
    pub total_events: usize,
}

impl ScheduleStats {
    /// Midpoint of the schedule's daily span, used for time-preference
    /// bucketing.
    pub fn avg_time(&self) -> f64 {
        (self.earliest_time + self.latest_time) as f64 / 2.0
    }
}

/// Split a listing day string into day tokens.
///
/// A token is an uppercase letter plus any lowercase letters that follow
/// it: "MWF" -> M, W, F and "TTh" -> T, Th. Separators and anything else
/// end the current token.
fn day_tokens(days: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in days.chars() {
        if ch.is_ascii_uppercase() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            current.push(ch);
        } else if ch.is_ascii_lowercase() && !current.is_empty() {
            current.push(ch);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Derive statistics for one schedule.
pub fn compute_stats(schedule: &Schedule) -> ScheduleStats {
    let mut days = BTreeSet::new();
    let mut spans: Vec<(u32, u32)> = Vec::new();
    let mut total_events = 0;

    for events in schedule.values() {
        for event in events {
            total_events += 1;
            days.extend(day_tokens(&event.days));
            // A listing that wraps past midnight would put its end before
            // its start and invert earliest/latest; treat it as untimed.
            if let Some((start, end)) = parse_time_range(&event.times) {
                if end >= start {
                    spans.push((start, end));
                }
            }
        }
    }

    let (earliest_time, latest_time) = spans
        .iter()
        .fold(None, |acc: Option<(u32, u32)>, &(start, end)| match acc {
            Some((lo, hi)) => Some((lo.min(start), hi.max(end))),
            None => Some((start, end)),
        })
        .unwrap_or((0, 0));

    // Gaps between consecutive events ordered by start time. Overlapping
    // events produce zero or negative gaps, which are excluded from the
    // mean.
    spans.sort_by_key(|&(start, _)| start);
    let positive_gaps: Vec<i64> = spans
        .windows(2)
        .map(|pair| pair[1].0 as i64 - pair[0].1 as i64)
        .filter(|&gap| gap > 0)
        .collect();

    let avg_gap = if positive_gaps.is_empty() {
        0.0
    } else {
        positive_gaps.iter().sum::<i64>() as f64 / positive_gaps.len() as f64
    };

    ScheduleStats {
        days_count: days.len(),
        days,
        earliest_time,
        latest_time,
        time_spread: latest_time.saturating_sub(earliest_time),
        avg_gap,
        total_events,
    }
}
