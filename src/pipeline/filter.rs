//! Filter & sort engine for backend-generated schedules.
//!
//! Stages run in a fixed order and each stage only narrows or reorders the
//! previous stage's output. The engine works on indices into the arrival
//! list so that `SortBy::None` preserves the order schedules streamed in,
//! and re-running with identical inputs yields identical output.

use crate::models::{FilterConfig, SortBy, TimePreference};
use crate::pipeline::stats::ScheduleStats;

/// Minutes-since-midnight boundary below which a midpoint counts as morning.
const NOON: f64 = 720.0;
/// Boundary at or above which a midpoint counts as evening (5pm).
const EVENING: f64 = 1020.0;

/// Apply filters and sort order, returning indices into `stats` (which is
/// parallel to the arrival-ordered schedule list).
pub fn apply_filters(stats: &[ScheduleStats], config: &FilterConfig) -> Vec<usize> {
    let mut kept: Vec<usize> = (0..stats.len()).collect();

    // Stage 1: time-of-day preference on the span midpoint.
    if config.time_preference != TimePreference::Any {
        kept.retain(|&i| {
            let avg = stats[i].avg_time();
            match config.time_preference {
                TimePreference::Any => true,
                TimePreference::Morning => avg < NOON,
                TimePreference::Afternoon => (NOON..EVENING).contains(&avg),
                TimePreference::Evening => avg >= EVENING,
            }
        });
    }

    // Stage 2: maximum days on campus.
    kept.retain(|&i| stats[i].days_count <= config.max_days as usize);

    // Stage 3: minimum average gap between classes.
    if config.min_gap_hours > 0.0 {
        let threshold = config.min_gap_hours * 60.0;
        kept.retain(|&i| stats[i].avg_gap >= threshold);
    }

    // Stage 4: stable sort. SortBy::None keeps arrival order.
    match config.sort_by {
        SortBy::None => {}
        SortBy::FewestDays => kept.sort_by_key(|&i| stats[i].days_count),
        SortBy::MostDays => kept.sort_by_key(|&i| std::cmp::Reverse(stats[i].days_count)),
        SortBy::Earliest => kept.sort_by_key(|&i| stats[i].earliest_time),
        SortBy::Latest => kept.sort_by_key(|&i| std::cmp::Reverse(stats[i].latest_time)),
        SortBy::Clustered => kept.sort_by_key(|&i| stats[i].time_spread),
        SortBy::Spread => kept.sort_by_key(|&i| std::cmp::Reverse(stats[i].time_spread)),
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(days_count: usize, earliest: u32, latest: u32, avg_gap: f64) -> ScheduleStats {
        ScheduleStats {
            days: Default::default(),
            days_count,
            earliest_time: earliest,
            latest_time: latest,
            time_spread: latest.saturating_sub(earliest),
            avg_gap,
            total_events: 1,
        }
    }

    #[test]
    fn test_passthrough_keeps_arrival_order() {
        let stats = vec![stat(4, 540, 900, 0.0), stat(2, 600, 700, 0.0)];
        let kept = apply_filters(&stats, &FilterConfig::default());
        assert_eq!(kept, vec![0, 1]);
    }

    #[test]
    fn test_max_days_narrows() {
        let stats = vec![stat(2, 540, 700, 0.0), stat(4, 540, 700, 0.0)];
        let config = FilterConfig {
            max_days: 3,
            ..Default::default()
        };
        assert_eq!(apply_filters(&stats, &config), vec![0]);
    }

    #[test]
    fn test_time_preference_buckets() {
        let stats = vec![
            stat(3, 480, 660, 0.0),   // midpoint 570, morning
            stat(3, 720, 960, 0.0),   // midpoint 840, afternoon
            stat(3, 1020, 1200, 0.0), // midpoint 1110, evening
        ];

        for (pref, expected) in [
            (TimePreference::Morning, vec![0]),
            (TimePreference::Afternoon, vec![1]),
            (TimePreference::Evening, vec![2]),
            (TimePreference::Any, vec![0, 1, 2]),
        ] {
            let config = FilterConfig {
                time_preference: pref,
                ..Default::default()
            };
            assert_eq!(apply_filters(&stats, &config), expected);
        }
    }

    #[test]
    fn test_afternoon_boundaries_half_open() {
        // Exactly noon is afternoon; exactly 5pm is evening.
        let stats = vec![stat(3, 720, 720, 0.0), stat(3, 1020, 1020, 0.0)];
        let config = FilterConfig {
            time_preference: TimePreference::Afternoon,
            ..Default::default()
        };
        assert_eq!(apply_filters(&stats, &config), vec![0]);
    }

    #[test]
    fn test_min_gap_threshold_in_hours() {
        let stats = vec![stat(3, 540, 900, 30.0), stat(3, 540, 900, 90.0)];
        let config = FilterConfig {
            min_gap_hours: 1.0,
            ..Default::default()
        };
        assert_eq!(apply_filters(&stats, &config), vec![1]);

        // Threshold 0 disables the stage entirely.
        let zero = FilterConfig::default();
        assert_eq!(apply_filters(&stats, &zero), vec![0, 1]);
    }

    #[test]
    fn test_fewest_days_sort() {
        let stats = vec![stat(4, 0, 0, 0.0), stat(2, 0, 0, 0.0), stat(3, 0, 0, 0.0)];
        let config = FilterConfig {
            sort_by: SortBy::FewestDays,
            ..Default::default()
        };
        assert_eq!(apply_filters(&stats, &config), vec![1, 2, 0]);
    }

    #[test]
    fn test_most_days_sort() {
        let stats = vec![stat(4, 0, 0, 0.0), stat(2, 0, 0, 0.0), stat(3, 0, 0, 0.0)];
        let config = FilterConfig {
            sort_by: SortBy::MostDays,
            ..Default::default()
        };
        assert_eq!(apply_filters(&stats, &config), vec![0, 2, 1]);
    }

    #[test]
    fn test_earliest_and_latest_sorts() {
        let stats = vec![stat(3, 600, 900, 0.0), stat(3, 540, 1020, 0.0)];

        let earliest = FilterConfig {
            sort_by: SortBy::Earliest,
            ..Default::default()
        };
        assert_eq!(apply_filters(&stats, &earliest), vec![1, 0]);

        let latest = FilterConfig {
            sort_by: SortBy::Latest,
            ..Default::default()
        };
        assert_eq!(apply_filters(&stats, &latest), vec![1, 0]);
    }

    #[test]
    fn test_clustered_and_spread_sorts() {
        let stats = vec![stat(3, 540, 1020, 0.0), stat(3, 540, 700, 0.0)];

        let clustered = FilterConfig {
            sort_by: SortBy::Clustered,
            ..Default::default()
        };
        assert_eq!(apply_filters(&stats, &clustered), vec![1, 0]);

        let spread = FilterConfig {
            sort_by: SortBy::Spread,
            ..Default::default()
        };
        assert_eq!(apply_filters(&stats, &spread), vec![0, 1]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let stats = vec![stat(3, 540, 700, 0.0), stat(3, 540, 700, 0.0)];
        let config = FilterConfig {
            sort_by: SortBy::FewestDays,
            ..Default::default()
        };
        assert_eq!(apply_filters(&stats, &config), vec![0, 1]);
    }

    #[test]
    fn test_idempotent_and_never_grows() {
        let stats = vec![
            stat(2, 540, 700, 30.0),
            stat(5, 480, 1080, 120.0),
            stat(3, 720, 960, 60.0),
        ];
        let config = FilterConfig {
            sort_by: SortBy::FewestDays,
            time_preference: TimePreference::Any,
            max_days: 4,
            min_gap_hours: 0.5,
        };

        let once = apply_filters(&stats, &config);
        assert!(once.len() <= stats.len());

        // Re-filtering the already-filtered subset keeps it unchanged.
        let narrowed: Vec<ScheduleStats> = once.iter().map(|&i| stats[i].clone()).collect();
        let twice = apply_filters(&narrowed, &config);
        assert_eq!(twice, (0..narrowed.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_by_never_changes_membership() {
        let stats = vec![
            stat(2, 540, 700, 30.0),
            stat(5, 480, 1080, 120.0),
            stat(3, 720, 960, 60.0),
        ];
        let base = FilterConfig {
            max_days: 4,
            ..Default::default()
        };

        let mut baseline = apply_filters(&stats, &base);
        baseline.sort_unstable();

        for sort_by in [
            SortBy::FewestDays,
            SortBy::MostDays,
            SortBy::Earliest,
            SortBy::Latest,
            SortBy::Clustered,
            SortBy::Spread,
        ] {
            let mut sorted = apply_filters(&stats, &FilterConfig { sort_by, ..base.clone() });
            sorted.sort_unstable();
            assert_eq!(sorted, baseline);
        }
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        assert!(apply_filters(&[], &FilterConfig::default()).is_empty());
    }
}
