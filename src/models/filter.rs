//! Filter configuration for the schedule result pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Sort order applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Preserve backend arrival order
    #[default]
    None,
    /// Fewest days on campus first
    FewestDays,
    /// Most days on campus first
    MostDays,
    /// Earliest first class first
    Earliest,
    /// Latest last class first
    Latest,
    /// Smallest daily time span first
    Clustered,
    /// Largest daily time span first
    Spread,
}

/// Preferred part of day, bucketed by the midpoint of a schedule's span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePreference {
    #[default]
    Any,
    /// Midpoint before noon
    Morning,
    /// Midpoint between noon and 5pm
    Afternoon,
    /// Midpoint at or after 5pm
    Evening,
}

impl std::str::FromStr for SortBy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Self::None),
            "fewest_days" => Ok(Self::FewestDays),
            "most_days" => Ok(Self::MostDays),
            "earliest" => Ok(Self::Earliest),
            "latest" => Ok(Self::Latest),
            "clustered" => Ok(Self::Clustered),
            "spread" => Ok(Self::Spread),
            other => Err(AppError::validation(format!("Unknown sort order '{other}'"))),
        }
    }
}

impl std::str::FromStr for TimePreference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "any" => Ok(Self::Any),
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            other => Err(AppError::validation(format!(
                "Unknown time preference '{other}'"
            ))),
        }
    }
}

/// User-chosen filter and sort settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Sort order for the filtered list
    #[serde(default)]
    pub sort_by: SortBy,

    /// Time-of-day preference
    #[serde(default)]
    pub time_preference: TimePreference,

    /// Maximum days on campus (2..=5)
    #[serde(default = "defaults::max_days")]
    pub max_days: u8,

    /// Minimum average gap between classes, in hours. 0 disables the stage.
    #[serde(default)]
    pub min_gap_hours: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            sort_by: SortBy::None,
            time_preference: TimePreference::Any,
            max_days: defaults::max_days(),
            min_gap_hours: 0.0,
        }
    }
}

impl FilterConfig {
    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if !(2..=5).contains(&self.max_days) {
            return Err(AppError::validation(format!(
                "max_days must be between 2 and 5, got {}",
                self.max_days
            )));
        }
        if self.min_gap_hours < 0.0 {
            return Err(AppError::validation("min_gap_hours must not be negative"));
        }
        Ok(())
    }
}

mod defaults {
    pub fn max_days() -> u8 {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_passthrough() {
        let cfg = FilterConfig::default();
        assert_eq!(cfg.sort_by, SortBy::None);
        assert_eq!(cfg.time_preference, TimePreference::Any);
        assert_eq!(cfg.max_days, 5);
        assert_eq!(cfg.min_gap_hours, 0.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_days() {
        let mut cfg = FilterConfig::default();
        cfg.max_days = 1;
        assert!(cfg.validate().is_err());
        cfg.max_days = 6;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_gap() {
        let mut cfg = FilterConfig::default();
        cfg.min_gap_hours = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_str_matches_serde_names() {
        assert_eq!("fewest_days".parse::<SortBy>().unwrap(), SortBy::FewestDays);
        assert_eq!(
            "evening".parse::<TimePreference>().unwrap(),
            TimePreference::Evening
        );
        assert!("soonest".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_sort_by_snake_case_serde() {
        let sort: SortBy = serde_json::from_str("\"fewest_days\"").unwrap();
        assert_eq!(sort, SortBy::FewestDays);
        assert_eq!(serde_json::to_string(&SortBy::Spread).unwrap(), "\"spread\"");
    }
}
