//! Course-listing time shorthand parsing.
//!
//! This is the only module that understands the 12-hour shorthand used in
//! listings ("9:00AM-9:50AM", "10-11:15AM", "1:30"). All other pipeline
//! stages work in minutes since midnight.
//!
//! Default rules, kept exactly as the listings conventions demand:
//! - minutes default to 0 when omitted ("9AM" == "9:00AM")
//! - a start time with no AM/PM suffix is read as **AM**
//! - an end time with no AM/PM suffix is read as **PM** (end times are
//!   conventionally afternoon in these listings)
//! - a range with no end segment gets a default one-hour block
//!
//! The AM/PM asymmetry between start and end is deliberate; do not unify it.
//!
//! Anything unparseable yields `None` rather than an error, so a malformed
//! listing degrades to "no timed meeting" instead of failing a whole batch.

/// Which half of the day to assume when a token carries no AM/PM suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultPeriod {
    Am,
    Pm,
}

/// Minutes in a default meeting block when the end time is missing.
const DEFAULT_BLOCK_MINUTES: u32 = 60;

/// Parse a single 12-hour token into minutes since midnight.
fn parse_token(token: &str, default_period: DefaultPeriod) -> Option<u32> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    let upper = token.to_ascii_uppercase();
    let (digits, period) = if let Some(rest) = upper.strip_suffix("AM") {
        (rest.trim_end(), DefaultPeriod::Am)
    } else if let Some(rest) = upper.strip_suffix("PM") {
        (rest.trim_end(), DefaultPeriod::Pm)
    } else {
        (upper.as_str(), default_period)
    };

    let (hour_str, minute_str) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None => (digits, "0"),
    };

    let hour: u32 = hour_str.trim().parse().ok()?;
    let minute: u32 = minute_str.trim().parse().ok()?;
    if hour == 0 || hour > 12 || minute > 59 {
        return None;
    }

    // 12AM wraps to midnight, 12PM stays noon.
    let hour24 = match period {
        DefaultPeriod::Am if hour == 12 => 0,
        DefaultPeriod::Am => hour,
        DefaultPeriod::Pm if hour == 12 => 12,
        DefaultPeriod::Pm => hour + 12,
    };

    Some(hour24 * 60 + minute)
}

/// Parse a listing time range into `(start, end)` minutes since midnight.
///
/// Returns `None` when the start token itself is unparseable.
pub fn parse_time_range(times: &str) -> Option<(u32, u32)> {
    let mut segments = times.trim().splitn(2, '-');

    let start = parse_token(segments.next()?, DefaultPeriod::Am)?;
    let end = match segments.next() {
        Some(segment) => {
            parse_token(segment, DefaultPeriod::Pm).unwrap_or(start + DEFAULT_BLOCK_MINUTES)
        }
        None => start + DEFAULT_BLOCK_MINUTES,
    };

    Some((start, end))
}

/// Format minutes since midnight back into listing shorthand, for display.
pub fn format_minutes(minutes: u32) -> String {
    let hour24 = (minutes / 60) % 24;
    let minute = minutes % 60;
    let (hour12, suffix) = match hour24 {
        0 => (12, "AM"),
        1..=11 => (hour24, "AM"),
        12 => (12, "PM"),
        _ => (hour24 - 12, "PM"),
    };
    format!("{hour12}:{minute:02}{suffix}")
}
