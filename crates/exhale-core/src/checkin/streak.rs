//! Streak arithmetic over wall-clock gaps between check-ins.
//!
//! A streak counts consecutive qualifying check-in periods. A period
//! qualifies when the gap since the previous check-in lands in the
//! 24-48 hour window; a gap under 24 hours is a same-day repeat and
//! leaves the streak alone, a gap over 48 hours lapses it back to zero.

use chrono::{DateTime, Duration, Utc};

/// Gaps under this many hours are same-day repeats.
pub const SAME_DAY_HOURS: i64 = 24;

/// Gaps strictly over this many hours lapse the streak.
pub const LAPSE_HOURS: i64 = 48;

/// Compute the streak value for a check-in happening at `now`.
///
/// Pure function of time and prior state:
/// - no prior check-in -> 0
/// - gap > 48h -> 0 (lapsed)
/// - gap < 24h -> unchanged (guards same-day repeats and corrections)
/// - 24h <= gap <= 48h -> incremented (both boundaries count)
pub fn compute_streak(
    last_check_in: Option<DateTime<Utc>>,
    current_streak: u32,
    now: DateTime<Utc>,
) -> u32 {
    let Some(last) = last_check_in else {
        return 0;
    };
    let elapsed = now - last;
    if elapsed > Duration::hours(LAPSE_HOURS) {
        0
    } else if elapsed < Duration::hours(SAME_DAY_HOURS) {
        current_streak
    } else {
        current_streak + 1
    }
}

/// Streak value to display for a stored record at `now`.
///
/// A stored streak whose check-in is past the lapse window reads as
/// zero; within the window it reads as recorded.
pub fn effective_streak(recorded: u32, last_check_in: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    if now - last_check_in > Duration::hours(LAPSE_HOURS) {
        0
    } else {
        recorded
    }
}

/// Narrative line for the current streak value.
///
/// Tiers are evaluated in order, first match wins.
pub fn streak_message(streak: u32) -> String {
    match streak {
        0 => "Today is day zero. Start your smoke-free journey with this check-in.".to_string(),
        1 => "First day done! The hardest step is behind you.".to_string(),
        s if s < 7 => format!("{s} days in a row. You're building real momentum."),
        s if s < 30 => format!("{s} days strong. This is becoming who you are."),
        s => format!("{s} days and counting. Outstanding dedication."),
    }
}
