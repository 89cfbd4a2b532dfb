//! Daily check-in engine.
//!
//! A check-in collects three answers -- cigarettes smoked today,
//! confidence for tomorrow (1-10) and current craving intensity (1-10) --
//! compares them against the previous check-in's baseline, and maintains
//! the consecutive-day streak.
//!
//! ## Components
//!
//! - [`CheckInState`]: the committed per-user state, superseded on each
//!   completed check-in
//! - [`streak`]: pure streak arithmetic over wall-clock gaps
//! - [`feedback`]: deterministic change-to-message classification
//! - [`flow`]: the step-by-step collection state machine

pub mod feedback;
pub mod flow;
pub mod streak;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scale answers (confidence, craving) live on 1..=10.
pub const SCALE_MIN: u8 = 1;
pub const SCALE_MAX: u8 = 10;

/// Default slider position for scale questions.
pub const SCALE_DEFAULT: u8 = 5;

/// Clamp a scale answer into 1..=10. Out-of-range input is never stored.
pub fn clamp_scale(value: u8) -> u8 {
    value.clamp(SCALE_MIN, SCALE_MAX)
}

/// Committed check-in state for one user.
///
/// A completed check-in produces a new `CheckInState` that supersedes
/// the previous one; the superseded values become the baseline for the
/// next feedback comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInState {
    /// Cigarettes smoked on the day of the check-in.
    pub cigarettes: u32,
    /// Self-reported confidence for the next day, 1..=10.
    pub confidence: u8,
    /// Self-reported craving intensity, 1..=10.
    pub craving: u8,
    /// Consecutive qualifying check-in periods.
    pub streak: u32,
    /// When the previous check-in was recorded.
    pub last_check_in: Option<DateTime<Utc>>,
}

impl Default for CheckInState {
    fn default() -> Self {
        Self {
            cigarettes: 0,
            confidence: SCALE_DEFAULT,
            craving: SCALE_DEFAULT,
            streak: 0,
            last_check_in: None,
        }
    }
}

impl CheckInState {
    /// State at first use: no prior check-in, streak 0.
    pub fn new() -> Self {
        Self::default()
    }
}

/// A row of check-in history as stored in the local database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub id: i64,
    pub cigarettes: u32,
    pub confidence: u8,
    pub craving: u8,
    pub streak: u32,
    pub at: DateTime<Utc>,
}
