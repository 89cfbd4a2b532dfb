use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checkin::feedback::Metric;

/// Every state change in the check-in engine produces an Event.
/// This is also the diagnostic channel for submission outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    CheckInStarted {
        at: DateTime<Utc>,
    },
    AnswerRecorded {
        metric: Metric,
        value: u32,
        at: DateTime<Utc>,
    },
    CheckInCompleted {
        streak_before: u32,
        streak_after: u32,
        smoke_free: bool,
        at: DateTime<Utc>,
    },
    /// User restarted collection from the summary step.
    CheckInCorrected {
        at: DateTime<Utc>,
    },
    SubmissionDelivered {
        id: String,
        attempts: u32,
        at: DateTime<Utc>,
    },
    /// Delivery attempt failed. The submission stays queued unless
    /// `gave_up` is set.
    SubmissionFailed {
        id: String,
        attempts: u32,
        gave_up: bool,
        error: String,
        at: DateTime<Utc>,
    },
}
