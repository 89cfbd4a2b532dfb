//! Check-in flow state machine.
//!
//! The flow is a strictly sequential conversation: one question active
//! at a time, advanced only by discrete user actions. Transitions are
//! pure state updates; the remote submission is returned as data
//! ([`CompletedCheckIn::submission`]) for a separate effect layer (the
//! outbox) to deliver.
//!
//! ## Steps
//!
//! ```text
//! Intro -> Cigarettes -> Confidence -> Craving -> Summary
//!                ^                                   |
//!                +--------- correction --------------+
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::feedback::{FeedbackBundle, Metric};
use super::streak::{compute_streak, streak_message};
use super::{clamp_scale, CheckInState, SCALE_DEFAULT};
use crate::api::CheckInSubmission;
use crate::error::ValidationError;
use crate::events::Event;

/// Current position in the check-in conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    Intro,
    Cigarettes,
    Confidence,
    Craving,
    Summary,
}

impl FlowStep {
    /// Step index, matching the original screen's 0..=4 counter.
    pub fn index(self) -> u8 {
        match self {
            FlowStep::Intro => 0,
            FlowStep::Cigarettes => 1,
            FlowStep::Confidence => 2,
            FlowStep::Craving => 3,
            FlowStep::Summary => 4,
        }
    }
}

/// One line of the check-in conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLine {
    pub text: String,
    pub from_bot: bool,
}

impl ChatLine {
    fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from_bot: true,
        }
    }

    fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from_bot: false,
        }
    }
}

/// Transient answers collected while the flow is in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Draft {
    cigarettes: Option<u32>,
    confidence: u8,
    craving: u8,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            cigarettes: None,
            confidence: SCALE_DEFAULT,
            craving: SCALE_DEFAULT,
        }
    }
}

/// Everything produced by a completed check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedCheckIn {
    /// The newly committed state (streak already recalculated).
    pub state: CheckInState,
    /// Feedback lines for all three metrics against the old baseline.
    pub feedback: FeedbackBundle,
    /// Narrative line for the new streak value.
    pub streak_line: String,
    /// Payload for the backend. Carries the streak as it stood before
    /// this check-in was counted (the wire format the backend expects).
    pub submission: CheckInSubmission,
    pub at: DateTime<Utc>,
}

impl CompletedCheckIn {
    pub fn event(&self) -> Event {
        Event::CheckInCompleted {
            streak_before: self.submission.streak,
            streak_after: self.state.streak,
            smoke_free: self.state.cigarettes == 0,
            at: self.at,
        }
    }
}

const GREETING: &str = "Hi! Let's talk about your progress today.";
const CORRECTION_GREETING: &str = "Hi! Let's correct your check-in for today.";
const ASK_CIGARETTES: &str = "How many cigarettes did you smoke today?";
const ASK_CONFIDENCE: &str = "On a scale of 1-10, how confident do you feel about tomorrow?";
const ASK_CRAVING: &str =
    "Last question: On a scale of 1-10, how strong is your craving right now?";
const CLOSING: &str = "Thank you for sharing! Keep going, you're doing great!";

/// The check-in conversation state machine.
///
/// Owned by the session; serialized between CLI invocations. Holds the
/// committed baseline, which is only replaced when a flow completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInFlow {
    step: FlowStep,
    draft: Draft,
    transcript: Vec<ChatLine>,
    baseline: CheckInState,
}

impl CheckInFlow {
    /// Start a fresh conversation against the given committed baseline.
    pub fn new(baseline: CheckInState) -> Self {
        Self {
            step: FlowStep::Intro,
            draft: Draft::default(),
            transcript: vec![ChatLine::bot(GREETING)],
            baseline,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn transcript(&self) -> &[ChatLine] {
        &self.transcript
    }

    /// The committed state this flow compares against.
    pub fn baseline(&self) -> &CheckInState {
        &self.baseline
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Intro -> Cigarettes. No-op outside the intro step.
    pub fn begin(&mut self) -> Option<Event> {
        if self.step != FlowStep::Intro {
            return None;
        }
        self.transcript.push(ChatLine::bot(ASK_CIGARETTES));
        self.step = FlowStep::Cigarettes;
        Some(Event::CheckInStarted { at: Utc::now() })
    }

    /// Cigarettes -> Confidence. The raw answer must parse as a
    /// non-negative integer; empty or non-numeric input blocks the
    /// transition with a typed error.
    pub fn answer_cigarettes(&mut self, raw: &str) -> Result<Event, ValidationError> {
        if self.step != FlowStep::Cigarettes {
            return Err(ValidationError::OutOfTurn {
                field: "cigarettes".into(),
            });
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyAnswer {
                field: "cigarettes".into(),
            });
        }
        let count: u32 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
            field: "cigarettes".into(),
            input: trimmed.to_string(),
        })?;

        self.draft.cigarettes = Some(count);
        self.transcript.push(ChatLine::user(trimmed));
        self.transcript.push(ChatLine::bot(ASK_CONFIDENCE));
        self.step = FlowStep::Confidence;
        Ok(Event::AnswerRecorded {
            metric: Metric::Cigarettes,
            value: count,
            at: Utc::now(),
        })
    }

    /// Confidence -> Craving. Always succeeds at the confidence step;
    /// the value is clamped to 1..=10.
    pub fn answer_confidence(&mut self, value: u8) -> Option<Event> {
        if self.step != FlowStep::Confidence {
            return None;
        }
        let value = clamp_scale(value);
        self.draft.confidence = value;
        self.transcript
            .push(ChatLine::user(format!("Confidence level: {value}/10")));
        self.transcript.push(ChatLine::bot(ASK_CRAVING));
        self.step = FlowStep::Craving;
        Some(Event::AnswerRecorded {
            metric: Metric::Confidence,
            value: value as u32,
            at: Utc::now(),
        })
    }

    /// Craving -> Summary. Completes the check-in: classifies all three
    /// metrics against the baseline, recalculates the streak from the
    /// gap since the last check-in, and commits the new state.
    pub fn answer_craving(&mut self, value: u8, now: DateTime<Utc>) -> Option<CompletedCheckIn> {
        if self.step != FlowStep::Craving {
            return None;
        }
        let value = clamp_scale(value);
        self.draft.craving = value;
        self.transcript
            .push(ChatLine::user(format!("Craving level: {value}/10")));
        self.transcript.push(ChatLine::bot(CLOSING));
        self.step = FlowStep::Summary;

        let cigarettes = self.draft.cigarettes.unwrap_or(0);
        let new_streak = compute_streak(self.baseline.last_check_in, self.baseline.streak, now);

        let new_state = CheckInState {
            cigarettes,
            confidence: self.draft.confidence,
            craving: value,
            streak: new_streak,
            last_check_in: Some(now),
        };

        let feedback = FeedbackBundle::build(&new_state, &self.baseline);
        let submission = CheckInSubmission {
            cigarettes_count: cigarettes,
            confidence: self.draft.confidence,
            craving: value,
            // The wire carries the streak as it stood before this
            // check-in was counted.
            streak: self.baseline.streak,
        };

        let completed = CompletedCheckIn {
            state: new_state.clone(),
            feedback,
            streak_line: streak_message(new_streak),
            submission,
            at: now,
        };

        // The new state supersedes the baseline for the next comparison.
        self.baseline = new_state;
        Some(completed)
    }

    /// Summary -> Cigarettes. Clears the draft back to defaults and
    /// restarts collection; the committed baseline and the transcript
    /// prefix are preserved.
    pub fn correct(&mut self) -> Option<Event> {
        if self.step != FlowStep::Summary {
            return None;
        }
        self.draft = Draft::default();
        self.transcript.push(ChatLine::bot(CORRECTION_GREETING));
        self.transcript.push(ChatLine::bot(ASK_CIGARETTES));
        self.step = FlowStep::Cigarettes;
        Some(Event::CheckInCorrected { at: Utc::now() })
    }
}
