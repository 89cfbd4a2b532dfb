//! Local outbox for check-in submissions.
//!
//! Completing a check-in never blocks on the network: the submission is
//! queued here and delivered by a drain pass with bounded attempts and
//! exponential backoff. Failures stay queued until the attempt budget
//! runs out. The queue is a JSON file under the data directory so
//! pending submissions survive between CLI invocations.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::api::{ApiClient, CheckInSubmission};
use crate::events::Event;
use crate::storage::{config::OutboxConfig, data_dir};

/// A submission waiting for delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedSubmission {
    pub id: String,
    pub user_id: String,
    pub payload: CheckInSubmission,
    pub queued_at: DateTime<Utc>,
    /// Delivery attempts made so far.
    pub attempts: u32,
    /// Earliest time the next attempt may run.
    pub next_attempt_at: DateTime<Utc>,
    pub last_error: Option<String>,
}

/// Attempt budget and backoff schedule for the drain pass.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_backoff_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff_secs: 30,
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `retries + 1`: the base for the first
    /// retry, doubling per retry, capped at 64x the base.
    pub fn backoff(&self, retries: u32) -> Duration {
        let factor = 1u64 << retries.min(6);
        Duration::seconds((self.base_backoff_secs * factor) as i64)
    }
}

impl From<&OutboxConfig> for RetryPolicy {
    fn from(cfg: &OutboxConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts,
            base_backoff_secs: cfg.base_backoff_secs,
        }
    }
}

/// File-backed queue of pending submissions.
pub struct Outbox {
    entries: Vec<QueuedSubmission>,
    path: PathBuf,
}

impl Outbox {
    /// Open the outbox at `<data dir>/outbox.json`, loading any pending
    /// entries.
    pub fn open() -> Result<Self, std::io::Error> {
        let path = data_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("outbox.json");
        Self::open_at(path)
    }

    /// Open an outbox at a specific path (for testing).
    pub fn open_at(path: PathBuf) -> Result<Self, std::io::Error> {
        let mut outbox = Self {
            entries: Vec::new(),
            path,
        };
        outbox.load()?;
        Ok(outbox)
    }

    /// Queue a submission for delivery. Returns the entry id.
    pub fn enqueue(&mut self, user_id: &str, payload: CheckInSubmission, now: DateTime<Utc>) -> String {
        let id = Uuid::new_v4().to_string();
        self.entries.push(QueuedSubmission {
            id: id.clone(),
            user_id: user_id.to_string(),
            payload,
            queued_at: now,
            attempts: 0,
            next_attempt_at: now,
            last_error: None,
        });
        id
    }

    /// Remove and return entries whose next attempt is due.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<QueuedSubmission> {
        let mut due = Vec::new();
        self.entries.retain(|entry| {
            if entry.next_attempt_at <= now {
                due.push(entry.clone());
                false
            } else {
                true
            }
        });
        due
    }

    /// Put a failed entry back with its backoff applied.
    pub fn requeue(&mut self, entry: QueuedSubmission) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[QueuedSubmission] {
        &self.entries
    }

    /// Earliest scheduled attempt among pending entries.
    pub fn next_attempt_at(&self) -> Option<DateTime<Utc>> {
        self.entries.iter().map(|e| e.next_attempt_at).min()
    }

    /// Persist the queue to disk.
    pub fn persist(&self) -> Result<(), std::io::Error> {
        let data = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    fn load(&mut self) -> Result<(), std::io::Error> {
        if !self.path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path)?;
        self.entries = serde_json::from_str(&content)?;
        Ok(())
    }
}

/// Attempt delivery of every due entry.
///
/// Successes leave the queue; failures go back with backoff until the
/// attempt budget is spent, then are dropped. Local state is never
/// rolled back on failure. The caller persists the outbox afterwards.
pub async fn drain(
    outbox: &mut Outbox,
    api: &ApiClient,
    policy: &RetryPolicy,
    now: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();
    for mut entry in outbox.take_due(now) {
        entry.attempts += 1;
        match api.submit_checkin(&entry.user_id, &entry.payload).await {
            Ok(()) => {
                events.push(Event::SubmissionDelivered {
                    id: entry.id,
                    attempts: entry.attempts,
                    at: Utc::now(),
                });
            }
            Err(err) => {
                let gave_up = entry.attempts >= policy.max_attempts;
                events.push(Event::SubmissionFailed {
                    id: entry.id.clone(),
                    attempts: entry.attempts,
                    gave_up,
                    error: err.to_string(),
                    at: Utc::now(),
                });
                if !gave_up {
                    entry.last_error = Some(err.to_string());
                    // attempts was just incremented; the wait before
                    // retry n is backoff(n - 1), so the first retry
                    // waits the base.
                    entry.next_attempt_at = now + policy.backoff(entry.attempts - 1);
                    outbox.requeue(entry);
                }
            }
        }
    }
    events
}
