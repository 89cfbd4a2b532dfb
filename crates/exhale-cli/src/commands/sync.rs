//! Sync subcommand: delivery of queued check-in submissions.

use chrono::Utc;
use clap::Subcommand;
use exhale_core::outbox::drain;
use exhale_core::{ApiClient, Config, Event, Outbox, RetryPolicy};

use super::block_on;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Attempt delivery of every due submission
    Now,
    /// Show pending submissions
    Status,
}

pub fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SyncAction::Now => {
            let config = Config::load_or_default();
            let api = ApiClient::new(&config.api)?;
            let policy = RetryPolicy::from(&config.outbox);

            let mut outbox = Outbox::open()?;
            if outbox.is_empty() {
                println!("Nothing to deliver.");
                return Ok(());
            }

            let events = block_on(drain(&mut outbox, &api, &policy, Utc::now()))?;
            outbox.persist()?;

            let mut delivered = 0;
            let mut failed = 0;
            for event in events {
                match event {
                    Event::SubmissionDelivered { .. } => delivered += 1,
                    Event::SubmissionFailed { gave_up, error, .. } => {
                        failed += 1;
                        if gave_up {
                            eprintln!("  dropped after retry budget: {error}");
                        } else {
                            eprintln!("  will retry: {error}");
                        }
                    }
                    _ => {}
                }
            }
            println!("Delivered: {delivered}, failed: {failed}, pending: {}", outbox.len());
        }
        SyncAction::Status => {
            let outbox = Outbox::open()?;
            println!("Pending submissions: {}", outbox.len());
            if let Some(next) = outbox.next_attempt_at() {
                println!("Next attempt due: {}", next.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            for entry in outbox.entries() {
                println!(
                    "  {} queued {} attempts {}{}",
                    entry.id,
                    entry.queued_at.format("%Y-%m-%d %H:%M"),
                    entry.attempts,
                    entry
                        .last_error
                        .as_deref()
                        .map(|e| format!(" last error: {e}"))
                        .unwrap_or_default()
                );
            }
        }
    }
    Ok(())
}
