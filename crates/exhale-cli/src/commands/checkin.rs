//! Check-in subcommand: the daily conversation, one answer per
//! invocation.
//!
//! The flow state is serialized into the local key/value store between
//! invocations, so `start`, three `answer` calls, and an optional
//! `correct` can be separate processes.

use chrono::Utc;
use clap::Subcommand;
use exhale_core::checkin::flow::{CheckInFlow, FlowStep};
use exhale_core::outbox::drain;
use exhale_core::storage::Database;
use exhale_core::{ApiClient, CheckInState, CompletedCheckIn, Config, Event, Outbox, RetryPolicy};

use super::{block_on, open_db, require_session, KV_CHECKIN_FLOW};

#[derive(Subcommand)]
pub enum CheckinAction {
    /// Start today's check-in
    Start,
    /// Answer the current question
    Answer {
        /// The answer: a cigarette count, or a 1-10 scale value
        value: String,
    },
    /// Redo today's answers after completing the check-in
    Correct,
    /// Show the current conversation
    Status,
}

pub fn run(action: CheckinAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db()?;
    match action {
        CheckinAction::Start => start(&db),
        CheckinAction::Answer { value } => answer(&db, &value),
        CheckinAction::Correct => correct(&db),
        CheckinAction::Status => status(&db),
    }
}

fn load_flow(db: &Database) -> Result<Option<CheckInFlow>, Box<dyn std::error::Error>> {
    match db.kv_get(KV_CHECKIN_FLOW)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn save_flow(db: &Database, flow: &CheckInFlow) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_set(KV_CHECKIN_FLOW, &serde_json::to_string(flow)?)?;
    Ok(())
}

/// Print transcript lines appended since `from`.
fn print_new_lines(flow: &CheckInFlow, from: usize) {
    for line in &flow.transcript()[from..] {
        let speaker = if line.from_bot { "bot" } else { "you" };
        println!("{speaker}: {}", line.text);
    }
}

fn start(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    require_session(db)?;

    // A new conversation starts from the last committed baseline.
    let baseline = match load_flow(db)? {
        Some(previous) => previous.baseline().clone(),
        None => CheckInState::new(),
    };
    let mut flow = CheckInFlow::new(baseline);
    flow.begin();
    save_flow(db, &flow)?;
    print_new_lines(&flow, 0);
    Ok(())
}

fn answer(db: &Database, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut flow = load_flow(db)?
        .ok_or("No check-in in progress. Run 'exhale-cli checkin start' first.")?;
    let before = flow.transcript().len();

    match flow.step() {
        FlowStep::Intro => {
            return Err("No check-in in progress. Run 'exhale-cli checkin start' first.".into());
        }
        FlowStep::Cigarettes => {
            flow.answer_cigarettes(value)?;
        }
        FlowStep::Confidence => {
            let scale: u8 = value.parse()?;
            flow.answer_confidence(scale);
        }
        FlowStep::Craving => {
            let scale: u8 = value.parse()?;
            if let Some(done) = flow.answer_craving(scale, Utc::now()) {
                save_flow(db, &flow)?;
                print_new_lines(&flow, before);
                finish(db, &done)?;
                return Ok(());
            }
        }
        FlowStep::Summary => {
            return Err(
                "Today's check-in is already complete. Run 'exhale-cli checkin correct' to redo it."
                    .into(),
            );
        }
    }

    save_flow(db, &flow)?;
    print_new_lines(&flow, before);
    Ok(())
}

/// Record the completed check-in, queue the submission, and make one
/// best-effort delivery attempt.
fn finish(db: &Database, done: &CompletedCheckIn) -> Result<(), Box<dyn std::error::Error>> {
    let user_id = require_session(db)?;

    db.record_checkin(
        done.state.cigarettes,
        done.state.confidence,
        done.state.craving,
        done.state.streak,
        done.at,
    )?;

    println!();
    println!("{}", done.feedback.cigarettes);
    println!("{}", done.feedback.confidence);
    println!("{}", done.feedback.craving);
    println!("{}", done.streak_line);

    let config = Config::load_or_default();
    let mut outbox = Outbox::open()?;
    let now = Utc::now();
    outbox.enqueue(&user_id, done.submission.clone(), now);
    // On disk before any delivery attempt, so the entry survives a
    // crash or kill mid-request.
    outbox.persist()?;

    // One delivery attempt; failures stay queued for 'exhale-cli sync'.
    let api = ApiClient::new(&config.api)?;
    let policy = RetryPolicy::from(&config.outbox);
    let events = block_on(drain(&mut outbox, &api, &policy, now))?;
    outbox.persist()?;

    for event in events {
        if let Event::SubmissionFailed { .. } = event {
            println!("(submission pending, will retry on next 'exhale-cli sync now')");
        }
    }
    Ok(())
}

fn correct(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let mut flow = load_flow(db)?
        .ok_or("No check-in to correct. Run 'exhale-cli checkin start' first.")?;
    let before = flow.transcript().len();
    if flow.correct().is_none() {
        return Err("Nothing to correct: today's check-in is not complete yet.".into());
    }
    save_flow(db, &flow)?;
    print_new_lines(&flow, before);
    Ok(())
}

fn status(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    match load_flow(db)? {
        Some(flow) => {
            println!("step: {}/4", flow.step().index());
            print_new_lines(&flow, 0);
        }
        None => println!("No check-in in progress."),
    }
    Ok(())
}
