use chrono::Utc;
use clap::Subcommand;
use exhale_core::checkin::streak::{effective_streak, streak_message};

use super::open_db;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Recent check-ins, newest first
    Recent {
        /// Number of check-ins to show
        #[arg(long, default_value_t = 7)]
        limit: u32,
    },
    /// Current streak
    Streak,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db()?;
    match action {
        StatsAction::Recent { limit } => {
            let records = db.recent_checkins(limit)?;
            if records.is_empty() {
                println!("No check-ins recorded yet.");
                return Ok(());
            }
            println!("{:<12} {:>10} {:>10} {:>8} {:>7}", "date", "cigarettes", "confidence", "craving", "streak");
            for record in records {
                println!(
                    "{:<12} {:>10} {:>10} {:>8} {:>7}",
                    record.at.format("%Y-%m-%d"),
                    record.cigarettes,
                    record.confidence,
                    record.craving,
                    record.streak
                );
            }
        }
        StatsAction::Streak => {
            // A stored streak lapses if the user has been idle past
            // the 48h window.
            let streak = db
                .recent_checkins(1)?
                .first()
                .map(|record| effective_streak(record.streak, record.at, Utc::now()))
                .unwrap_or(0);
            println!("Current streak: {streak}");
            println!("{}", streak_message(streak));
        }
    }
    Ok(())
}
