use chrono::Utc;
use clap::Subcommand;
use exhale_core::{ApiClient, Config, ProgressReport};

use super::{block_on, open_db, require_session};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Show the progress dashboard
    Show,
    /// Dump the raw metrics as JSON
    Json,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db()?;
    let user_id = require_session(&db)?;

    let config = Config::load_or_default();
    let api = ApiClient::new(&config.api)?;
    let profile = block_on(api.fetch_user(&user_id))??;
    let report = ProgressReport::compute(&profile, &config.pricing, Utc::now());

    match action {
        ProgressAction::Show => {
            println!("Progress for {}", profile.username);
            println!();
            println!(
                "Clean for: {} months, {} days, {} hours",
                report.clean_time.months, report.clean_time.days, report.clean_time.hours
            );
            println!(
                "Money saved: {:.2} total ({:.2}/day, {:.2}/week, {:.2}/month, {:.2}/year)",
                report.money.total,
                report.money.daily,
                report.money.weekly,
                report.money.monthly,
                report.money.yearly
            );
            println!(
                "Cigarettes avoided: {} total ({}/day)",
                report.cigarettes.total, report.cigarettes.daily
            );
            println!(
                "Life regained: {:.1} days ({} min per cigarette)",
                report.life.days, report.life.minutes_per_cigarette
            );
            println!(
                "Time not spent smoking: {:.1} days ({:.1} h/week)",
                report.time_saved.days, report.time_saved.hours_per_week
            );
        }
        ProgressAction::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
