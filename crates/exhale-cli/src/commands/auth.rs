use chrono::{DateTime, Utc};
use clap::Subcommand;
use exhale_core::{ApiClient, Config, RegistrationForm};

use super::{block_on, open_db, session_user, KV_SESSION_USER};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create a new account
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Price of a pack of cigarettes
        #[arg(long)]
        packet_price: f64,
        /// Cigarettes smoked per day before quitting
        #[arg(long)]
        per_day: u32,
        /// Quit date (RFC 3339); defaults to now
        #[arg(long)]
        quit_date: Option<DateTime<Utc>>,
        #[arg(long)]
        motivation: Option<String>,
        #[arg(long)]
        smoking_years: Option<u32>,
    },
    /// Log in and store the session locally
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Clear the local session
    Logout,
    /// Show the current session
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let api = ApiClient::new(&config.api)?;

    match action {
        AuthAction::Register {
            name,
            email,
            password,
            packet_price,
            per_day,
            quit_date,
            motivation,
            smoking_years,
        } => {
            let form = RegistrationForm {
                name,
                email,
                password,
                packet_price,
                per_day,
                quit_date: quit_date.unwrap_or_else(Utc::now),
                motivation,
                smoking_years,
            };
            block_on(api.register(&form))??;
            println!("Account created. Run 'exhale-cli auth login' to start.");
        }
        AuthAction::Login { email, password } => {
            let user_id = block_on(api.login(&email, &password))??;
            let db = open_db()?;
            db.kv_set(KV_SESSION_USER, &user_id)?;
            println!("Logged in as {user_id}");
        }
        AuthAction::Logout => {
            let db = open_db()?;
            db.kv_delete(KV_SESSION_USER)?;
            println!("Logged out");
        }
        AuthAction::Status => {
            let db = open_db()?;
            match session_user(&db)? {
                Some(user_id) => println!("Logged in as {user_id}"),
                None => println!("Not logged in"),
            }
        }
    }
    Ok(())
}
