pub mod auth;
pub mod checkin;
pub mod config;
pub mod progress;
pub mod stats;
pub mod sync;

use exhale_core::storage::{data_dir, Database};

/// Key under which the logged-in user id is stored.
pub(crate) const KV_SESSION_USER: &str = "session_user_id";

/// Key under which the in-progress check-in flow is stored.
pub(crate) const KV_CHECKIN_FLOW: &str = "checkin_flow";

pub(crate) fn open_db() -> Result<Database, Box<dyn std::error::Error>> {
    let path = data_dir()?.join("exhale.db");
    Ok(Database::open(path)?)
}

/// The logged-in user id, if any.
pub(crate) fn session_user(db: &Database) -> Result<Option<String>, Box<dyn std::error::Error>> {
    Ok(db.kv_get(KV_SESSION_USER)?)
}

/// The logged-in user id, or a login hint as the error.
pub(crate) fn require_session(db: &Database) -> Result<String, Box<dyn std::error::Error>> {
    session_user(db)?.ok_or_else(|| "Not logged in. Run 'exhale-cli auth login' first.".into())
}

/// Run an async API call to completion from sync command code.
pub(crate) fn block_on<F: std::future::Future>(fut: F) -> Result<F::Output, std::io::Error> {
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(fut))
}
