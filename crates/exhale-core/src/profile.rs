//! User profile as served by the backend user resource.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The backend's user resource (snake_case wire format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<NaiveDate>,
    /// Price of a pack at the time of registration, if provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_price: Option<f64>,
    /// Cigarettes per day before quitting.
    pub starting_cigarettes_per_day: u32,
    pub quit_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoking_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_resource() {
        let json = r#"{
            "user_id": "u-1",
            "username": "user4278",
            "email": "a@b.c",
            "starting_cigarettes_per_day": 7,
            "quit_date": "2026-05-21T00:00:00Z"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.starting_cigarettes_per_day, 7);
        assert!(profile.packet_price.is_none());
        assert!(profile.birth.is_none());
    }
}
