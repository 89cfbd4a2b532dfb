//! Backend API client.
//!
//! Thin JSON client over reqwest for the user/session backend:
//! registration, login, the user resource, and check-in submission.
//! The submission response body is never required -- the flow completes
//! locally and delivery is handled by the outbox.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::profile::UserProfile;
use crate::storage::config::ApiConfig;

/// Check-in record as the backend expects it on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInSubmission {
    pub cigarettes_count: u32,
    pub confidence: u8,
    pub craving: u8,
    /// Streak as it stood before the submitted check-in was counted.
    pub streak: u32,
}

/// Registration form data, matching the mobile client's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub packet_price: f64,
    pub per_day: u32,
    pub quit_date: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoking_years: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: LoginUser,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    user_id: String,
}

/// JSON client for the Exhale backend.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(cfg: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Create a new account.
    pub async fn register(&self, form: &RegistrationForm) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(format!("{}/register", self.base_url))
            .json(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }

    /// Log in and return the opaque user identifier the session stores.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let resp = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body: LoginResponse = resp.json().await?;
        Ok(body.user.user_id)
    }

    /// Fetch the user resource for the given identifier.
    pub async fn fetch_user(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        let resp = self
            .http
            .get(format!("{}/users/{user_id}", self.base_url))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.json().await?)
    }

    /// Submit a completed check-in. The response body is ignored.
    pub async fn submit_checkin(
        &self,
        user_id: &str,
        payload: &CheckInSubmission,
    ) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(format!("{}/users/{user_id}/checkins", self.base_url))
            .json(payload)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status {
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }
}
