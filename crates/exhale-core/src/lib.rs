//! # Exhale Core Library
//!
//! Core business logic for Exhale, a quit-smoking companion. All
//! operations are available through a standalone CLI binary; any GUI
//! is expected to be a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Check-in engine**: a wall-clock-based daily flow that collects
//!   three answers, classifies them against the previous check-in, and
//!   maintains the consecutive-day streak
//! - **Progress**: dashboard metrics derived from the user profile
//!   (money saved, cigarettes avoided, life regained)
//! - **Storage**: SQLite check-in history plus TOML configuration
//! - **Outbox**: file-backed delivery queue so completing a check-in
//!   never waits on the network
//!
//! ## Key Components
//!
//! - [`CheckInFlow`]: step-by-step check-in state machine
//! - [`CheckInState`]: committed baseline between check-ins
//! - [`ProgressReport`]: derived dashboard metrics
//! - [`ApiClient`]: JSON client for the backend
//! - [`Outbox`]: pending submission queue with bounded retry

pub mod api;
pub mod checkin;
pub mod error;
pub mod events;
pub mod outbox;
pub mod profile;
pub mod progress;
pub mod storage;

pub use api::{ApiClient, CheckInSubmission, RegistrationForm};
pub use checkin::flow::{ChatLine, CheckInFlow, CompletedCheckIn, FlowStep};
pub use checkin::{CheckInRecord, CheckInState};
pub use error::{ApiError, ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use outbox::{Outbox, RetryPolicy};
pub use profile::UserProfile;
pub use progress::ProgressReport;
pub use storage::{Config, Database};
