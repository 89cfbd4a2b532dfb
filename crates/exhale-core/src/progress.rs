//! Derived progress metrics for the dashboard.
//!
//! All values are typed numbers computed from the user profile; turning
//! them into display strings ("1000$", "8.2 days") is left to the
//! presentation layer.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::UserProfile;
use crate::storage::config::PricingConfig;

/// Minutes of life expectancy commonly attributed to each cigarette
/// not smoked.
pub const LIFE_MINUTES_PER_CIGARETTE: u32 = 11;

/// Minutes spent on smoking one cigarette (lighting up, smoking,
/// breaks around it).
pub const SMOKING_MINUTES_PER_CIGARETTE: u32 = 7;

/// Time elapsed since the quit date, broken down for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanTime {
    pub months: i64,
    pub days: i64,
    pub hours: i64,
}

impl CleanTime {
    /// Breakdown of `now - quit_date`. A quit date in the future
    /// yields all zeros.
    pub fn since(quit_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let elapsed = (now - quit_date).max(Duration::zero());
        let total_hours = elapsed.num_hours();
        let months = total_hours / (30 * 24);
        let days = (total_hours % (30 * 24)) / 24;
        let hours = total_hours % 24;
        Self { months, days, hours }
    }
}

/// Money not spent on cigarettes since the quit date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoneySaved {
    pub total: f64,
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
    pub yearly: f64,
}

/// Cigarettes not smoked since the quit date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CigarettesAvoided {
    pub total: u64,
    pub daily: u32,
    pub weekly: u32,
    pub monthly: u32,
    pub yearly: u32,
}

/// Life expectancy recovered, in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeRegained {
    pub days: f64,
    pub minutes_per_cigarette: u32,
}

/// Smoking time not spent, in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSaved {
    pub days: f64,
    pub hours_per_week: f64,
}

/// The full dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub clean_time: CleanTime,
    pub money: MoneySaved,
    pub cigarettes: CigarettesAvoided,
    pub life: LifeRegained,
    pub time_saved: TimeSaved,
}

impl ProgressReport {
    /// Derive all metrics from the profile. The pack price falls back
    /// to the configured default when the profile carries none.
    pub fn compute(profile: &UserProfile, pricing: &PricingConfig, now: DateTime<Utc>) -> Self {
        let per_day = profile.starting_cigarettes_per_day;
        let clean = (now - profile.quit_date).max(Duration::zero());
        let clean_days = clean.num_minutes() as f64 / (24.0 * 60.0);

        let total_avoided = (per_day as f64 * clean_days).floor() as u64;
        let pack_price = profile.packet_price.unwrap_or(pricing.pack_price);
        let price_per_cigarette = if pricing.cigarettes_per_pack == 0 {
            0.0
        } else {
            pack_price / pricing.cigarettes_per_pack as f64
        };
        let daily_cost = per_day as f64 * price_per_cigarette;

        Self {
            clean_time: CleanTime::since(profile.quit_date, now),
            money: MoneySaved {
                total: total_avoided as f64 * price_per_cigarette,
                daily: daily_cost,
                weekly: daily_cost * 7.0,
                monthly: daily_cost * 30.0,
                yearly: daily_cost * 365.0,
            },
            cigarettes: CigarettesAvoided {
                total: total_avoided,
                daily: per_day,
                weekly: per_day * 7,
                monthly: per_day * 30,
                yearly: per_day * 365,
            },
            life: LifeRegained {
                days: total_avoided as f64 * LIFE_MINUTES_PER_CIGARETTE as f64 / (24.0 * 60.0),
                minutes_per_cigarette: LIFE_MINUTES_PER_CIGARETTE,
            },
            time_saved: TimeSaved {
                days: total_avoided as f64 * SMOKING_MINUTES_PER_CIGARETTE as f64 / (24.0 * 60.0),
                hours_per_week: per_day as f64 * 7.0 * SMOKING_MINUTES_PER_CIGARETTE as f64 / 60.0,
            },
        }
    }
}
