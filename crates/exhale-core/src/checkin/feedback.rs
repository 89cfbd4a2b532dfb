//! Feedback classification for check-in answers.
//!
//! Each answer is compared against the previous check-in's baseline and
//! mapped to a fixed message. Cigarette counts are bucketed by
//! percentage change; confidence and craving use a simple three-way
//! comparison. Deterministic lookup, no randomness.

use serde::{Deserialize, Serialize};

/// The three metrics collected by a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Cigarettes,
    Confidence,
    Craving,
}

/// Buckets for the day-over-day cigarette count change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CigaretteTier {
    /// Zero cigarettes today.
    SmokeFree,
    /// Cut by at least half.
    MajorCut,
    /// Cut by at least a quarter.
    SolidCut,
    /// Any smaller reduction.
    SmallCut,
    /// Same count as the baseline.
    Holding,
    /// Increase under +50%.
    SmallRise,
    /// Increase of +50% or more.
    SharpRise,
}

/// Percentage change of `current` relative to `previous`.
///
/// A zero baseline yields 0.0 rather than a division by zero.
pub fn percentage_change(current: u32, previous: u32) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

/// Bucket a cigarette count change into its tier.
pub fn cigarette_tier(current: u32, previous: u32) -> CigaretteTier {
    if current == 0 {
        return CigaretteTier::SmokeFree;
    }
    let pct = percentage_change(current, previous);
    if current < previous {
        if pct <= -50.0 {
            CigaretteTier::MajorCut
        } else if pct <= -25.0 {
            CigaretteTier::SolidCut
        } else {
            CigaretteTier::SmallCut
        }
    } else if current > previous {
        if pct >= 50.0 {
            CigaretteTier::SharpRise
        } else {
            CigaretteTier::SmallRise
        }
    } else {
        CigaretteTier::Holding
    }
}

impl CigaretteTier {
    /// Fixed message for this tier. Reduction tiers carry an actionable
    /// tip; increases stay supportive rather than blaming.
    pub fn message(&self) -> &'static str {
        match self {
            CigaretteTier::SmokeFree => {
                "Incredible -- a completely smoke-free day! This is exactly what progress looks like."
            }
            CigaretteTier::MajorCut => {
                "Outstanding! You cut your smoking by more than half. Tip: write down what made today easier and repeat it tomorrow."
            }
            CigaretteTier::SolidCut => {
                "Great progress, that's a solid reduction from yesterday. Tip: keep your hands busy during your usual smoke breaks."
            }
            CigaretteTier::SmallCut => {
                "Every cigarette you skip counts. Tip: try pushing your first cigarette a little later tomorrow."
            }
            CigaretteTier::Holding => {
                "Holding steady. Stability is a base you can build on tomorrow."
            }
            CigaretteTier::SmallRise => {
                "A little more than yesterday. Watch for the triggers that crept in today."
            }
            CigaretteTier::SharpRise => {
                "A tough day doesn't erase your progress. Be kind to yourself and start fresh tomorrow."
            }
        }
    }
}

/// Direction of change for scale metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Level,
}

fn direction(current: u32, previous: u32) -> Direction {
    match current.cmp(&previous) {
        std::cmp::Ordering::Greater => Direction::Up,
        std::cmp::Ordering::Less => Direction::Down,
        std::cmp::Ordering::Equal => Direction::Level,
    }
}

/// Map an answer and its baseline to a feedback message.
pub fn classify(metric: Metric, current: u32, previous: u32) -> String {
    match metric {
        Metric::Cigarettes => cigarette_tier(current, previous).message().to_string(),
        Metric::Confidence => match direction(current, previous) {
            Direction::Up => "Your confidence is growing, and it shows. Trust that feeling.",
            Direction::Down => "Confidence dips happen. Remember why you started -- tomorrow is a new chance.",
            Direction::Level => "Your confidence is holding steady. Consistency counts.",
        }
        .to_string(),
        Metric::Craving => match direction(current, previous) {
            Direction::Down => "Your cravings are easing. Your body is adapting -- keep going.",
            Direction::Up => "Cravings are stronger today. Have a plan ready for the next wave: water, a walk, a deep breath.",
            Direction::Level => "Cravings are stable. Keep using what already works for you.",
        }
        .to_string(),
    }
}

/// The three feedback lines produced by a completed check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackBundle {
    pub cigarettes: String,
    pub confidence: String,
    pub craving: String,
}

impl FeedbackBundle {
    /// Classify all three metrics of `current` against `baseline`.
    pub fn build(
        current: &crate::checkin::CheckInState,
        baseline: &crate::checkin::CheckInState,
    ) -> Self {
        Self {
            cigarettes: classify(Metric::Cigarettes, current.cigarettes, baseline.cigarettes),
            confidence: classify(
                Metric::Confidence,
                current.confidence as u32,
                baseline.confidence as u32,
            ),
            craving: classify(Metric::Craving, current.craving as u32, baseline.craving as u32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_today_is_smoke_free_regardless_of_baseline() {
        assert_eq!(cigarette_tier(0, 5), CigaretteTier::SmokeFree);
        assert_eq!(cigarette_tier(0, 0), CigaretteTier::SmokeFree);
        assert!(classify(Metric::Cigarettes, 0, 5).contains("smoke-free"));
    }

    #[test]
    fn reduction_tiers_follow_percentage_change() {
        // 10 -> 2 is -80%, top tier.
        assert_eq!(cigarette_tier(2, 10), CigaretteTier::MajorCut);
        // 10 -> 5 is exactly -50%, still top tier.
        assert_eq!(cigarette_tier(5, 10), CigaretteTier::MajorCut);
        // 10 -> 7 is -30%.
        assert_eq!(cigarette_tier(7, 10), CigaretteTier::SolidCut);
        // 10 -> 9 is -10%.
        assert_eq!(cigarette_tier(9, 10), CigaretteTier::SmallCut);
    }

    #[test]
    fn increase_tiers_follow_percentage_change() {
        // 10 -> 15 is exactly +50%, supportive tier.
        assert_eq!(cigarette_tier(15, 10), CigaretteTier::SharpRise);
        // 10 -> 12 is +20%.
        assert_eq!(cigarette_tier(12, 10), CigaretteTier::SmallRise);
    }

    #[test]
    fn equal_counts_hold() {
        assert_eq!(cigarette_tier(6, 6), CigaretteTier::Holding);
    }

    #[test]
    fn zero_baseline_increase_is_mild() {
        // percentage_change(3, 0) is defined as 0, so this cannot land
        // in the sharp-rise bucket.
        assert_eq!(percentage_change(3, 0), 0.0);
        assert_eq!(cigarette_tier(3, 0), CigaretteTier::SmallRise);
    }

    #[test]
    fn confidence_three_way_branch() {
        assert!(classify(Metric::Confidence, 6, 5).contains("growing"));
        assert!(classify(Metric::Confidence, 4, 5).contains("dips"));
        assert!(classify(Metric::Confidence, 5, 5).contains("steady"));
    }

    #[test]
    fn craving_three_way_branch() {
        assert!(classify(Metric::Craving, 3, 7).contains("easing"));
        assert!(classify(Metric::Craving, 8, 4).contains("stronger"));
        assert!(classify(Metric::Craving, 5, 5).contains("stable"));
    }

    #[test]
    fn percentage_change_examples() {
        assert_eq!(percentage_change(2, 10), -80.0);
        assert_eq!(percentage_change(15, 10), 50.0);
        assert_eq!(percentage_change(10, 10), 0.0);
    }
}
