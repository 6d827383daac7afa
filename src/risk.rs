//! Risk tiering
//!
//! A pure step function from churn probability to a discrete tier, with
//! the display strings the verdict page renders.

use serde::{Deserialize, Serialize};

/// High at or above this probability.
pub const HIGH_THRESHOLD: f64 = 0.5;
/// Medium at or above this probability (below HIGH_THRESHOLD).
pub const MEDIUM_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Thresholds are inclusive on the upper bucket: 0.5 is High, 0.3 is
    /// Medium.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_THRESHOLD {
            RiskTier::High
        } else if probability >= MEDIUM_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            RiskTier::High => "HIGH RISK: CHURN",
            RiskTier::Medium => "MEDIUM RISK",
            RiskTier::Low => "LOW RISK: STAY",
        }
    }
}

/// Probability plus its derived tier. Ephemeral, recomputed per
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub probability: f64,
    pub tier: RiskTier,
}

impl RiskScore {
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            tier: RiskTier::from_probability(probability),
        }
    }

    /// Percentage with one decimal, matching the report format.
    pub fn percent(&self) -> String {
        format!("{:.1}%", self.probability * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_inclusive() {
        assert_eq!(RiskTier::from_probability(0.5), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.3), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.49999), RiskTier::Medium);
        assert_eq!(RiskTier::from_probability(0.29999), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::High);
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(RiskTier::High.verdict(), "HIGH RISK: CHURN");
        assert_eq!(RiskTier::Low.verdict(), "LOW RISK: STAY");
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(RiskScore::new(0.5).percent(), "50.0%");
        assert_eq!(RiskScore::new(0.268).percent(), "26.8%");
        assert_eq!(RiskScore::new(1.0).percent(), "100.0%");
    }

    #[test]
    fn test_score_carries_tier() {
        let score = RiskScore::new(0.31);
        assert_eq!(score.tier, RiskTier::Medium);
        assert_eq!(score.probability, 0.31);
    }
}
