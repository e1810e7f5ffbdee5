use serde::{Deserialize, Serialize};

use super::RiskFactorScore;

/// Discrete urgency classification derived from the aggregate score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl UrgencyLevel {
    pub const fn label(self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Moderate => "moderate",
            UrgencyLevel::High => "high",
            UrgencyLevel::Critical => "critical",
        }
    }
}

/// Non-overlapping score thresholds evaluated top-down, plus the score at
/// which an assessment demands immediate attention.
///
/// Must satisfy `1.0 <= moderate < high < critical <= 10.0`; validated when
/// the engine is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLadder {
    pub moderate: f64,
    pub high: f64,
    pub critical: f64,
    pub attention: f64,
}

impl Default for ThresholdLadder {
    fn default() -> Self {
        Self {
            moderate: 4.0,
            high: 6.0,
            critical: 8.0,
            attention: 6.0,
        }
    }
}

impl ThresholdLadder {
    pub fn classify(&self, score: f64) -> UrgencyLevel {
        if score >= self.critical {
            UrgencyLevel::Critical
        } else if score >= self.high {
            UrgencyLevel::High
        } else if score >= self.moderate {
            UrgencyLevel::Moderate
        } else {
            UrgencyLevel::Low
        }
    }
}

/// Weighted average of factor values projected onto the [1, 10] scale.
///
/// Assumes a positive total weight; `EngineConfig::validate` rejects any
/// registry for which that does not hold.
pub(crate) fn weighted_score(factors: &[RiskFactorScore]) -> f64 {
    let total_weight: f64 = factors.iter().map(|factor| factor.weight).sum();
    debug_assert!(total_weight > 0.0, "registry validated at construction");

    let weighted_sum: f64 = factors
        .iter()
        .map(|factor| factor.value * factor.weight)
        .sum();

    let normalized = (weighted_sum / total_weight).clamp(0.0, 1.0);
    (1.0 + normalized * 9.0).clamp(1.0, 10.0)
}
