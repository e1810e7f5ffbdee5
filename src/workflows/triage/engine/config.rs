use super::aggregate::{ThresholdLadder, UrgencyLevel};
use super::assessor::RiskAssessor;
use super::findings::CompoundRule;

/// One named slot in the assessor registry.
///
/// A zero weight is permitted: the factor still runs and is reported, but
/// contributes nothing to the aggregate score.
pub struct RegisteredAssessor<I> {
    pub(crate) name: &'static str,
    pub(crate) weight: f64,
    pub(crate) assessor: Box<dyn RiskAssessor<I>>,
}

impl<I> RegisteredAssessor<I> {
    pub fn new(name: &'static str, weight: f64, assessor: impl RiskAssessor<I> + 'static) -> Self {
        Self {
            name,
            weight,
            assessor: Box::new(assessor),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// One value per urgency level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable<T> {
    pub low: T,
    pub moderate: T,
    pub high: T,
    pub critical: T,
}

impl<T> LevelTable<T> {
    pub fn get(&self, level: UrgencyLevel) -> &T {
        match level {
            UrgencyLevel::Low => &self.low,
            UrgencyLevel::Moderate => &self.moderate,
            UrgencyLevel::High => &self.high,
            UrgencyLevel::Critical => &self.critical,
        }
    }
}

/// Process-wide, read-only engine configuration for one domain: the
/// ordered assessor registry with weights, the score threshold ladder, the
/// per-level response times and guidance blocks, and the compound finding
/// rules. Changing any of it means constructing a new engine.
pub struct EngineConfig<I> {
    pub assessors: Vec<RegisteredAssessor<I>>,
    pub ladder: ThresholdLadder,
    pub response_times: LevelTable<String>,
    pub guidance: LevelTable<Vec<String>>,
    pub compound_rules: Vec<CompoundRule>,
}

impl<I> EngineConfig<I> {
    pub fn total_weight(&self) -> f64 {
        self.assessors.iter().map(|entry| entry.weight).sum()
    }

    /// Structural validation, run once at engine construction so a
    /// misconfigured domain fails before serving traffic.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.assessors.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        for entry in &self.assessors {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(ConfigError::InvalidWeight { name: entry.name });
            }
        }

        if self.total_weight() <= 0.0 {
            return Err(ConfigError::ZeroTotalWeight);
        }

        let ladder = &self.ladder;
        let monotonic = ladder.moderate.is_finite()
            && ladder.high.is_finite()
            && ladder.critical.is_finite()
            && 1.0 <= ladder.moderate
            && ladder.moderate < ladder.high
            && ladder.high < ladder.critical
            && ladder.critical <= 10.0;
        if !monotonic {
            return Err(ConfigError::NonMonotonicLadder);
        }
        if !ladder.attention.is_finite() || !(1.0..=10.0).contains(&ladder.attention) {
            return Err(ConfigError::InvalidAttentionThreshold);
        }

        for rule in &self.compound_rules {
            let all_registered = rule
                .factors
                .iter()
                .all(|name| self.assessors.iter().any(|entry| entry.name == *name));
            if rule.factors.len() < 2 || !all_registered {
                return Err(ConfigError::InvalidCompoundRule {
                    kind: rule.kind.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Structural configuration faults. Raised only at engine construction,
/// never at request time; fatal to that engine instance.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("assessor registry is empty")]
    EmptyRegistry,
    #[error("assessor '{name}' has a negative or non-finite weight")]
    InvalidWeight { name: &'static str },
    #[error("total assessor weight is zero")]
    ZeroTotalWeight,
    #[error("score thresholds must satisfy 1.0 <= moderate < high < critical <= 10.0")]
    NonMonotonicLadder,
    #[error("attention threshold must lie within [1.0, 10.0]")]
    InvalidAttentionThreshold,
    #[error("compound rule '{kind}' must reference at least two registered factors")]
    InvalidCompoundRule { kind: String },
}
