mod aggregate;
mod assessor;
mod config;
mod findings;
mod recommendations;

pub use aggregate::{ThresholdLadder, UrgencyLevel};
pub use assessor::{
    AssessorOutcome, CategoricalScale, DemographicBand, DemographicBands, InteractionTable,
    RiskAssessor, SeverityTable, TierTable,
};
pub use config::{ConfigError, EngineConfig, LevelTable, RegisteredAssessor};
pub use findings::{CompoundRule, Finding, FindingSeverity};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One named, weighted, bounded signal contributing to the aggregate score.
///
/// The value is clamped to [0, 1] by the assessor that produced it; the
/// weight is fixed configuration and never changes between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorScore {
    pub name: String,
    pub value: f64,
    pub weight: f64,
}

/// Immutable result of one triage evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyAssessment {
    pub score: f64,
    pub level: UrgencyLevel,
    pub requires_immediate_attention: bool,
    pub response_time: String,
    pub risk_factors: Vec<RiskFactorScore>,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

/// Stateless engine applying a configured assessor registry to one request.
///
/// Construction validates the configuration and is the only fallible step;
/// `evaluate` is pure, total, and safe to call from any number of threads
/// concurrently. The caller supplies `evaluated_at` so identical inputs
/// produce identical assessments.
pub struct UrgencyEngine<I> {
    config: EngineConfig<I>,
}

impl<I> UrgencyEngine<I> {
    pub fn new(config: EngineConfig<I>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig<I> {
        &self.config
    }

    pub fn evaluate(&self, input: &I, evaluated_at: DateTime<Utc>) -> UrgencyAssessment {
        let mut risk_factors = Vec::with_capacity(self.config.assessors.len());
        let mut raw_findings = Vec::new();

        for registered in &self.config.assessors {
            let outcome = registered.assessor.assess(input);
            risk_factors.push(RiskFactorScore {
                name: registered.name.to_string(),
                value: outcome.value,
                weight: registered.weight,
            });
            if let Some(finding) = outcome.finding {
                raw_findings.push(finding);
            }
        }

        let score = aggregate::weighted_score(&risk_factors);
        let level = self.config.ladder.classify(score);
        let requires_immediate_attention = score >= self.config.ladder.attention;

        let findings =
            findings::collect(&risk_factors, raw_findings, &self.config.compound_rules);

        let response_time = self.config.response_times.get(level).clone();
        let recommendations = recommendations::generate(
            level,
            &self.config.response_times,
            &self.config.guidance,
            &findings,
        );

        UrgencyAssessment {
            score,
            level,
            requires_immediate_attention,
            response_time,
            risk_factors,
            findings,
            recommendations,
            evaluated_at,
        }
    }
}
