use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::RiskFactorScore;

/// Severity attached to a discrete finding, totally ordered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    Low,
    Moderate,
    High,
    Critical,
}

impl FindingSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            FindingSeverity::Low => "low",
            FindingSeverity::Moderate => "moderate",
            FindingSeverity::High => "high",
            FindingSeverity::Critical => "critical",
        }
    }

    /// Severity band for a factor value; used by assessors that grade their
    /// finding by how far past the alert threshold the value landed.
    pub fn for_value(value: f64) -> Self {
        if value >= 0.9 {
            FindingSeverity::Critical
        } else if value >= 0.7 {
            FindingSeverity::High
        } else if value >= 0.4 {
            FindingSeverity::Moderate
        } else {
            FindingSeverity::Low
        }
    }
}

/// Discrete alert emitted when one factor, or a compound of factors,
/// crosses its own threshold. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: String,
    pub severity: FindingSeverity,
    pub title: String,
    pub description: String,
    pub recommended_action: String,
    pub related_factor: String,
}

/// Finding fired only when every named factor meets the trigger value in
/// the same request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundRule {
    pub kind: String,
    pub factors: Vec<&'static str>,
    pub trigger_value: f64,
    pub severity: FindingSeverity,
    pub title: String,
    pub description: String,
    pub recommended_action: String,
}

impl CompoundRule {
    fn triggered(&self, scores: &[RiskFactorScore]) -> bool {
        self.factors.iter().all(|name| {
            scores
                .iter()
                .any(|score| score.name == *name && score.value >= self.trigger_value)
        })
    }

    fn to_finding(&self, scores: &[RiskFactorScore]) -> Finding {
        let related_factor = self
            .factors
            .iter()
            .filter_map(|name| scores.iter().find(|score| score.name == *name))
            .max_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal))
            .map(|score| score.name.clone())
            .unwrap_or_default();

        Finding {
            kind: self.kind.clone(),
            severity: self.severity,
            title: self.title.clone(),
            description: self.description.clone(),
            recommended_action: self.recommended_action.clone(),
            related_factor,
        }
    }
}

/// Gather per-assessor findings plus triggered compound findings, ordered
/// by severity descending, then by the originating factor's value
/// descending, so presentation is deterministic.
pub(crate) fn collect(
    scores: &[RiskFactorScore],
    mut findings: Vec<Finding>,
    rules: &[CompoundRule],
) -> Vec<Finding> {
    for rule in rules {
        if rule.triggered(scores) {
            findings.push(rule.to_finding(scores));
        }
    }

    let factor_value = |name: &str| {
        scores
            .iter()
            .find(|score| score.name == name)
            .map(|score| score.value)
            .unwrap_or(0.0)
    };

    findings.sort_by(|a, b| {
        b.severity.cmp(&a.severity).then_with(|| {
            factor_value(&b.related_factor)
                .partial_cmp(&factor_value(&a.related_factor))
                .unwrap_or(Ordering::Equal)
        })
    });

    findings
}
