use std::collections::BTreeMap;

use super::super::domain::SymptomSeverity;
use super::findings::Finding;

/// Result of one risk factor assessment: a bounded score and, when the
/// factor crossed its own alert threshold, a discrete finding.
#[derive(Debug, Clone)]
pub struct AssessorOutcome {
    pub value: f64,
    pub finding: Option<Finding>,
}

impl AssessorOutcome {
    pub fn quiet(value: f64) -> Self {
        Self {
            value: clamp_unit(value),
            finding: None,
        }
    }

    pub fn flagged(value: f64, finding: Finding) -> Self {
        Self {
            value: clamp_unit(value),
            finding: Some(finding),
        }
    }
}

/// Pure function computing one risk factor's value from domain input.
///
/// Implementations must be total: missing optional input degrades to the
/// assessor's documented default (typically 0.0), never an error.
pub trait RiskAssessor<I>: Send + Sync {
    fn assess(&self, input: &I) -> AssessorOutcome;
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn canonical(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Static lookup from a named entity to a severity score; absent entries
/// score 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeverityTable {
    entries: BTreeMap<String, f64>,
}

impl SeverityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[(&str, f64)]) -> Self {
        let mut table = Self::new();
        for (name, score) in entries {
            table.insert(name, *score);
        }
        table
    }

    pub fn insert(&mut self, name: &str, score: f64) {
        self.entries.insert(canonical(name), clamp_unit(score));
    }

    pub fn score(&self, name: &str) -> f64 {
        self.entries.get(&canonical(name)).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Severity scores for unordered entity pairs; lookup is symmetric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionTable {
    pairs: BTreeMap<(String, String), f64>,
}

impl InteractionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[(&str, &str, f64)]) -> Self {
        let mut table = Self::new();
        for (left, right, score) in entries {
            table.insert(left, right, *score);
        }
        table
    }

    pub fn insert(&mut self, left: &str, right: &str, score: f64) {
        self.pairs.insert(pair_key(left, right), clamp_unit(score));
    }

    pub fn score(&self, left: &str, right: &str) -> f64 {
        self.pairs
            .get(&pair_key(left, right))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn pair_key(left: &str, right: &str) -> (String, String) {
    let left = canonical(left);
    let right = canonical(right);
    if left <= right {
        (left, right)
    } else {
        (right, left)
    }
}

/// Monotonic tier buckets over a numeric measure.
///
/// Each tier is `(breakpoint, score)`; tiers are kept sorted by breakpoint.
/// `score_rising` serves measures where more is worse (missed doses,
/// dose-to-limit ratio); `score_falling` serves measures where less is
/// worse (days of supply remaining, serum level ratio). A measure outside
/// every tier scores 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    tiers: Vec<(f64, f64)>,
}

impl TierTable {
    pub fn new(mut tiers: Vec<(f64, f64)>) -> Self {
        tiers.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { tiers }
    }

    /// Score of the highest tier whose breakpoint the measure has reached.
    pub fn score_rising(&self, measure: f64) -> f64 {
        let mut score = 0.0;
        for (breakpoint, tier_score) in &self.tiers {
            if measure >= *breakpoint {
                score = *tier_score;
            }
        }
        clamp_unit(score)
    }

    /// Score of the lowest tier whose breakpoint the measure has fallen to.
    pub fn score_falling(&self, measure: f64) -> f64 {
        for (breakpoint, tier_score) in &self.tiers {
            if measure <= *breakpoint {
                return clamp_unit(*tier_score);
            }
        }
        0.0
    }
}

/// Fixed scores for the four-point categorical severity scale.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalScale {
    pub mild: f64,
    pub moderate: f64,
    pub severe: f64,
    pub critical: f64,
}

impl CategoricalScale {
    pub fn score(&self, severity: SymptomSeverity) -> f64 {
        let raw = match severity {
            SymptomSeverity::Mild => self.mild,
            SymptomSeverity::Moderate => self.moderate,
            SymptomSeverity::Severe => self.severe,
            SymptomSeverity::Critical => self.critical,
        };
        clamp_unit(raw)
    }
}

impl Default for CategoricalScale {
    fn default() -> Self {
        Self {
            mild: 0.25,
            moderate: 0.5,
            severe: 0.75,
            critical: 1.0,
        }
    }
}

/// One named demographic group with its risk multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct DemographicBand {
    pub label: &'static str,
    pub min: f64,
    pub multiplier: f64,
}

/// Buckets a continuous attribute into named groups and normalizes the
/// group multiplier into [0, 1] against the baseline.
///
/// A subject in a baseline band contributes 0.0; a missing attribute
/// degrades to the baseline band.
#[derive(Debug, Clone, PartialEq)]
pub struct DemographicBands {
    baseline: f64,
    bands: Vec<DemographicBand>,
}

impl DemographicBands {
    pub fn new(baseline: f64, mut bands: Vec<DemographicBand>) -> Self {
        bands.sort_by(|a, b| a.min.partial_cmp(&b.min).unwrap_or(std::cmp::Ordering::Equal));
        Self { baseline, bands }
    }

    pub fn band_for(&self, attribute: f64) -> Option<&DemographicBand> {
        self.bands
            .iter()
            .rev()
            .find(|band| attribute >= band.min)
    }

    pub fn value(&self, attribute: Option<f64>) -> f64 {
        let multiplier = attribute
            .and_then(|attribute| self.band_for(attribute))
            .map(|band| band.multiplier)
            .unwrap_or(self.baseline);

        let max = self
            .bands
            .iter()
            .map(|band| band.multiplier)
            .fold(self.baseline, f64::max);

        if max <= self.baseline {
            return 0.0;
        }

        clamp_unit((multiplier - self.baseline) / (max - self.baseline))
    }
}
