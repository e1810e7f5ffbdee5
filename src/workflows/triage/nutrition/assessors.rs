use super::super::engine::{
    AssessorOutcome, CategoricalScale, DemographicBands, Finding, FindingSeverity, RiskAssessor,
    SeverityTable, TierTable,
};
use super::NutritionTriageInput;

/// Maps the nutrient against the inherent-risk table.
pub(super) struct NutrientClassAssessor {
    pub table: SeverityTable,
    pub alert_threshold: f64,
}

impl RiskAssessor<NutritionTriageInput> for NutrientClassAssessor {
    fn assess(&self, input: &NutritionTriageInput) -> AssessorOutcome {
        let value = self.table.score(&input.nutrient);
        if value < self.alert_threshold {
            return AssessorOutcome::quiet(value);
        }

        AssessorOutcome::flagged(
            value,
            Finding {
                kind: "high_risk_nutrient".to_string(),
                severity: FindingSeverity::for_value(value),
                title: "High-risk nutrient deficiency".to_string(),
                description: format!(
                    "{} deficiency carries a {} baseline risk profile",
                    input.nutrient,
                    FindingSeverity::for_value(value).label()
                ),
                recommended_action: "Confirm repletion protocol for this nutrient".to_string(),
                related_factor: super::FACTOR_NUTRIENT.to_string(),
            },
        )
    }
}

/// Maps the diagnosed deficiency severity onto the categorical scale; an
/// undiagnosed case scores 0.0.
pub(super) struct DeficiencySeverityAssessor {
    pub scale: CategoricalScale,
    pub alert_threshold: f64,
}

impl RiskAssessor<NutritionTriageInput> for DeficiencySeverityAssessor {
    fn assess(&self, input: &NutritionTriageInput) -> AssessorOutcome {
        let severity = match input.diagnosed_severity {
            Some(severity) => severity,
            None => return AssessorOutcome::quiet(0.0),
        };

        let value = self.scale.score(severity);
        if value < self.alert_threshold {
            return AssessorOutcome::quiet(value);
        }

        AssessorOutcome::flagged(
            value,
            Finding {
                kind: "severe_deficiency".to_string(),
                severity: FindingSeverity::for_value(value),
                title: "Severe diagnosed deficiency".to_string(),
                description: format!(
                    "deficiency diagnosed at {} severity",
                    severity.label()
                ),
                recommended_action: "Begin or intensify repletion per protocol".to_string(),
                related_factor: super::FACTOR_DEFICIENCY.to_string(),
            },
        )
    }
}

/// Scores how far the serum level sits below the reference range; an
/// unmeasured level scores 0.0.
pub(super) struct SerumLevelAssessor {
    pub tiers: TierTable,
    pub alert_threshold: f64,
}

impl RiskAssessor<NutritionTriageInput> for SerumLevelAssessor {
    fn assess(&self, input: &NutritionTriageInput) -> AssessorOutcome {
        let ratio = match input.serum_level_ratio {
            Some(ratio) => ratio,
            None => return AssessorOutcome::quiet(0.0),
        };

        let value = self.tiers.score_falling(ratio);
        if value < self.alert_threshold {
            return AssessorOutcome::quiet(value);
        }

        AssessorOutcome::flagged(
            value,
            Finding {
                kind: "serum_level_depressed".to_string(),
                severity: FindingSeverity::for_value(value),
                title: "Serum level well below range".to_string(),
                description: format!(
                    "measured level is {:.0}% of the lower reference bound",
                    ratio * 100.0
                ),
                recommended_action: "Repeat the panel and correct the level urgently".to_string(),
                related_factor: super::FACTOR_SERUM.to_string(),
            },
        )
    }
}

/// Buckets prior severe episodes into tiers; a first presentation scores
/// 0.0.
pub(super) struct RecurrenceAssessor {
    pub tiers: TierTable,
    pub alert_threshold: f64,
}

impl RiskAssessor<NutritionTriageInput> for RecurrenceAssessor {
    fn assess(&self, input: &NutritionTriageInput) -> AssessorOutcome {
        let episodes = input.prior_severe_episodes;
        let value = self.tiers.score_rising(episodes as f64);
        if value < self.alert_threshold {
            return AssessorOutcome::quiet(value);
        }

        AssessorOutcome::flagged(
            value,
            Finding {
                kind: "recurrent_deficiency".to_string(),
                severity: FindingSeverity::for_value(value),
                title: "Recurring deficiency episodes".to_string(),
                description: format!("{episodes} prior severe episode(s) on record"),
                recommended_action: "Review long-term management rather than one-off repletion"
                    .to_string(),
                related_factor: super::FACTOR_RECURRENCE.to_string(),
            },
        )
    }
}

/// Maps the reported symptom severity onto the categorical scale; no
/// reported symptom scores 0.0.
pub(super) struct SymptomAssessor {
    pub scale: CategoricalScale,
    pub alert_threshold: f64,
}

impl RiskAssessor<NutritionTriageInput> for SymptomAssessor {
    fn assess(&self, input: &NutritionTriageInput) -> AssessorOutcome {
        let severity = match input.reported_symptom {
            Some(severity) => severity,
            None => return AssessorOutcome::quiet(0.0),
        };

        let value = self.scale.score(severity);
        if value < self.alert_threshold {
            return AssessorOutcome::quiet(value);
        }

        AssessorOutcome::flagged(
            value,
            Finding {
                kind: "symptom_escalation".to_string(),
                severity: FindingSeverity::for_value(value),
                title: "Escalating reported symptoms".to_string(),
                description: format!("subject reports {} symptoms", severity.label()),
                recommended_action: "Correlate reported symptoms with the deficiency workup"
                    .to_string(),
                related_factor: super::FACTOR_SYMPTOM.to_string(),
            },
        )
    }
}

/// Age-band risk multiplier normalized against the adult baseline; a
/// missing age degrades to the baseline band and never emits a finding.
pub(super) struct AgeRiskAssessor {
    pub bands: DemographicBands,
}

impl RiskAssessor<NutritionTriageInput> for AgeRiskAssessor {
    fn assess(&self, input: &NutritionTriageInput) -> AssessorOutcome {
        AssessorOutcome::quiet(self.bands.value(input.patient_age_years))
    }
}
