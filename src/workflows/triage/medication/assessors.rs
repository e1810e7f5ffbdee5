use super::super::engine::{
    AssessorOutcome, CategoricalScale, DemographicBands, Finding, FindingSeverity,
    InteractionTable, RiskAssessor, SeverityTable, TierTable,
};
use super::MedicationTriageInput;

/// Maps the medication name against the class severity table; a medication
/// absent from the table scores 0.0.
pub(super) struct ClassAssessor {
    pub table: SeverityTable,
    pub alert_threshold: f64,
}

impl RiskAssessor<MedicationTriageInput> for ClassAssessor {
    fn assess(&self, input: &MedicationTriageInput) -> AssessorOutcome {
        let value = self.table.score(&input.medication.name);
        if value < self.alert_threshold {
            return AssessorOutcome::quiet(value);
        }

        AssessorOutcome::flagged(
            value,
            Finding {
                kind: "high_risk_medication".to_string(),
                severity: FindingSeverity::for_value(value),
                title: "High-risk medication class".to_string(),
                description: format!(
                    "{} carries a {} baseline risk profile",
                    input.medication.name,
                    FindingSeverity::for_value(value).label()
                ),
                recommended_action: "Verify dosing and monitoring orders for this medication"
                    .to_string(),
                related_factor: super::FACTOR_CLASS.to_string(),
            },
        )
    }
}

/// Checks the medication against each co-medication in the interaction
/// table and scores the worst pair. No co-medications scores 0.0.
pub(super) struct InteractionAssessor {
    pub table: InteractionTable,
    pub alert_threshold: f64,
}

impl RiskAssessor<MedicationTriageInput> for InteractionAssessor {
    fn assess(&self, input: &MedicationTriageInput) -> AssessorOutcome {
        let mut value = 0.0_f64;
        let mut worst_partner: Option<&str> = None;

        for partner in &input.co_medications {
            let score = self.table.score(&input.medication.name, partner);
            if score > value {
                value = score;
                worst_partner = Some(partner);
            }
        }

        match worst_partner {
            Some(partner) if value >= self.alert_threshold => AssessorOutcome::flagged(
                value,
                Finding {
                    kind: "severe_interaction".to_string(),
                    severity: FindingSeverity::for_value(value),
                    title: "Severe drug interaction".to_string(),
                    description: format!(
                        "{} interacts with co-medication {}",
                        input.medication.name, partner
                    ),
                    recommended_action: "Confirm the combination with the prescriber before the next dose"
                        .to_string(),
                    related_factor: super::FACTOR_INTERACTION.to_string(),
                },
            ),
            _ => AssessorOutcome::quiet(value),
        }
    }
}

/// Buckets the missed-dose count into tiers; no recorded misses score 0.0.
pub(super) struct MissedDoseAssessor {
    pub tiers: TierTable,
    pub alert_threshold: f64,
}

impl RiskAssessor<MedicationTriageInput> for MissedDoseAssessor {
    fn assess(&self, input: &MedicationTriageInput) -> AssessorOutcome {
        let missed = input.missed_doses_last_week;
        let value = self.tiers.score_rising(missed as f64);
        if value < self.alert_threshold {
            return AssessorOutcome::quiet(value);
        }

        AssessorOutcome::flagged(
            value,
            Finding {
                kind: "missed_dose".to_string(),
                severity: FindingSeverity::for_value(value),
                title: "Missed doses accumulating".to_string(),
                description: format!("{missed} missed dose(s) recorded over the last week"),
                recommended_action: "Confirm adherence and reinforce the dosing schedule"
                    .to_string(),
                related_factor: super::FACTOR_MISSED_DOSES.to_string(),
            },
        )
    }
}

/// Scores the prescribed dose against the recorded daily limit. A missing
/// or non-positive limit scores 0.0 (no limit on record).
pub(super) struct DoseRatioAssessor {
    pub tiers: TierTable,
    pub alert_threshold: f64,
}

impl RiskAssessor<MedicationTriageInput> for DoseRatioAssessor {
    fn assess(&self, input: &MedicationTriageInput) -> AssessorOutcome {
        let ratio = match input.medication.max_daily_dose_mg {
            Some(max) if max > 0.0 => input.medication.dose_mg / max,
            _ => return AssessorOutcome::quiet(0.0),
        };

        let value = self.tiers.score_rising(ratio);
        if value < self.alert_threshold {
            return AssessorOutcome::quiet(value);
        }

        AssessorOutcome::flagged(
            value,
            Finding {
                kind: "dose_near_limit".to_string(),
                severity: FindingSeverity::for_value(value),
                title: "Dose approaching daily limit".to_string(),
                description: format!(
                    "prescribed dose is {:.0}% of the recorded daily limit",
                    ratio * 100.0
                ),
                recommended_action: "Re-validate the prescribed dose against the daily limit"
                    .to_string(),
                related_factor: super::FACTOR_DOSE_TO_LIMIT.to_string(),
            },
        )
    }
}

/// Scores how close the subject is to running out of medication; an
/// unknown supply level scores 0.0.
pub(super) struct SupplyAssessor {
    pub tiers: TierTable,
    pub alert_threshold: f64,
}

impl RiskAssessor<MedicationTriageInput> for SupplyAssessor {
    fn assess(&self, input: &MedicationTriageInput) -> AssessorOutcome {
        let days = match input.days_of_supply_remaining {
            Some(days) => days,
            None => return AssessorOutcome::quiet(0.0),
        };

        let value = self.tiers.score_falling(days as f64);
        if value < self.alert_threshold {
            return AssessorOutcome::quiet(value);
        }

        AssessorOutcome::flagged(
            value,
            Finding {
                kind: "supply_running_out".to_string(),
                severity: FindingSeverity::for_value(value),
                title: "Medication supply running out".to_string(),
                description: format!("{days} day(s) of supply remaining"),
                recommended_action: "Arrange a refill before the supply lapses".to_string(),
                related_factor: super::FACTOR_SUPPLY.to_string(),
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

impl RiskAssessor<MedicationTriageInput> for SymptomAssessor {
    fn assess(&self, input: &MedicationTriageInput) -> AssessorOutcome {
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
                recommended_action: "Triage the reported symptoms against the medication profile"
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

impl RiskAssessor<MedicationTriageInput> for AgeRiskAssessor {
    fn assess(&self, input: &MedicationTriageInput) -> AssessorOutcome {
        AssessorOutcome::quiet(self.bands.value(input.patient_age_years))
    }
}
