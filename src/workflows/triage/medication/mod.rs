mod assessors;

use serde::{Deserialize, Serialize};

use super::domain::SymptomSeverity;
use super::engine::{
    CategoricalScale, CompoundRule, DemographicBand, DemographicBands, EngineConfig,
    FindingSeverity, InteractionTable, LevelTable, RegisteredAssessor, SeverityTable,
    ThresholdLadder, TierTable,
};
use assessors::{
    AgeRiskAssessor, ClassAssessor, DoseRatioAssessor, InteractionAssessor, MissedDoseAssessor,
    SupplyAssessor, SymptomAssessor,
};

pub(crate) const FACTOR_CLASS: &str = "medication_class";
pub(crate) const FACTOR_INTERACTION: &str = "drug_interaction";
pub(crate) const FACTOR_MISSED_DOSES: &str = "missed_doses";
pub(crate) const FACTOR_DOSE_TO_LIMIT: &str = "dose_to_limit";
pub(crate) const FACTOR_SUPPLY: &str = "supply_remaining";
pub(crate) const FACTOR_SYMPTOM: &str = "symptom_severity";
pub(crate) const FACTOR_AGE: &str = "age_risk";

/// The medication under review, as recorded by the prescribing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub name: String,
    pub dose_mg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_daily_dose_mg: Option<f64>,
}

/// Context fields consumed by the medication assessors, assembled by the
/// calling service from its adherence and prescription stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationTriageInput {
    pub medication: MedicationRecord,
    #[serde(default)]
    pub co_medications: Vec<String>,
    #[serde(default)]
    pub missed_doses_last_week: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_supply_remaining: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_symptom: Option<SymptomSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_age_years: Option<f64>,
}

/// Class and interaction severity tables backing the lookup assessors.
/// Replaceable wholesale by a formulary import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationTables {
    pub classes: SeverityTable,
    pub interactions: InteractionTable,
}

impl MedicationTables {
    /// Built-in tables covering the medications the monitoring program
    /// tracks most often. Production deployments import the full formulary
    /// instead.
    pub fn standard() -> Self {
        Self {
            classes: SeverityTable::from_entries(&[
                ("warfarin", 1.0),
                ("insulin", 0.9),
                ("methotrexate", 0.9),
                ("digoxin", 0.9),
                ("lithium", 0.85),
                ("amiodarone", 0.8),
                ("metformin", 0.4),
                ("lisinopril", 0.35),
                ("atorvastatin", 0.3),
                ("sertraline", 0.3),
                ("aspirin", 0.25),
                ("ibuprofen", 0.2),
                ("amoxicillin", 0.15),
            ]),
            interactions: InteractionTable::from_entries(&[
                ("warfarin", "aspirin", 0.9),
                ("warfarin", "ibuprofen", 0.85),
                ("methotrexate", "ibuprofen", 0.8),
                ("digoxin", "amiodarone", 0.85),
                ("lithium", "ibuprofen", 0.7),
                ("lisinopril", "spironolactone", 0.7),
                ("sertraline", "tramadol", 0.75),
            ]),
        }
    }
}

/// Standard medication engine configuration: the pinned weight table, the
/// tier breakpoints, the alert thresholds, and the compound rules, all in
/// one place.
pub fn standard_config() -> EngineConfig<MedicationTriageInput> {
    config_with_tables(MedicationTables::standard())
}

pub fn config_with_tables(tables: MedicationTables) -> EngineConfig<MedicationTriageInput> {
    EngineConfig {
        assessors: vec![
            RegisteredAssessor::new(
                FACTOR_CLASS,
                3.0,
                ClassAssessor {
                    table: tables.classes,
                    alert_threshold: 0.7,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_INTERACTION,
                3.5,
                InteractionAssessor {
                    table: tables.interactions,
                    alert_threshold: 0.7,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_MISSED_DOSES,
                2.5,
                MissedDoseAssessor {
                    tiers: TierTable::new(vec![(1.0, 0.2), (2.0, 0.4), (4.0, 0.7), (6.0, 1.0)]),
                    alert_threshold: 0.4,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_DOSE_TO_LIMIT,
                2.5,
                DoseRatioAssessor {
                    tiers: TierTable::new(vec![(0.5, 0.2), (0.8, 0.5), (1.0, 0.8), (1.2, 1.0)]),
                    alert_threshold: 0.8,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_SUPPLY,
                1.5,
                SupplyAssessor {
                    tiers: TierTable::new(vec![(0.0, 1.0), (2.0, 0.7), (5.0, 0.4), (7.0, 0.2)]),
                    alert_threshold: 0.7,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_SYMPTOM,
                3.0,
                SymptomAssessor {
                    scale: CategoricalScale::default(),
                    alert_threshold: 0.75,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_AGE,
                2.0,
                AgeRiskAssessor {
                    bands: standard_age_bands(),
                },
            ),
        ],
        ladder: ThresholdLadder::default(),
        response_times: super::standard_response_times(),
        guidance: medication_guidance(),
        compound_rules: vec![
            CompoundRule {
                kind: "interaction_with_nonadherence".to_string(),
                factors: vec![FACTOR_INTERACTION, FACTOR_MISSED_DOSES],
                trigger_value: 0.4,
                severity: FindingSeverity::High,
                title: "Interaction risk compounded by missed doses".to_string(),
                description: "an active drug interaction coincides with erratic adherence, making serum levels unpredictable".to_string(),
                recommended_action: "Review the combined regimen with a pharmacist before the next dose".to_string(),
            },
            CompoundRule {
                kind: "high_risk_dose_pressure".to_string(),
                factors: vec![FACTOR_CLASS, FACTOR_DOSE_TO_LIMIT],
                trigger_value: 0.7,
                severity: FindingSeverity::Critical,
                title: "High-risk medication near its dose limit".to_string(),
                description: "a narrow-therapeutic-index medication is dosed close to its daily maximum".to_string(),
                recommended_action: "Hold further dose increases pending clinician review".to_string(),
            },
        ],
    }
}

fn standard_age_bands() -> DemographicBands {
    DemographicBands::new(
        1.0,
        vec![
            DemographicBand {
                label: "pediatric",
                min: 0.0,
                multiplier: 1.2,
            },
            DemographicBand {
                label: "adult",
                min: 12.0,
                multiplier: 1.0,
            },
            DemographicBand {
                label: "older_adult",
                min: 65.0,
                multiplier: 1.3,
            },
            DemographicBand {
                label: "advanced_age",
                min: 80.0,
                multiplier: 1.5,
            },
        ],
    )
}

fn medication_guidance() -> LevelTable<Vec<String>> {
    LevelTable {
        low: vec![
            "Continue the current regimen and log adherence at the next check-in".to_string(),
        ],
        moderate: vec![
            "Review adherence barriers with the subject".to_string(),
            "Schedule a medication follow-up within the response window".to_string(),
        ],
        high: vec![
            "Contact the subject to verify medication status".to_string(),
            "Flag the regimen for pharmacist review".to_string(),
        ],
        critical: vec![
            "Escalate to the on-call clinician immediately".to_string(),
            "Hold further doses until the regimen is reviewed".to_string(),
        ],
    }
}
