mod assessors;

use serde::{Deserialize, Serialize};

use super::domain::SymptomSeverity;
use super::engine::{
    CategoricalScale, CompoundRule, DemographicBand, DemographicBands, EngineConfig,
    FindingSeverity, LevelTable, RegisteredAssessor, SeverityTable, ThresholdLadder, TierTable,
};
use assessors::{
    AgeRiskAssessor, DeficiencySeverityAssessor, NutrientClassAssessor, RecurrenceAssessor,
    SerumLevelAssessor, SymptomAssessor,
};

pub(crate) const FACTOR_NUTRIENT: &str = "nutrient_class";
pub(crate) const FACTOR_DEFICIENCY: &str = "deficiency_severity";
pub(crate) const FACTOR_SERUM: &str = "serum_level";
pub(crate) const FACTOR_RECURRENCE: &str = "recurrence";
pub(crate) const FACTOR_SYMPTOM: &str = "symptom_severity";
pub(crate) const FACTOR_AGE: &str = "age_risk";

/// Context fields consumed by the nutrition assessors, assembled by the
/// calling service from its diagnosis and lab stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionTriageInput {
    pub nutrient: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosed_severity: Option<SymptomSeverity>,
    /// Measured serum level divided by the lower reference bound; values
    /// below 1.0 indicate deficiency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serum_level_ratio: Option<f64>,
    #[serde(default)]
    pub prior_severe_episodes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_symptom: Option<SymptomSeverity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_age_years: Option<f64>,
}

/// Inherent risk scores per nutrient; a nutrient absent from the table
/// scores 0.0.
pub fn standard_nutrient_table() -> SeverityTable {
    SeverityTable::from_entries(&[
        ("potassium", 0.9),
        ("vitamin b12", 0.85),
        ("iron", 0.8),
        ("folate", 0.7),
        ("magnesium", 0.6),
        ("vitamin d", 0.6),
        ("calcium", 0.5),
        ("zinc", 0.4),
        ("vitamin c", 0.3),
    ])
}

/// Standard nutrition engine configuration mirroring the medication
/// instantiation: weights, breakpoints, alert thresholds, compound rules.
pub fn standard_config() -> EngineConfig<NutritionTriageInput> {
    config_with_table(standard_nutrient_table())
}

pub fn config_with_table(nutrients: SeverityTable) -> EngineConfig<NutritionTriageInput> {
    EngineConfig {
        assessors: vec![
            RegisteredAssessor::new(
                FACTOR_NUTRIENT,
                3.0,
                NutrientClassAssessor {
                    table: nutrients,
                    alert_threshold: 0.8,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_DEFICIENCY,
                3.5,
                DeficiencySeverityAssessor {
                    scale: CategoricalScale::default(),
                    alert_threshold: 0.75,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_SERUM,
                2.5,
                SerumLevelAssessor {
                    tiers: TierTable::new(vec![(0.5, 1.0), (0.7, 0.7), (0.85, 0.4), (1.0, 0.2)]),
                    alert_threshold: 0.7,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_RECURRENCE,
                2.0,
                RecurrenceAssessor {
                    tiers: TierTable::new(vec![(1.0, 0.3), (2.0, 0.6), (3.0, 0.8), (4.0, 1.0)]),
                    alert_threshold: 0.6,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_SYMPTOM,
                2.5,
                SymptomAssessor {
                    scale: CategoricalScale::default(),
                    alert_threshold: 0.75,
                },
            ),
            RegisteredAssessor::new(
                FACTOR_AGE,
                1.5,
                AgeRiskAssessor {
                    bands: standard_age_bands(),
                },
            ),
        ],
        ladder: ThresholdLadder::default(),
        response_times: super::standard_response_times(),
        guidance: nutrition_guidance(),
        compound_rules: vec![CompoundRule {
            kind: "recurrent_severe_deficiency".to_string(),
            factors: vec![FACTOR_DEFICIENCY, FACTOR_RECURRENCE],
            trigger_value: 0.6,
            severity: FindingSeverity::High,
            title: "Severe deficiency with a history of recurrence".to_string(),
            description:
                "the current deficiency is severe and the subject has relapsed before, so routine repletion is unlikely to hold".to_string(),
            recommended_action: "Investigate the underlying cause of recurrence alongside repletion"
                .to_string(),
        }],
    }
}

fn standard_age_bands() -> DemographicBands {
    DemographicBands::new(
        1.0,
        vec![
            DemographicBand {
                label: "pediatric",
                min: 0.0,
                multiplier: 1.4,
            },
            DemographicBand {
                label: "adult",
                min: 12.0,
                multiplier: 1.0,
            },
            DemographicBand {
                label: "older_adult",
                min: 65.0,
                multiplier: 1.25,
            },
            DemographicBand {
                label: "advanced_age",
                min: 80.0,
                multiplier: 1.4,
            },
        ],
    )
}

fn nutrition_guidance() -> LevelTable<Vec<String>> {
    LevelTable {
        low: vec![
            "Maintain the current dietary plan and recheck at the next scheduled lab draw"
                .to_string(),
        ],
        moderate: vec![
            "Review intake and supplementation with the subject".to_string(),
            "Order a repeat serum panel within the response window".to_string(),
        ],
        high: vec![
            "Contact the subject to start or adjust supplementation".to_string(),
            "Flag the case for dietitian review".to_string(),
        ],
        critical: vec![
            "Escalate to the on-call clinician immediately".to_string(),
            "Arrange urgent repletion and confirm lab follow-up".to_string(),
        ],
    }
}
