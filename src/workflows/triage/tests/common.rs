use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::triage::domain::{SubjectContext, SubjectId, SymptomSeverity};
use crate::workflows::triage::engine::{
    AssessorOutcome, EngineConfig, LevelTable, RegisteredAssessor, RiskAssessor, ThresholdLadder,
    UrgencyEngine,
};
use crate::workflows::triage::medication::{self, MedicationRecord, MedicationTriageInput};
use crate::workflows::triage::notification::{
    NotificationError, NotificationPayload, NotificationPublisher,
};
use crate::workflows::triage::nutrition::{self, NutritionTriageInput};
use crate::workflows::triage::service::{
    MedicationTriageRequest, NutritionTriageRequest, TriageService,
};
use crate::workflows::triage::triage_router;

pub(super) fn evaluated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 4, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn subject() -> SubjectContext {
    SubjectContext {
        subject_id: SubjectId("subj-0042".to_string()),
        display_name: "Jordan Avery".to_string(),
        care_team: Some("Remote Monitoring Blue".to_string()),
    }
}

pub(super) fn medication_engine() -> UrgencyEngine<MedicationTriageInput> {
    UrgencyEngine::new(medication::standard_config()).expect("standard medication config is valid")
}

pub(super) fn nutrition_engine() -> UrgencyEngine<NutritionTriageInput> {
    UrgencyEngine::new(nutrition::standard_config()).expect("standard nutrition config is valid")
}

/// Input outside every table: all assessors return their 0.0 defaults.
pub(super) fn quiet_medication_input() -> MedicationTriageInput {
    MedicationTriageInput {
        medication: MedicationRecord {
            name: "cetirizine".to_string(),
            dose_mg: 10.0,
            max_daily_dose_mg: None,
        },
        co_medications: Vec::new(),
        missed_doses_last_week: 0,
        days_of_supply_remaining: None,
        reported_symptom: None,
        patient_age_years: None,
    }
}

/// A critical-class medication plus two missed doses and nothing else.
pub(super) fn scenario_a_input() -> MedicationTriageInput {
    MedicationTriageInput {
        medication: MedicationRecord {
            name: "warfarin".to_string(),
            dose_mg: 5.0,
            max_daily_dose_mg: None,
        },
        co_medications: Vec::new(),
        missed_doses_last_week: 2,
        days_of_supply_remaining: None,
        reported_symptom: None,
        patient_age_years: None,
    }
}

/// Scenario A plus a severe interaction and the corroborating context a
/// real interaction presentation carries.
pub(super) fn scenario_b_input() -> MedicationTriageInput {
    MedicationTriageInput {
        medication: MedicationRecord {
            name: "warfarin".to_string(),
            dose_mg: 8.0,
            max_daily_dose_mg: Some(10.0),
        },
        co_medications: vec!["aspirin".to_string()],
        missed_doses_last_week: 2,
        days_of_supply_remaining: None,
        reported_symptom: Some(SymptomSeverity::Severe),
        patient_age_years: None,
    }
}

pub(super) fn high_urgency_nutrition_input() -> NutritionTriageInput {
    NutritionTriageInput {
        nutrient: "potassium".to_string(),
        diagnosed_severity: Some(SymptomSeverity::Severe),
        serum_level_ratio: Some(0.6),
        prior_severe_episodes: 2,
        reported_symptom: None,
        patient_age_years: Some(70.0),
    }
}

pub(super) fn medication_request(input: MedicationTriageInput) -> MedicationTriageRequest {
    MedicationTriageRequest {
        subject: subject(),
        input,
    }
}

pub(super) fn nutrition_request(input: NutritionTriageInput) -> NutritionTriageRequest {
    NutritionTriageRequest {
        subject: subject(),
        input,
    }
}

pub(super) const SIGNAL_NAMES: [&str; 4] = ["signal_a", "signal_b", "signal_c", "signal_d"];

/// Probe assessor reading one slot of a plain `Vec<f64>` input, for engine
/// property tests that need full control over every factor value.
pub(super) struct SignalAssessor {
    pub(super) index: usize,
}

impl RiskAssessor<Vec<f64>> for SignalAssessor {
    fn assess(&self, input: &Vec<f64>) -> AssessorOutcome {
        AssessorOutcome::quiet(input.get(self.index).copied().unwrap_or(0.0))
    }
}

pub(super) fn probe_config(weights: &[f64]) -> EngineConfig<Vec<f64>> {
    let assessors = weights
        .iter()
        .enumerate()
        .map(|(index, weight)| {
            RegisteredAssessor::new(SIGNAL_NAMES[index], *weight, SignalAssessor { index })
        })
        .collect();

    EngineConfig {
        assessors,
        ladder: ThresholdLadder::default(),
        response_times: probe_response_times(),
        guidance: LevelTable {
            low: Vec::new(),
            moderate: Vec::new(),
            high: Vec::new(),
            critical: Vec::new(),
        },
        compound_rules: Vec::new(),
    }
}

pub(super) fn probe_response_times() -> LevelTable<String> {
    LevelTable {
        low: "eventually".to_string(),
        moderate: "soon".to_string(),
        high: "quickly".to_string(),
        critical: "now".to_string(),
    }
}

pub(super) fn probe_engine(weights: &[f64]) -> UrgencyEngine<Vec<f64>> {
    UrgencyEngine::new(probe_config(weights)).expect("probe config is valid")
}

#[derive(Default, Clone)]
pub(super) struct MemoryPublisher {
    events: Arc<Mutex<Vec<NotificationPayload>>>,
}

impl MemoryPublisher {
    pub(super) fn events(&self) -> Vec<NotificationPayload> {
        self.events.lock().expect("publisher mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryPublisher {
    fn publish(&self, payload: NotificationPayload) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("publisher mutex poisoned")
            .push(payload);
        Ok(())
    }
}

pub(super) struct FailingPublisher;

impl NotificationPublisher for FailingPublisher {
    fn publish(&self, _payload: NotificationPayload) -> Result<(), NotificationError> {
        Err(NotificationError::Transport(
            "sms gateway offline".to_string(),
        ))
    }
}

pub(super) fn build_service() -> (TriageService<MemoryPublisher>, Arc<MemoryPublisher>) {
    let publisher = Arc::new(MemoryPublisher::default());
    let service =
        TriageService::new(publisher.clone()).expect("standard configs pass validation");
    (service, publisher)
}

pub(super) fn triage_router_with_service(
    service: TriageService<MemoryPublisher>,
) -> axum::Router {
    triage_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
