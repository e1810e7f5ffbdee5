//! Integration specifications for the urgency triage workflow.
//!
//! Scenarios exercise the public service facade, the engine, and the
//! notification hand-off end to end, without reaching into private
//! modules.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use triage_ai::workflows::formulary::FormularyImporter;
use triage_ai::workflows::triage::medication::{
    self, MedicationRecord, MedicationTriageInput,
};
use triage_ai::workflows::triage::nutrition;
use triage_ai::workflows::triage::{
    build_notification, MedicationTriageRequest, NotificationError, NotificationPayload,
    NotificationPublisher, SubjectContext, SubjectId, SymptomSeverity, TriageService,
    UrgencyEngine, UrgencyLevel,
};

#[derive(Default, Clone)]
struct CollectingPublisher {
    events: Arc<Mutex<Vec<NotificationPayload>>>,
}

impl CollectingPublisher {
    fn events(&self) -> Vec<NotificationPayload> {
        self.events.lock().expect("publisher mutex poisoned").clone()
    }
}

impl NotificationPublisher for CollectingPublisher {
    fn publish(&self, payload: NotificationPayload) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("publisher mutex poisoned")
            .push(payload);
        Ok(())
    }
}

fn subject() -> SubjectContext {
    SubjectContext {
        subject_id: SubjectId("subj-1207".to_string()),
        display_name: "Casey Elm".to_string(),
        care_team: None,
    }
}

fn evaluated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 4, 14, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn interaction_heavy_input() -> MedicationTriageInput {
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

#[test]
fn standard_configurations_pass_startup_validation() {
    let medication_engine = UrgencyEngine::new(medication::standard_config())
        .expect("medication config passes validation");
    let nutrition_engine = UrgencyEngine::new(nutrition::standard_config())
        .expect("nutrition config passes validation");

    assert!((medication_engine.config().total_weight() - 18.0).abs() < 1e-9);
    assert!((nutrition_engine.config().total_weight() - 15.0).abs() < 1e-9);
}

#[test]
fn medication_workflow_notifies_the_care_channel_end_to_end() {
    let publisher = Arc::new(CollectingPublisher::default());
    let service =
        TriageService::new(publisher.clone()).expect("standard configs pass validation");

    let assessment = service
        .assess_medication(MedicationTriageRequest {
            subject: subject(),
            input: interaction_heavy_input(),
        })
        .expect("assessment succeeds");

    assert_eq!(assessment.level, UrgencyLevel::High);
    assert!(assessment.requires_immediate_attention);

    let events = publisher.events();
    assert_eq!(events.len(), 1);
    let payload = &events[0];
    assert!(payload.action_required);
    assert_eq!(payload.subject.subject_id.0, "subj-1207");
    assert_eq!(payload.response_time, assessment.response_time);
}

#[test]
fn notification_payload_round_trips_every_risk_factor() {
    let engine = UrgencyEngine::new(medication::standard_config())
        .expect("medication config passes validation");
    let assessment = engine.evaluate(&interaction_heavy_input(), evaluated_at());

    let payload = build_notification(&assessment, &subject());

    assert_eq!(payload.risk_factors.len(), assessment.risk_factors.len());
    for (reading, factor) in payload.risk_factors.iter().zip(&assessment.risk_factors) {
        assert_eq!(reading.name, factor.name);
        assert!((reading.value - factor.value).abs() <= 0.005);
        assert_eq!(reading.value >= 0.0, factor.value >= 0.0);
    }
    assert_eq!(payload.action_required, assessment.requires_immediate_attention);
}

#[test]
fn identical_requests_produce_identical_assessments() {
    let engine = UrgencyEngine::new(medication::standard_config())
        .expect("medication config passes validation");
    let input = interaction_heavy_input();

    let first = engine.evaluate(&input, evaluated_at());
    let second = engine.evaluate(&input, evaluated_at());

    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );
}

#[test]
fn imported_formulary_drives_the_lookup_assessors() {
    let csv = "Medication,Risk Class,Interacts With,Interaction Severity\n\
Apixaban,Critical,Naproxen,Critical\n\
Naproxen,Low,,\n";
    let tables = FormularyImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

    let engine = UrgencyEngine::new(medication::config_with_tables(tables))
        .expect("imported tables pass validation");

    let input = MedicationTriageInput {
        medication: MedicationRecord {
            name: "apixaban".to_string(),
            dose_mg: 5.0,
            max_daily_dose_mg: None,
        },
        co_medications: vec!["naproxen".to_string()],
        missed_doses_last_week: 0,
        days_of_supply_remaining: None,
        reported_symptom: None,
        patient_age_years: None,
    };
    let assessment = engine.evaluate(&input, evaluated_at());

    let class_factor = assessment
        .risk_factors
        .iter()
        .find(|factor| factor.name == "medication_class")
        .expect("class factor present");
    assert_eq!(class_factor.value, 1.0);

    let interaction_factor = assessment
        .risk_factors
        .iter()
        .find(|factor| factor.name == "drug_interaction")
        .expect("interaction factor present");
    assert_eq!(interaction_factor.value, 1.0);

    assert!(assessment
        .findings
        .iter()
        .any(|finding| finding.kind == "severe_interaction"));
}
