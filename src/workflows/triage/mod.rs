//! Urgency triage: weighted clinical risk factors aggregated into a
//! normalized score, a severity classification, discrete findings, and a
//! notification payload.
//!
//! The engine is generic over the domain input; `medication` and
//! `nutrition` supply their assessor registries and tables as
//! configuration. Everything downstream of configuration is pure
//! computation, so the engine is freely shareable across threads.

pub mod domain;
pub mod engine;
pub mod medication;
pub mod notification;
pub mod nutrition;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{SubjectContext, SubjectId, SymptomSeverity};
pub use engine::{
    ConfigError, EngineConfig, Finding, FindingSeverity, RiskFactorScore, ThresholdLadder,
    UrgencyAssessment, UrgencyEngine, UrgencyLevel,
};
pub use notification::{
    build_notification, LogPublisher, NotificationError, NotificationPayload,
    NotificationPublisher, RiskFactorReading,
};
pub use router::triage_router;
pub use service::{
    MedicationTriageRequest, NutritionTriageRequest, TriageService, TriageServiceError,
};

use engine::LevelTable;

/// Service-level response windows shared by every triage domain.
pub(crate) fn standard_response_times() -> LevelTable<String> {
    LevelTable {
        low: "at the next routine review".to_string(),
        moderate: "within 24 hours".to_string(),
        high: "within 4 hours".to_string(),
        critical: "within 1 hour".to_string(),
    }
}
