use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::SubjectContext;
use super::engine::{Finding, UrgencyAssessment, UrgencyLevel};

/// Flattened, fixed-precision copy of one risk factor for the outbound
/// payload. Registry order is preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorReading {
    pub name: String,
    pub value: f64,
}

/// Externally-facing serialization of an assessment plus subject identity,
/// handed to the delivery channel. Owns no delivery state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub subject: SubjectContext,
    pub level: UrgencyLevel,
    pub score: f64,
    pub action_required: bool,
    pub response_time: String,
    pub risk_factors: Vec<RiskFactorReading>,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
}

/// Pure transformation of an assessment into its outbound payload; no I/O.
pub fn build_notification(
    assessment: &UrgencyAssessment,
    subject: &SubjectContext,
) -> NotificationPayload {
    let risk_factors = assessment
        .risk_factors
        .iter()
        .map(|factor| RiskFactorReading {
            name: factor.name.clone(),
            value: round_reading(factor.value),
        })
        .collect();

    NotificationPayload {
        subject: subject.clone(),
        level: assessment.level,
        score: round_reading(assessment.score),
        action_required: assessment.requires_immediate_attention,
        response_time: assessment.response_time.clone(),
        risk_factors,
        findings: assessment.findings.clone(),
        recommendations: assessment.recommendations.clone(),
        evaluated_at: assessment.evaluated_at,
    }
}

fn round_reading(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Trait describing outbound notification hooks (e-mail, SMS, push, or
/// plain log adapters). Transport, retry, and delivery confirmation live
/// behind this seam.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, payload: NotificationPayload) -> Result<(), NotificationError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Default channel: emits the payload to the service log. Useful for
/// development and as a last-resort audit trail in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

impl NotificationPublisher for LogPublisher {
    fn publish(&self, payload: NotificationPayload) -> Result<(), NotificationError> {
        warn!(
            subject = %payload.subject.subject_id.0,
            level = payload.level.label(),
            score = payload.score,
            response_time = %payload.response_time,
            findings = payload.findings.len(),
            "urgency notification"
        );
        Ok(())
    }
}
