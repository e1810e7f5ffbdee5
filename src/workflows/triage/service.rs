use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::SubjectContext;
use super::engine::{ConfigError, EngineConfig, UrgencyAssessment, UrgencyEngine};
use super::medication::{self, MedicationTriageInput};
use super::notification::{build_notification, NotificationError, NotificationPublisher};
use super::nutrition::{self, NutritionTriageInput};

/// Per-domain triage request: subject identity plus the context fields the
/// assessors consume, assembled by the caller from its own stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationTriageRequest {
    pub subject: SubjectContext,
    pub input: MedicationTriageInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionTriageRequest {
    pub subject: SubjectContext,
    pub input: NutritionTriageInput,
}

/// Service composing the two domain engines with the notification channel.
///
/// Built once at startup; evaluation itself never blocks on I/O, and a
/// notification is dispatched only when an assessment requires immediate
/// attention.
pub struct TriageService<P> {
    medication: UrgencyEngine<MedicationTriageInput>,
    nutrition: UrgencyEngine<NutritionTriageInput>,
    publisher: Arc<P>,
}

impl<P> TriageService<P>
where
    P: NotificationPublisher + 'static,
{
    /// Construct with the standard per-domain configurations. Fails fast on
    /// a structurally invalid configuration so misconfiguration surfaces at
    /// startup, never at request time.
    pub fn new(publisher: Arc<P>) -> Result<Self, ConfigError> {
        Self::with_configs(
            publisher,
            medication::standard_config(),
            nutrition::standard_config(),
        )
    }

    pub fn with_configs(
        publisher: Arc<P>,
        medication_config: EngineConfig<MedicationTriageInput>,
        nutrition_config: EngineConfig<NutritionTriageInput>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            medication: UrgencyEngine::new(medication_config)?,
            nutrition: UrgencyEngine::new(nutrition_config)?,
            publisher,
        })
    }

    pub fn assess_medication(
        &self,
        request: MedicationTriageRequest,
    ) -> Result<UrgencyAssessment, TriageServiceError> {
        let assessment = self.medication.evaluate(&request.input, Utc::now());
        self.dispatch(&assessment, &request.subject)?;
        Ok(assessment)
    }

    pub fn assess_nutrition(
        &self,
        request: NutritionTriageRequest,
    ) -> Result<UrgencyAssessment, TriageServiceError> {
        let assessment = self.nutrition.evaluate(&request.input, Utc::now());
        self.dispatch(&assessment, &request.subject)?;
        Ok(assessment)
    }

    fn dispatch(
        &self,
        assessment: &UrgencyAssessment,
        subject: &SubjectContext,
    ) -> Result<(), TriageServiceError> {
        if !assessment.requires_immediate_attention {
            return Ok(());
        }

        let payload = build_notification(assessment, subject);
        self.publisher.publish(payload)?;
        Ok(())
    }
}

/// Error raised by the triage service. Evaluation itself is infallible;
/// only the notification transport can fail at request time.
#[derive(Debug, thiserror::Error)]
pub enum TriageServiceError {
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
