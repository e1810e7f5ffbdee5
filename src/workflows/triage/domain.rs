use serde::{Deserialize, Serialize};

/// Identifier wrapper for monitored subjects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub String);

/// Subject identity attached to notifications so the delivery channel can
/// address the right patient and care team. Carries no clinical data of
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectContext {
    pub subject_id: SubjectId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub care_team: Option<String>,
}

/// Four-point categorical severity reported with symptoms or attached to a
/// diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomSeverity {
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl SymptomSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            SymptomSeverity::Mild => "mild",
            SymptomSeverity::Moderate => "moderate",
            SymptomSeverity::Severe => "severe",
            SymptomSeverity::Critical => "critical",
        }
    }
}
