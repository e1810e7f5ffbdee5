use super::aggregate::UrgencyLevel;
use super::config::LevelTable;
use super::findings::{Finding, FindingSeverity};

/// Derive the ordered action list for an assessment.
///
/// Always emits, in order: the response-time statement for the level, the
/// level's configured guidance block, then one line per HIGH or CRITICAL
/// finding. Identical input yields an identical list.
pub(crate) fn generate(
    level: UrgencyLevel,
    response_times: &LevelTable<String>,
    guidance: &LevelTable<Vec<String>>,
    findings: &[Finding],
) -> Vec<String> {
    let guidance_block = guidance.get(level);
    let mut recommendations = Vec::with_capacity(1 + guidance_block.len() + findings.len());

    recommendations.push(format!("Response required {}", response_times.get(level)));
    recommendations.extend(guidance_block.iter().cloned());

    for finding in findings {
        if finding.severity >= FindingSeverity::High {
            recommendations.push(format!(
                "{}: {}",
                finding.title, finding.recommended_action
            ));
        }
    }

    recommendations
}
