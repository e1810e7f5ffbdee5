use super::normalizer::normalize_name;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One formulary row after normalization: the medication, its risk class
/// label, and an optional interaction entry.
#[derive(Debug)]
pub(crate) struct FormularyRecord {
    pub(crate) medication: String,
    pub(crate) risk_class: Option<String>,
    pub(crate) interaction: Option<InteractionEntry>,
}

#[derive(Debug)]
pub(crate) struct InteractionEntry {
    pub(crate) partner: String,
    pub(crate) severity: String,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<FormularyRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<FormularyRow>() {
        let row = record?;
        let medication = normalize_name(&row.medication);
        if medication.is_empty() {
            continue;
        }

        let interaction = match (row.interacts_with, row.interaction_severity) {
            (Some(partner), Some(severity)) => Some(InteractionEntry {
                partner: normalize_name(&partner),
                severity: normalize_name(&severity),
            }),
            _ => None,
        };

        records.push(FormularyRecord {
            medication,
            risk_class: row.risk_class.map(|value| normalize_name(&value)),
            interaction,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct FormularyRow {
    #[serde(rename = "Medication")]
    medication: String,
    #[serde(rename = "Risk Class", default, deserialize_with = "empty_string_as_none")]
    risk_class: Option<String>,
    #[serde(
        rename = "Interacts With",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    interacts_with: Option<String>,
    #[serde(
        rename = "Interaction Severity",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    interaction_severity: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
