mod normalizer;
mod parser;

use crate::workflows::triage::medication::MedicationTables;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum FormularyImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownRiskClass { medication: String, value: String },
}

impl std::fmt::Display for FormularyImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormularyImportError::Io(err) => {
                write!(f, "failed to read formulary export: {}", err)
            }
            FormularyImportError::Csv(err) => write!(f, "invalid formulary CSV data: {}", err),
            FormularyImportError::UnknownRiskClass { medication, value } => write!(
                f,
                "unknown risk class '{}' for medication '{}' (expected low/moderate/high/critical)",
                value, medication
            ),
        }
    }
}

impl std::error::Error for FormularyImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormularyImportError::Io(err) => Some(err),
            FormularyImportError::Csv(err) => Some(err),
            FormularyImportError::UnknownRiskClass { .. } => None,
        }
    }
}

impl From<std::io::Error> for FormularyImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for FormularyImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Builds the medication class and interaction tables from a formulary CSV
/// export (columns: Medication, Risk Class, Interacts With, Interaction
/// Severity). Medications may repeat across rows to list several
/// interactions; a mis-labelled risk class fails the import rather than
/// silently dropping the medication.
pub struct FormularyImporter;

impl FormularyImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<MedicationTables, FormularyImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<MedicationTables, FormularyImportError> {
        let mut tables = MedicationTables::default();

        for record in parser::parse_records(reader)? {
            if let Some(label) = &record.risk_class {
                let score = class_score(label).ok_or_else(|| {
                    FormularyImportError::UnknownRiskClass {
                        medication: record.medication.clone(),
                        value: label.clone(),
                    }
                })?;
                tables.classes.insert(&record.medication, score);
            }

            if let Some(interaction) = &record.interaction {
                let score = class_score(&interaction.severity).ok_or_else(|| {
                    FormularyImportError::UnknownRiskClass {
                        medication: record.medication.clone(),
                        value: interaction.severity.clone(),
                    }
                })?;
                tables
                    .interactions
                    .insert(&record.medication, &interaction.partner, score);
            }
        }

        Ok(tables)
    }
}

fn class_score(label: &str) -> Option<f64> {
    match label {
        "low" => Some(0.25),
        "moderate" => Some(0.5),
        "high" => Some(0.75),
        "critical" => Some(1.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn normalize_name_removes_whitespace_and_case() {
        let source = "\u{feff}Warfarin  Sodium";
        let normalized = normalizer::normalize_for_tests(source);
        assert_eq!(normalized, "warfarin sodium");
    }

    #[test]
    fn importer_builds_class_and_interaction_tables() {
        let csv = "Medication,Risk Class,Interacts With,Interaction Severity\n\
Warfarin,Critical,Aspirin,Critical\n\
Warfarin,,Ibuprofen,High\n\
Metformin,Moderate,,\n";
        let tables =
            FormularyImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(tables.classes.score("warfarin"), 1.0);
        assert_eq!(tables.classes.score("Metformin"), 0.5);
        assert_eq!(tables.interactions.score("aspirin", "WARFARIN"), 1.0);
        assert_eq!(tables.interactions.score("ibuprofen", "warfarin"), 0.75);
    }

    #[test]
    fn importer_skips_rows_without_medication_name() {
        let csv = "Medication,Risk Class,Interacts With,Interaction Severity\n\
  ,High,,\n\
Digoxin,High,,\n";
        let tables =
            FormularyImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(tables.classes.score("digoxin"), 0.75);
        assert!(tables.interactions.is_empty());
    }

    #[test]
    fn importer_rejects_unknown_risk_class() {
        let csv = "Medication,Risk Class,Interacts With,Interaction Severity\n\
Warfarin,extreme,,\n";
        let error =
            FormularyImporter::from_reader(Cursor::new(csv)).expect_err("unknown class label");

        match error {
            FormularyImportError::UnknownRiskClass { medication, value } => {
                assert_eq!(medication, "warfarin");
                assert_eq!(value, "extreme");
            }
            other => panic!("expected unknown risk class error, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = FormularyImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            FormularyImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
