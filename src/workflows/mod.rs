pub mod formulary;
pub mod triage;
