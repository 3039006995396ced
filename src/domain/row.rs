//! Validated rows
//!
//! One typed struct per target table. A row only exists once every required field
//! of its entity has been validated and every required reference resolved, so the
//! store never has to re-check them.

use super::entity::Entity;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Row for the `patients` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRow {
    pub source_id: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub race_code: Option<String>,
    pub race_code_system: Option<String>,
    pub ethnicity_code: Option<String>,
    pub ethnicity_code_system: Option<String>,
    pub country: Option<String>,
}

impl PatientRow {
    /// A patient row with every optional column null
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            birth_date: None,
            gender: None,
            race_code: None,
            race_code_system: None,
            ethnicity_code: None,
            ethnicity_code_system: None,
            country: None,
        }
    }
}

/// Row for the `encounters` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterRow {
    pub source_id: String,
    pub patient_id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub type_code: Option<String>,
    pub type_code_system: Option<String>,
}

/// Row for the `procedures` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureRow {
    pub source_id: String,
    pub patient_id: i32,
    pub encounter_id: Option<i32>,
    pub procedure_date: NaiveDate,
    pub type_code: String,
    pub type_code_system: String,
}

/// Row for the `observations` table
///
/// An observation with components yields one row per usable component, all sharing
/// the same `source_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRow {
    pub source_id: String,
    pub patient_id: i32,
    pub encounter_id: Option<i32>,
    pub observation_date: NaiveDate,
    pub type_code: String,
    pub type_code_system: String,
    pub value: f64,
    pub unit_code: Option<String>,
    pub unit_code_system: Option<String>,
}

/// A validated row for any entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Row {
    Patient(PatientRow),
    Encounter(EncounterRow),
    Procedure(ProcedureRow),
    Observation(ObservationRow),
}

impl Row {
    /// The entity (and therefore the table) this row belongs to
    pub fn entity(&self) -> Entity {
        match self {
            Row::Patient(_) => Entity::Patients,
            Row::Encounter(_) => Entity::Encounters,
            Row::Procedure(_) => Entity::Procedures,
            Row::Observation(_) => Entity::Observations,
        }
    }

    /// Source-system identifier of the record this row came from
    pub fn source_id(&self) -> &str {
        match self {
            Row::Patient(r) => &r.source_id,
            Row::Encounter(r) => &r.source_id,
            Row::Procedure(r) => &r.source_id,
            Row::Observation(r) => &r.source_id,
        }
    }
}

impl From<PatientRow> for Row {
    fn from(row: PatientRow) -> Self {
        Row::Patient(row)
    }
}

impl From<EncounterRow> for Row {
    fn from(row: EncounterRow) -> Self {
        Row::Encounter(row)
    }
}

impl From<ProcedureRow> for Row {
    fn from(row: ProcedureRow) -> Self {
        Row::Procedure(row)
    }
}

impl From<ObservationRow> for Row {
    fn from(row: ObservationRow) -> Self {
        Row::Observation(row)
    }
}
