//! Entity kinds
//!
//! The closed set of FHIR resource types Fhirflow ingests. The order of
//! [`Entity::INGEST_ORDER`] matters: later entities resolve references against
//! rows persisted by earlier ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A FHIR resource type and the table it lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    /// `Patient` resources → `patients`
    Patients,
    /// `Encounter` resources → `encounters`
    Encounters,
    /// `Procedure` resources → `procedures`
    Procedures,
    /// `Observation` resources → `observations`
    Observations,
}

impl Entity {
    /// Cross-entity ingest order
    pub const INGEST_ORDER: [Entity; 4] = [
        Entity::Patients,
        Entity::Encounters,
        Entity::Procedures,
        Entity::Observations,
    ];

    /// Target table name
    pub fn table(&self) -> &'static str {
        match self {
            Entity::Patients => "patients",
            Entity::Encounters => "encounters",
            Entity::Procedures => "procedures",
            Entity::Observations => "observations",
        }
    }

    /// FHIR resource type, as used in reference strings (`Patient/123`)
    pub fn resource_type(&self) -> &'static str {
        match self {
            Entity::Patients => "Patient",
            Entity::Encounters => "Encounter",
            Entity::Procedures => "Procedure",
            Entity::Observations => "Observation",
        }
    }

    /// Columns written by a bulk insert, in bind order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Entity::Patients => &[
                "source_id",
                "birth_date",
                "gender",
                "race_code",
                "race_code_system",
                "ethnicity_code",
                "ethnicity_code_system",
                "country",
            ],
            Entity::Encounters => &[
                "source_id",
                "patient_id",
                "start_date",
                "end_date",
                "type_code",
                "type_code_system",
            ],
            Entity::Procedures => &[
                "source_id",
                "patient_id",
                "encounter_id",
                "procedure_date",
                "type_code",
                "type_code_system",
            ],
            Entity::Observations => &[
                "source_id",
                "patient_id",
                "encounter_id",
                "observation_date",
                "type_code",
                "type_code_system",
                "value",
                "unit_code",
                "unit_code_system",
            ],
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patients" | "patient" => Ok(Entity::Patients),
            "encounters" | "encounter" => Ok(Entity::Encounters),
            "procedures" | "procedure" => Ok(Entity::Procedures),
            "observations" | "observation" => Ok(Entity::Observations),
            _ => Err(format!(
                "Unknown entity '{s}'. Must be one of: patients, encounters, procedures, observations"
            )),
        }
    }
}
