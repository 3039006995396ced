//! `Patient` → `patients`

use super::coding::{extension_coding, ETHNICITY_CODE_URL, RACE_CODE_URL};
use super::fhir::{source_id, Resource};
use crate::domain::{PatientRow, Rejection, Row};
use chrono::NaiveDate;
use serde_json::Value;

/// Builds the patient row. Only `id` is required; everything else degrades to null.
pub fn transform(resource: &Resource) -> Result<Vec<Row>, Rejection> {
    let mut row = PatientRow::new(source_id(resource)?);

    row.birth_date = resource
        .get("birthDate")
        .and_then(Value::as_str)
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());

    row.gender = resource
        .get("gender")
        .and_then(Value::as_str)
        .map(str::to_string);

    row.country = resource
        .get("address")
        .and_then(|addresses| addresses.get(0))
        .and_then(|address| address.get("country"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let extensions = resource.get("extension");
    let race = extension_coding(extensions, RACE_CODE_URL);
    row.race_code = race.code;
    row.race_code_system = race.system;

    let ethnicity = extension_coding(extensions, ETHNICITY_CODE_URL);
    row.ethnicity_code = ethnicity.code;
    row.ethnicity_code_system = ethnicity.system;

    Ok(vec![row.into()])
}
