//! `Observation` → `observations`
//!
//! An observation either carries its measurement directly (`valueQuantity` at the
//! top level, one row) or as a list of `component`s (one row per usable component,
//! e.g. systolic and diastolic blood pressure).

use super::coding::first_coding;
use super::fhir::{as_text, required_date, source_id, Resource};
use super::{resolve_encounter, resolve_patient, ReferenceResolver};
use crate::domain::{ObservationRow, Rejection, Row};
use serde_json::Value;

/// One measured value before the shared columns are attached
#[derive(Debug, PartialEq)]
struct Measurement {
    type_code: String,
    type_code_system: String,
    value: f64,
    unit_code: Option<String>,
    unit_code_system: Option<String>,
}

/// Reads a code from `code` and a numeric value from `quantity`
fn measurement(code: Option<&Value>, quantity: &Value) -> Option<Measurement> {
    let (type_code, type_code_system) = first_coding(code).into_required()?;
    let value = quantity.get("value").and_then(Value::as_f64)?;
    Some(Measurement {
        type_code,
        type_code_system,
        value,
        unit_code: quantity.get("unit").and_then(as_text),
        unit_code_system: quantity.get("system").and_then(as_text),
    })
}

fn measurements(resource: &Resource) -> Result<Vec<Measurement>, Rejection> {
    if let Some(quantity) = resource.get("valueQuantity") {
        return measurement(resource.get("code"), quantity)
            .map(|m| vec![m])
            .ok_or(Rejection::NoUsableRows);
    }

    let found: Vec<Measurement> = resource
        .get("component")
        .and_then(Value::as_array)
        .map(|components| {
            components
                .iter()
                .filter_map(|component| {
                    let quantity = component.get("valueQuantity")?;
                    measurement(component.get("code"), quantity)
                })
                .collect()
        })
        .unwrap_or_default();

    if found.is_empty() {
        Err(Rejection::NoUsableRows)
    } else {
        Ok(found)
    }
}

/// Builds one row per measurement, all sharing `id`, subject, context and date
pub async fn transform(
    resource: &Resource,
    resolver: &dyn ReferenceResolver,
) -> Result<Vec<Row>, Rejection> {
    let source_id = source_id(resource)?;
    let observation_date = required_date(resource.get("effectiveDateTime"), "effectiveDateTime")?;
    let measurements = measurements(resource)?;

    let patient_id = resolve_patient(resource, resolver).await?;
    let encounter_id = resolve_encounter(resource, resolver).await?;

    Ok(measurements
        .into_iter()
        .map(|m| {
            ObservationRow {
                source_id: source_id.clone(),
                patient_id,
                encounter_id,
                observation_date,
                type_code: m.type_code,
                type_code_system: m.type_code_system,
                value: m.value,
                unit_code: m.unit_code,
                unit_code_system: m.unit_code_system,
            }
            .into()
        })
        .collect())
}
