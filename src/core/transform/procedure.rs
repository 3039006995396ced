//! `Procedure` → `procedures`

use super::coding::first_coding;
use super::fhir::{required_date, source_id, Resource};
use super::{resolve_encounter, resolve_patient, ReferenceResolver};
use crate::domain::{ProcedureRow, Rejection, Row};

/// Builds the procedure row
///
/// The date comes from `performedDateTime`, falling back to `performedPeriod.start`.
/// Both halves of `code.coding[0]` are required.
pub async fn transform(
    resource: &Resource,
    resolver: &dyn ReferenceResolver,
) -> Result<Vec<Row>, Rejection> {
    let source_id = source_id(resource)?;

    let procedure_date = match resource.get("performedDateTime") {
        Some(value) => required_date(Some(value), "performedDateTime")?,
        None => required_date(
            resource.get("performedPeriod").and_then(|p| p.get("start")),
            "performedPeriod.start",
        )?,
    };

    let (type_code, type_code_system) = first_coding(resource.get("code"))
        .into_required()
        .ok_or(Rejection::MissingField("code.coding"))?;

    let patient_id = resolve_patient(resource, resolver).await?;
    let encounter_id = resolve_encounter(resource, resolver).await?;

    Ok(vec![ProcedureRow {
        source_id,
        patient_id,
        encounter_id,
        procedure_date,
        type_code,
        type_code_system,
    }
    .into()])
}
