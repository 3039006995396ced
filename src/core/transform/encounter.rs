//! `Encounter` → `encounters`

use super::coding::first_coding;
use super::fhir::{parse_timestamp, source_id, Resource};
use super::{resolve_patient, ReferenceResolver};
use crate::domain::{EncounterRow, Rejection, Row};
use chrono::{DateTime, Utc};
use serde_json::Value;

fn period_bound(period: Option<&Value>, field: &'static str) -> Result<DateTime<Utc>, Rejection> {
    let raw = period
        .and_then(|p| p.get(field))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(Rejection::MissingField(field))?;
    parse_timestamp(raw).ok_or_else(|| Rejection::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Builds the encounter row; `id`, a resolvable subject and both period bounds are required
pub async fn transform(
    resource: &Resource,
    resolver: &dyn ReferenceResolver,
) -> Result<Vec<Row>, Rejection> {
    let source_id = source_id(resource)?;

    let period = resource.get("period");
    let start_date = period_bound(period, "start")?;
    let end_date = period_bound(period, "end")?;

    let coding = first_coding(resource.get("type").and_then(|types| types.get(0)));

    let patient_id = resolve_patient(resource, resolver).await?;

    Ok(vec![EncounterRow {
        source_id,
        patient_id,
        start_date,
        end_date,
        type_code: coding.code,
        type_code_system: coding.system,
    }
    .into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::fhir::decode;
    use crate::core::transform::test_support::MapResolver;
    use crate::domain::Entity;
    use serde_json::json;

    fn resolver() -> MapResolver {
        MapResolver::new().with(Entity::Patients, "patient-uuid-1", 7)
    }

    fn encounter_json() -> Value {
        json!({
            "id": "2",
            "subject": {"reference": "Patient/patient-uuid-1"},
            "period": {
                "start": "2011-11-01T00:05:23+04:00",
                "end": "2011-11-04T00:05:23+04:00"
            },
            "type": [{"coding": [{"code": "code_value", "system": "system_value"}]}]
        })
    }

    #[tokio::test]
    async fn test_encounter_normalizes_period_to_utc() {
        let resource = decode(&encounter_json().to_string()).unwrap();
        let rows = transform(&resource, &resolver()).await.unwrap();

        let Row::Encounter(row) = &rows[0] else {
            panic!("expected an encounter row");
        };
        assert_eq!(row.source_id, "2");
        assert_eq!(row.patient_id, 7);
        assert_eq!(row.start_date.to_rfc3339(), "2011-10-31T20:05:23+00:00");
        assert_eq!(row.end_date.to_rfc3339(), "2011-11-03T20:05:23+00:00");
        assert_eq!(row.type_code.as_deref(), Some("code_value"));
        assert_eq!(row.type_code_system.as_deref(), Some("system_value"));
    }

    #[tokio::test]
    async fn test_encounter_type_is_optional() {
        let mut value = encounter_json();
        value.as_object_mut().unwrap().remove("type");
        let resource = decode(&value.to_string()).unwrap();

        let rows = transform(&resource, &resolver()).await.unwrap();
        let Row::Encounter(row) = &rows[0] else {
            panic!("expected an encounter row");
        };
        assert!(row.type_code.is_none());
        assert!(row.type_code_system.is_none());
    }

    #[tokio::test]
    async fn test_encounter_unknown_patient_rejects() {
        let mut value = encounter_json();
        value["subject"]["reference"] = json!("Patient/uuid-non-existing");
        let resource = decode(&value.to_string()).unwrap();

        assert_eq!(
            transform(&resource, &resolver()).await,
            Err(Rejection::UnresolvedReference {
                field: "subject",
                reference: "uuid-non-existing".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_encounter_missing_end_rejects_without_lookup() {
        let mut value = encounter_json();
        value["period"].as_object_mut().unwrap().remove("end");
        let resource = decode(&value.to_string()).unwrap();
        let resolver = resolver();

        assert_eq!(
            transform(&resource, &resolver).await,
            Err(Rejection::MissingField("end"))
        );
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn test_encounter_bad_start_rejects() {
        let mut value = encounter_json();
        value["period"]["start"] = json!("not a date");
        let resource = decode(&value.to_string()).unwrap();

        assert!(matches!(
            transform(&resource, &resolver()).await,
            Err(Rejection::InvalidDate { field: "start", .. })
        ));
    }
}
