//! Field extraction helpers shared by every resource transformer

use crate::domain::Rejection;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

/// A decoded resource
pub type Resource = Map<String, Value>;

/// Decodes one source line into a JSON object
///
/// Bytes that are not valid UTF-8 are an [`Rejection::InvalidJson`] like any other
/// malformed input.
pub fn decode(raw: impl AsRef<[u8]>) -> Result<Resource, Rejection> {
    match serde_json::from_slice::<Value>(raw.as_ref()) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Rejection::NotAnObject),
        Err(e) => Err(Rejection::InvalidJson(e.to_string())),
    }
}

/// Renders a scalar as text: strings as-is, numbers in decimal form
///
/// Any other JSON type yields `None`.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The required `id` of a resource, coerced to text
pub fn source_id(resource: &Resource) -> Result<String, Rejection> {
    resource
        .get("id")
        .and_then(as_text)
        .ok_or(Rejection::MissingField("id"))
}

/// Reads `resource[field].reference` as a string
pub fn reference<'a>(resource: &'a Resource, field: &str) -> Option<&'a str> {
    resource.get(field)?.get("reference")?.as_str()
}

/// Strips a `ResourceType/` prefix from a reference; bare ids pass through
pub fn strip_reference<'a>(reference: &'a str, resource_type: &str) -> &'a str {
    reference
        .strip_prefix(resource_type)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(reference)
}

/// Parses a FHIR `dateTime` into a UTC instant
///
/// Accepts RFC 3339 (with offset or `Z`), a naive date-time taken as UTC, and a
/// bare date taken as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses a FHIR `date` or `dateTime` into the calendar date written in the source
///
/// For values with an offset this is the date local to that offset, not the UTC date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.date())
}

/// Reads a required string field and parses it as a calendar date
pub fn required_date(
    value: Option<&Value>,
    field: &'static str,
) -> Result<NaiveDate, Rejection> {
    let raw = value
        .and_then(Value::as_str)
        .ok_or(Rejection::MissingField(field))?;
    parse_calendar_date(raw).ok_or_else(|| Rejection::InvalidDate {
        field,
        value: raw.to_string(),
    })
}
