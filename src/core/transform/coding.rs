//! Coded-value extraction
//!
//! FHIR carries codes as `{"coding": [{"code": ..., "system": ...}, ...]}`. Only the
//! first entry is used, and any structural surprise degrades to an empty pair
//! instead of failing the record.

use super::fhir::as_text;
use serde_json::Value;

/// US-Core race extension URL
pub const RACE_CODE_URL: &str = "http://hl7.org/fhir/us/core/StructureDefinition/us-core-race";

/// US-Core ethnicity extension URL
pub const ETHNICITY_CODE_URL: &str =
    "http://hl7.org/fhir/us/core/StructureDefinition/us-core-ethnicity";

/// A code and the system it belongs to, either of which may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coding {
    pub code: Option<String>,
    pub system: Option<String>,
}

impl Coding {
    /// Both halves, or `None` if either is missing
    pub fn into_required(self) -> Option<(String, String)> {
        match (self.code, self.system) {
            (Some(code), Some(system)) => Some((code, system)),
            _ => None,
        }
    }
}

/// Reads `container.coding[0].{code,system}`
pub fn first_coding(container: Option<&Value>) -> Coding {
    let Some(entry) = container
        .and_then(|c| c.get("coding"))
        .and_then(|coding| coding.get(0))
    else {
        return Coding::default();
    };

    Coding {
        code: entry.get("code").and_then(as_text),
        system: entry.get("system").and_then(as_text),
    }
}

/// Reads the first coding of the `extension` entry whose `url` matches
///
/// Looks at `valueCodeableConcept.coding[0]` of the first matching extension only.
pub fn extension_coding(extensions: Option<&Value>, url: &str) -> Coding {
    extensions
        .and_then(Value::as_array)
        .and_then(|list| {
            list.iter()
                .find(|ext| ext.get("url").and_then(Value::as_str) == Some(url))
        })
        .map(|ext| first_coding(ext.get("valueCodeableConcept")))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_coding_takes_first_entry() {
        let code = json!({
            "coding": [
                {"code": "code_value", "system": "system_value"},
                {"code": "code_value2", "system": "system_value2"}
            ]
        });
        let coding = first_coding(Some(&code));
        assert_eq!(coding.code.as_deref(), Some("code_value"));
        assert_eq!(coding.system.as_deref(), Some("system_value"));
    }

    #[test]
    fn test_first_coding_structural_misses() {
        assert_eq!(first_coding(None), Coding::default());
        assert_eq!(first_coding(Some(&json!({}))), Coding::default());
        assert_eq!(first_coding(Some(&json!({"coding": []}))), Coding::default());
        assert_eq!(first_coding(Some(&json!({"coding": "oops"}))), Coding::default());
        assert_eq!(first_coding(Some(&json!(17))), Coding::default());

        let partial = first_coding(Some(&json!({"coding": [{"code": "x"}]})));
        assert_eq!(partial.code.as_deref(), Some("x"));
        assert!(partial.system.is_none());
        assert!(partial.into_required().is_none());
    }

    #[test]
    fn test_extension_coding_selects_by_url() {
        let extensions = json!([
            {
                "url": ETHNICITY_CODE_URL,
                "valueCodeableConcept": {"coding": [{"code": "2186-5", "system": "urn:oid:2.16.840.1.113883.6.238"}]}
            },
            {
                "url": RACE_CODE_URL,
                "valueCodeableConcept": {"coding": [{"code": "2106-3", "system": "urn:oid:2.16.840.1.113883.6.238"}]}
            }
        ]);

        let race = extension_coding(Some(&extensions), RACE_CODE_URL);
        assert_eq!(race.code.as_deref(), Some("2106-3"));

        let ethnicity = extension_coding(Some(&extensions), ETHNICITY_CODE_URL);
        assert_eq!(ethnicity.code.as_deref(), Some("2186-5"));

        let missing = extension_coding(Some(&extensions), "http://example.com/other");
        assert_eq!(missing, Coding::default());
    }

    #[test]
    fn test_extension_coding_without_concept() {
        let extensions = json!([{ "url": RACE_CODE_URL }]);
        assert_eq!(extension_coding(Some(&extensions), RACE_CODE_URL), Coding::default());
        assert_eq!(extension_coding(None, RACE_CODE_URL), Coding::default());
    }
}
