//! Record transformation
//!
//! Turns one raw NDJSON line into zero, one or many validated rows for its entity.
//! Every transformer follows the same order: decode, validate the cheap local
//! fields, then resolve foreign keys through a [`ReferenceResolver`]. A record that
//! fails validation is rejected with a [`Rejection`] and never reaches the store.
//!
//! # Example
//!
//! ```rust
//! use fhirflow::core::transform::{transform, NoReferences};
//! use fhirflow::domain::{Entity, Row};
//!
//! # async fn example() {
//! let rows = transform(Entity::Patients, r#"{"id": "2"}"#, &NoReferences).await.unwrap();
//! assert!(matches!(&rows[0], Row::Patient(p) if p.source_id == "2"));
//! # }
//! ```

pub mod coding;
pub mod encounter;
pub mod fhir;
pub mod observation;
pub mod patient;
pub mod procedure;

use crate::domain::{Entity, Rejection, Result, Row};
use async_trait::async_trait;

/// Resolves a source reference (already stripped of its `Type/` prefix) to the
/// numeric id of a stored row
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    /// Returns `Ok(None)` when no row with that source id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying lookup fails.
    async fn resolve(&self, kind: Entity, reference: &str) -> Result<Option<i32>>;
}

/// Resolver that never finds anything
///
/// Enough for patients, which carry no references.
pub struct NoReferences;

#[async_trait]
impl ReferenceResolver for NoReferences {
    async fn resolve(&self, _kind: Entity, _reference: &str) -> Result<Option<i32>> {
        Ok(None)
    }
}

/// Transforms one raw line for `entity`
///
/// # Errors
///
/// Returns the [`Rejection`] explaining why the line produced no rows.
pub async fn transform(
    entity: Entity,
    raw: impl AsRef<[u8]>,
    resolver: &dyn ReferenceResolver,
) -> std::result::Result<Vec<Row>, Rejection> {
    let resource = fhir::decode(raw)?;
    match entity {
        Entity::Patients => patient::transform(&resource),
        Entity::Encounters => encounter::transform(&resource, resolver).await,
        Entity::Procedures => procedure::transform(&resource, resolver).await,
        Entity::Observations => observation::transform(&resource, resolver).await,
    }
}

/// Resolves `resource.subject.reference` to a patient id; absence or a miss rejects
pub(crate) async fn resolve_patient(
    resource: &fhir::Resource,
    resolver: &dyn ReferenceResolver,
) -> std::result::Result<i32, Rejection> {
    let raw = fhir::reference(resource, "subject").ok_or(Rejection::MissingField("subject"))?;
    let reference = fhir::strip_reference(raw, Entity::Patients.resource_type());

    match resolver.resolve(Entity::Patients, reference).await {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(Rejection::UnresolvedReference {
            field: "subject",
            reference: reference.to_string(),
        }),
        Err(e) => Err(Rejection::LookupFailed {
            field: "subject",
            message: e.to_string(),
        }),
    }
}

/// Resolves the optional `resource.context.reference` to an encounter id
///
/// A missing or unresolvable reference is null; only a failed lookup rejects.
pub(crate) async fn resolve_encounter(
    resource: &fhir::Resource,
    resolver: &dyn ReferenceResolver,
) -> std::result::Result<Option<i32>, Rejection> {
    let Some(raw) = fhir::reference(resource, "context") else {
        return Ok(None);
    };
    let reference = fhir::strip_reference(raw, Entity::Encounters.resource_type());

    resolver
        .resolve(Entity::Encounters, reference)
        .await
        .map_err(|e| Rejection::LookupFailed {
            field: "context",
            message: e.to_string(),
        })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::{FhirflowError, StoreError};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Map-backed resolver that counts calls
    #[derive(Default)]
    pub struct MapResolver {
        ids: HashMap<(Entity, String), i32>,
        failing: bool,
        pub calls: AtomicUsize,
    }

    impl MapResolver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, kind: Entity, reference: &str, id: i32) -> Self {
            self.ids.insert((kind, reference.to_string()), id);
            self
        }

        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReferenceResolver for MapResolver {
        async fn resolve(&self, kind: Entity, reference: &str) -> Result<Option<i32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(FhirflowError::Store(StoreError::LookupFailed(
                    "connection reset".to_string(),
                )));
            }
            Ok(self.ids.get(&(kind, reference.to_string())).copied())
        }
    }
}
