//! Line source abstraction

use crate::domain::{Entity, Result, SourceError};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Raw lines of one entity's export, in source order, without their terminator
///
/// Lines are bytes; text decoding is left to the transformer so one bad line
/// only rejects that record. An `Err` item is a transport failure and ends the
/// stream for the pipeline.
pub type LineStream = BoxStream<'static, std::result::Result<Vec<u8>, SourceError>>;

/// Supplier of line-delimited JSON for each entity
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Opens the export for `entity`
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or refuses the request.
    async fn open(&self, entity: Entity) -> Result<LineStream>;
}
