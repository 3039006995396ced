//! NDJSON over HTTP
//!
//! Streams the response body through a newline-delimited byte codec so that memory
//! use is bounded by the longest line, not by the size of the export. Lines stay
//! raw bytes here; a line that is not valid UTF-8 is rejected by the transformer.

use super::traits::{LineStream, RecordSource};
use crate::config::{PipelineConfig, SourcesConfig};
use crate::domain::{Entity, FhirflowError, Result, SourceError};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use std::io;
use std::time::Duration;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead};
use tokio_util::io::StreamReader;

/// [`RecordSource`] that issues one streaming GET per entity
pub struct HttpSource {
    client: reqwest::Client,
    sources: SourcesConfig,
    max_line_bytes: usize,
}

impl HttpSource {
    /// Create a new HTTP source
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(sources: SourcesConfig, pipeline: &PipelineConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(pipeline.request_timeout_seconds))
            .user_agent(concat!("fhirflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                FhirflowError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            sources,
            max_line_bytes: pipeline.max_line_bytes,
        })
    }

    /// Streams the lines of `url`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not a success.
    pub async fn open_url(&self, url: &str) -> Result<LineStream> {
        let response = self.client.get(url).send().await.map_err(|e| {
            SourceError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        tracing::info!(url = %url, status = status.as_u16(), "Opened source stream");

        let body = response
            .bytes_stream()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
        let reader = StreamReader::new(body);
        let max_bytes = self.max_line_bytes;
        let owned_url = url.to_string();

        let codec =
            AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), b"\n".to_vec(), max_bytes);
        let lines = FramedRead::new(reader, codec).map(move |chunk| match chunk {
            Ok(bytes) => Ok(strip_carriage_return(bytes.to_vec())),
            Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => Err(SourceError::LineTooLong {
                url: owned_url.clone(),
                max_bytes,
            }),
            Err(AnyDelimiterCodecError::Io(io_err)) => Err(SourceError::ReadFailed {
                url: owned_url.clone(),
                message: io_err.to_string(),
            }),
        });

        Ok(lines.boxed())
    }
}

fn strip_carriage_return(mut line: Vec<u8>) -> Vec<u8> {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    line
}

#[async_trait]
impl RecordSource for HttpSource {
    async fn open(&self, entity: Entity) -> Result<LineStream> {
        self.open_url(self.sources.url_for(entity)).await
    }
}
