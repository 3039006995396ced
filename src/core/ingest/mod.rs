//! Entity ingest pipeline
//!
//! One pipeline per entity: a producer feeds raw lines into a bounded queue, a pool
//! of workers transforms them into rows, and an accumulator flushes the rows to the
//! store in bulk. The [`IngestCoordinator`] runs the pipelines in dependency order.

pub mod accumulator;
pub mod coordinator;
pub mod producer;
pub mod summary;
pub mod tracker;
pub mod worker;

pub use accumulator::{run_flush_loop, BatchAccumulator};
pub use coordinator::IngestCoordinator;
pub use producer::{run_producer, ProducerOutcome};
pub use summary::{EntityFailure, EntityReport, IngestSummary};
pub use tracker::{DrainTracker, WorkTicket};
pub use worker::{QueueItem, SharedReceiver, Worker, WorkerCounters};
