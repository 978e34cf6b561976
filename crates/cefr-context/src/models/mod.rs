//! Shared data model between the query service and the ingestion job
//!
//! The two services only meet at the vector index, so everything they agree
//! on about record shape lives here.

pub mod level;
pub mod record;

pub use level::{CefrLevel, Workflow};
pub use record::{IndexRecord, QueryMatch, RecordMetadata};
