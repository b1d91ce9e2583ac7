//! Operation domain module.
//!
//! Contains the billed operation kinds, the request/result value objects that
//! flow through the task router, and the aggregated result shape published to
//! the event channel.

mod model;

// Re-export public API
pub use model::{AggregatedResult, MediaPayload, OperationKind, OperationRequest, OperationResult};
