//! Task execution core for the Medley agent.
//!
//! Turns one inbound request into a deterministic sequence of metered
//! generation calls and publishes a well-formed lifecycle event stream:
//! a submitted task snapshot, then exactly one terminal status update.
//!
//! # Module Structure
//!
//! - `invoker`: wraps single generation calls with correlation ids and
//!   metering tags
//! - `router`: dispatches a request to its invoker(s), including the
//!   sequential combined batch
//! - `aggregator`: folds invoker results into the user-facing summary and
//!   metadata envelope
//! - `executor`: the task state machine and event-channel contract
//! - `event_bus`: tokio-mpsc [`EventChannel`] implementation
//!
//! [`EventChannel`]: medley_core::event::EventChannel

pub mod aggregator;
pub mod event_bus;
pub mod executor;
pub mod invoker;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;

pub use event_bus::{BusMessage, MpscEventChannel};
pub use executor::{RequestContext, TaskExecutor};
pub use invoker::OperationInvoker;
pub use router::TaskRouter;
