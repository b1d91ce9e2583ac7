//! Core domain types for the Medley metered generation agent.
//!
//! This crate defines the task and operation models, the shared error type,
//! the agent configuration, and the collaborator contracts (generation,
//! pricing, event channel) consumed by `medley-execution`.

pub mod config;
pub mod cost;
pub mod error;
pub mod event;
pub mod generation;
pub mod metering;
pub mod operation;
pub mod pricing;
pub mod task;

// Re-export common error type
pub use error::MedleyError;
