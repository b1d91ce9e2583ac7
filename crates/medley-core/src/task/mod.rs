//! Task domain module.
//!
//! Contains the task entity, its state machine, and the status-update event
//! shape published on the event channel.
//!
//! # Module Structure
//!
//! - `model`: Core task domain models (`Task`, `TaskState`, `Message`,
//!   `TaskStatusUpdate`, `AuthContext`)

mod model;

// Re-export public API
pub use model::{AuthContext, Message, MessageRole, Task, TaskState, TaskStatusUpdate};
