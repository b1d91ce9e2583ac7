//! Outbound event channel contract.

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskStatusUpdate};

/// Events published for a single task, in order: one `Task` snapshot in the
/// submitted state, then exactly one terminal `StatusUpdate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskEvent {
    Task(Task),
    StatusUpdate(TaskStatusUpdate),
}

/// The outbound event channel owned by the protocol layer.
///
/// The executor calls `finished` exactly once per task, after the terminal
/// event. Publish failures are the transport's responsibility and must not
/// surface into task semantics.
pub trait EventChannel: Send + Sync {
    fn publish(&self, event: TaskEvent);

    /// Signals that no more updates will follow for the current task.
    fn finished(&self);
}
