//! Task domain model.
//!
//! A task is created on first receipt of a request and moves through a small
//! state machine: `Submitted -> Working -> {Completed | Failed}`. The two
//! terminal states are absorbing; any further transition attempt is rejected.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MedleyError, Result};

/// Represents the current state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// The task has been received and acknowledged.
    Submitted,
    /// The task is being routed and executed. No event is emitted for this
    /// state; it exists only between the submitted snapshot and the terminal
    /// update.
    Working,
    /// The task completed successfully.
    Completed,
    /// The task failed during execution.
    Failed,
}

impl TaskState {
    /// Whether this state is terminal (no further mutation permitted).
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

/// The originator of a message within a task history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Agent,
}

/// A single message exchanged within a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub role: MessageRole,
    pub text: String,
}

impl Message {
    /// Creates a user message with a fresh message id.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            role: MessageRole::User,
            text: text.into(),
        }
    }

    /// Creates an agent message with a fresh message id.
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            role: MessageRole::Agent,
            text: text.into(),
        }
    }
}

/// Pre-validated authorization context attached to the inbound message by the
/// protocol layer.
///
/// The executor treats this as an opaque token: it only checks for presence
/// before any billing-sensitive work proceeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Identifier of the validated agreement/subscription.
    pub agreement_id: String,
    /// Address of the subscriber the agreement belongs to.
    pub subscriber: String,
}

/// A task moving through the execution lifecycle.
///
/// Mutated only by the task executor; `history` is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub context_id: String,
    pub state: TaskState,
    /// Ordered sequence of input messages, append-only.
    pub history: Vec<Message>,
    #[serde(default)]
    pub artifacts: Vec<serde_json::Value>,
    /// RFC3339 timestamp of the last state change.
    pub timestamp: String,
}

impl Task {
    /// Creates a new task in the `Submitted` state with the triggering
    /// message as the first history entry.
    pub fn new(id: impl Into<String>, context_id: impl Into<String>, message: Message) -> Self {
        Self {
            id: id.into(),
            context_id: context_id.into(),
            state: TaskState::Submitted,
            history: vec![message],
            artifacts: Vec::new(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Whether the task has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Appends an input message to the task history.
    pub fn append_history(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Moves the task to a new state.
    ///
    /// # Errors
    ///
    /// Returns an error if the task is already terminal.
    pub fn transition(&mut self, state: TaskState) -> Result<()> {
        if self.is_terminal() {
            return Err(MedleyError::internal(format!(
                "task {} is terminal ({:?}); cannot transition to {:?}",
                self.id, self.state, state
            )));
        }
        self.state = state;
        self.timestamp = Utc::now().to_rfc3339();
        Ok(())
    }
}

/// The status-update event published on the event channel.
///
/// Exactly one update with `is_final = true` is published per task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    pub task_id: String,
    pub context_id: String,
    pub state: TaskState,
    /// The agent-authored message carried by this update.
    pub message: Message,
    /// Marks the terminal update; no further events follow for this task.
    pub is_final: bool,
    /// Event metadata (credits, operation type, error type, ...).
    pub metadata: serde_json::Value,
    pub timestamp: String,
}

impl TaskStatusUpdate {
    /// Builds a terminal update for the given task.
    pub fn terminal(
        task: &Task,
        state: TaskState,
        message: Message,
        metadata: serde_json::Value,
    ) -> Self {
        debug_assert!(state.is_terminal());
        Self {
            task_id: task.id.clone(),
            context_id: task.context_id.clone(),
            state,
            message,
            is_final: true,
            metadata,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
