//! Task executor.
//!
//! Owns the task state machine and the event-channel contract: one submitted
//! snapshot is published before any routing work, then exactly one terminal
//! status update (`completed` or `failed`) followed by a single `finished`
//! signal, regardless of how execution ends.

use std::sync::Arc;

use medley_core::config::AgentConfig;
use medley_core::error::{MedleyError, Result};
use medley_core::event::{EventChannel, TaskEvent};
use medley_core::generation::GenerationService;
use medley_core::operation::{AggregatedResult, OperationKind, OperationRequest};
use medley_core::pricing::PricingService;
use medley_core::task::{AuthContext, Message, Task, TaskState, TaskStatusUpdate};
use serde_json::json;
use tracing::{error, info, warn};

use crate::router::TaskRouter;

/// The inbound request, already shaped by the protocol layer.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub task_id: String,
    pub context_id: String,
    /// The triggering user message.
    pub message: Message,
    /// Caller-declared operation classification, taken verbatim.
    pub operation_type: Option<String>,
    /// Optional bearer/authorization token from the inbound message.
    pub bearer_token: Option<String>,
    /// Pre-validated authorization context injected by the protocol layer.
    /// Must be present before billing-sensitive work proceeds.
    pub auth: Option<AuthContext>,
    /// The task found for this id, if any; `None` creates a new one.
    pub existing_task: Option<Task>,
}

impl RequestContext {
    pub fn new(
        task_id: impl Into<String>,
        context_id: impl Into<String>,
        message: Message,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
            message,
            operation_type: None,
            bearer_token: None,
            auth: None,
            existing_task: None,
        }
    }

    pub fn with_operation_type(mut self, operation_type: impl Into<String>) -> Self {
        self.operation_type = Some(operation_type.into());
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_auth(mut self, auth: AuthContext) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_existing_task(mut self, task: Task) -> Self {
        self.existing_task = Some(task);
        self
    }

    /// The access token with any `Bearer ` prefix stripped.
    pub fn access_token(&self) -> Option<&str> {
        self.bearer_token
            .as_deref()
            .map(|token| token.strip_prefix("Bearer ").unwrap_or(token))
    }
}

/// Executes one task end to end and publishes its lifecycle events.
pub struct TaskExecutor {
    config: Arc<AgentConfig>,
    router: TaskRouter,
}

impl TaskExecutor {
    pub fn new(
        config: Arc<AgentConfig>,
        generation: Arc<dyn GenerationService>,
        pricing: Arc<dyn PricingService>,
    ) -> Self {
        Self {
            router: TaskRouter::new(config.clone(), generation, pricing),
            config,
        }
    }

    /// Runs the full lifecycle for one request.
    ///
    /// Publishes the submitted task snapshot synchronously before routing,
    /// then exactly one terminal update and one `finished` signal. A request
    /// for an already-terminal task publishes nothing.
    pub async fn execute(&self, ctx: RequestContext, events: &dyn EventChannel) {
        let mut task = match ctx.existing_task.clone() {
            Some(task) if task.is_terminal() => {
                warn!(
                    task_id = %task.id,
                    state = ?task.state,
                    "ignoring request for terminal task"
                );
                return;
            }
            Some(mut task) => {
                task.append_history(ctx.message.clone());
                task
            }
            None => Task::new(&ctx.task_id, &ctx.context_id, ctx.message.clone()),
        };

        events.publish(TaskEvent::Task(task.clone()));
        if let Err(err) = task.transition(TaskState::Working) {
            error!(task_id = %task.id, error = %err, "failed to mark task as working");
        }

        let update = match self.run(&ctx).await {
            Ok(aggregated) => {
                info!(
                    task_id = %task.id,
                    operation = %aggregated.operation_type,
                    credits = aggregated.total_credits,
                    "task completed"
                );
                let _ = task.transition(TaskState::Completed);
                self.completed_update(&task, aggregated)
            }
            Err(err) => {
                error!(task_id = %task.id, error = %err, "task failed");
                let _ = task.transition(TaskState::Failed);
                self.failed_update(&task, &err)
            }
        };

        events.publish(TaskEvent::StatusUpdate(update));
        events.finished();
    }

    /// Accepts a cancellation request. Advisory only: in-flight
    /// sub-operations are not aborted.
    pub fn cancel(&self, task_id: &str) {
        info!(task_id, "cancellation requested (advisory, not aborting)");
    }

    /// Validates the request and routes it.
    async fn run(&self, ctx: &RequestContext) -> Result<AggregatedResult> {
        if ctx.auth.is_none() {
            return Err(MedleyError::validation(
                "authorization context missing from inbound message",
            ));
        }

        let kind = OperationKind::from_wire(ctx.operation_type.as_deref());
        let request = OperationRequest::new(kind, ctx.message.text.clone());
        self.router.route(&request).await
    }

    fn completed_update(&self, task: &Task, aggregated: AggregatedResult) -> TaskStatusUpdate {
        let mut metadata = json!({
            "creditsUsed": aggregated.total_credits,
            "planId": self.config.plan_id,
            "operationType": aggregated.operation_type.to_string(),
        });
        merge_metadata(&mut metadata, &aggregated.metadata);

        TaskStatusUpdate::terminal(
            task,
            TaskState::Completed,
            Message::agent(aggregated.summary_text),
            metadata,
        )
    }

    fn failed_update(&self, task: &Task, err: &MedleyError) -> TaskStatusUpdate {
        let metadata = json!({
            "errorType": err.error_type(),
            "planId": self.config.plan_id,
        });

        TaskStatusUpdate::terminal(
            task,
            TaskState::Failed,
            Message::agent(format!("Error: {err}")),
            metadata,
        )
    }
}

/// Merges the aggregate's metadata object into the base event metadata.
fn merge_metadata(base: &mut serde_json::Value, extra: &serde_json::Value) {
    if let (Some(base_map), Some(extra_map)) = (base.as_object_mut(), extra.as_object()) {
        for (key, value) in extra_map {
            base_map.insert(key.clone(), value.clone());
        }
    }
}
