//! Metering tags attached to every downstream generation call.
//!
//! These are passed opaquely to the generation collaborator so that the
//! external observability/billing service can attribute cost data back to
//! the originating call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AgentConfig;
use crate::operation::OperationKind;

/// The tag set sent alongside one generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteringTags {
    pub agent_id: String,
    /// Fresh per-call session identifier.
    pub session_id: String,
    pub plan_id: String,
    pub plan_type: String,
    /// Operation name as recorded by the metering backend.
    pub operation: String,
    /// Base credit amount declared for this operation.
    pub credit_amount: f64,
    pub credit_usd_rate: f64,
    /// `credit_amount * credit_usd_rate`, precomputed for the backend.
    pub credit_price_usd: f64,
    pub margin_percent: f64,
    pub is_margin_based: bool,
    /// Batch id when this call is part of a combined request.
    pub batch_id: Option<String>,
    pub is_batch_request: bool,
}

impl MeteringTags {
    /// Builds the tag set for one invocation of `kind`.
    ///
    /// `batch_id` is set only for sub-operations of a combined request.
    pub fn for_operation(
        config: &AgentConfig,
        kind: OperationKind,
        batch_id: Option<String>,
    ) -> Self {
        let credit_amount = kind.base_credits();
        let margin_percent = config.effective_margin().unwrap_or(0.0);
        let is_batch_request = batch_id.is_some();

        Self {
            agent_id: config.agent_id.clone(),
            session_id: Uuid::new_v4().to_string(),
            plan_id: config.plan_id.clone(),
            plan_type: config.plan_type.clone(),
            operation: kind.metering_name().to_string(),
            credit_amount,
            credit_usd_rate: config.credit_usd_rate,
            credit_price_usd: credit_amount * config.credit_usd_rate,
            margin_percent,
            is_margin_based: margin_percent > 0.0,
            batch_id,
            is_batch_request,
        }
    }
}
