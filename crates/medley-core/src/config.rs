//! Agent configuration.
//!
//! All identifiers and pricing knobs are resolved once at process start and
//! passed by reference into the router and invokers; core logic never reads
//! the environment directly.

use serde::{Deserialize, Serialize};

use crate::error::{MedleyError, Result};

/// Placeholder plan id used when none is configured.
const DEFAULT_PLAN_ID: &str = "plan:0000000000000000000000000000000000000000";

/// Configuration for the Medley agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Stable identity of this agent, recorded in metering tags.
    pub agent_id: String,
    /// Billing plan identifier, echoed in event metadata.
    pub plan_id: String,
    /// Billing plan type (e.g., `credit_based`).
    pub plan_type: String,
    /// Optional markup resolved by the pricing collaborator. `None` or a
    /// non-positive value means base costs apply unchanged.
    pub margin_percent: Option<f64>,
    /// USD conversion rate for one credit, recorded in metering tags.
    pub credit_usd_rate: f64,
}

impl AgentConfig {
    /// Creates a configuration with defaults for everything but the agent id.
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            plan_id: DEFAULT_PLAN_ID.to_string(),
            plan_type: "credit_based".to_string(),
            margin_percent: None,
            credit_usd_rate: 1.0,
        }
    }

    /// Builds the configuration from process environment variables.
    ///
    /// Reads `MEDLEY_AGENT_ID` (required), `MEDLEY_PLAN_ID`,
    /// `MEDLEY_PLAN_TYPE`, `MEDLEY_MARGIN_PERCENT` and
    /// `MEDLEY_CREDIT_USD_RATE` (all optional, with defaults).
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the agent id is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self> {
        let agent_id = std::env::var("MEDLEY_AGENT_ID")
            .map_err(|_| MedleyError::config("MEDLEY_AGENT_ID is not set"))?;

        let mut config = Self::new(agent_id);

        if let Ok(plan_id) = std::env::var("MEDLEY_PLAN_ID") {
            config.plan_id = plan_id;
        }
        if let Ok(plan_type) = std::env::var("MEDLEY_PLAN_TYPE") {
            config.plan_type = plan_type;
        }
        if let Ok(raw) = std::env::var("MEDLEY_MARGIN_PERCENT") {
            let value: f64 = raw.parse().map_err(|_| {
                MedleyError::config(format!("MEDLEY_MARGIN_PERCENT is not a number: {raw}"))
            })?;
            config.margin_percent = Some(value);
        }
        if let Ok(raw) = std::env::var("MEDLEY_CREDIT_USD_RATE") {
            config.credit_usd_rate = raw.parse().map_err(|_| {
                MedleyError::config(format!("MEDLEY_CREDIT_USD_RATE is not a number: {raw}"))
            })?;
        }

        Ok(config)
    }

    /// Sets the margin percent (builder style, used by tests and embedders).
    pub fn with_margin_percent(mut self, margin_percent: f64) -> Self {
        self.margin_percent = Some(margin_percent);
        self
    }

    /// The effective margin: `Some` only when configured and positive.
    pub fn effective_margin(&self) -> Option<f64> {
        self.margin_percent.filter(|m| *m > 0.0)
    }
}
