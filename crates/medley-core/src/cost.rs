//! Cost model.
//!
//! The single source of truth for pricing. Invokers never carry pricing
//! parameters; the router asks the cost model once per operation (or once per
//! combined batch) after the metered call has been made.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::pricing::PricingService;

/// Computes final credit amounts, optionally margin-adjusted by the external
/// pricing collaborator.
pub struct CostModel {
    pricing: Arc<dyn PricingService>,
}

impl CostModel {
    pub fn new(pricing: Arc<dyn PricingService>) -> Self {
        Self { pricing }
    }

    /// Final credits for a single operation.
    ///
    /// With no margin (or a non-positive one) the base amount is returned
    /// exactly. With a positive margin the pricing collaborator's value is
    /// authoritative; if it fails, final credits fall back to `0.0` and the
    /// failure is logged. Cost adjustment must never fail content delivery.
    pub async fn operation_cost(
        &self,
        base_credits: f64,
        correlation_id: &str,
        margin_percent: Option<f64>,
    ) -> f64 {
        let Some(margin) = margin_percent.filter(|m| *m > 0.0) else {
            return base_credits;
        };

        match self.pricing.apply_margin(correlation_id, margin).await {
            Ok(credits) => {
                debug!(correlation_id, margin, credits, "applied margin pricing");
                credits
            }
            Err(err) => {
                warn!(
                    correlation_id,
                    margin,
                    error = %err,
                    "margin pricing failed; defaulting final credits to 0"
                );
                0.0
            }
        }
    }

    /// Final total credits for a combined batch, computed once against the
    /// batch's billing anchor (the first sub-operation's correlation id).
    ///
    /// Same fallback policy as [`CostModel::operation_cost`].
    pub async fn batch_cost(
        &self,
        base_credits: f64,
        anchor_correlation_id: &str,
        batch_id: &str,
        margin_percent: Option<f64>,
    ) -> f64 {
        let Some(margin) = margin_percent.filter(|m| *m > 0.0) else {
            return base_credits;
        };

        match self
            .pricing
            .apply_batch_margin(anchor_correlation_id, batch_id, margin)
            .await
        {
            Ok(credits) => {
                debug!(
                    anchor_correlation_id,
                    batch_id, margin, credits, "applied batch margin pricing"
                );
                credits
            }
            Err(err) => {
                warn!(
                    anchor_correlation_id,
                    batch_id,
                    margin,
                    error = %err,
                    "batch margin pricing failed; defaulting total credits to 0"
                );
                0.0
            }
        }
    }
}
