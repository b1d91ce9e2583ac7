//! Pricing/margin collaborator contract.

use async_trait::async_trait;

use crate::error::Result;

/// The external pricing collaborator that recomputes credit amounts when a
/// margin is configured.
///
/// Failures from this service are always recovered locally by the cost model
/// (final credits fall back to zero); implementations should still return
/// honest errors so the condition can be logged.
#[async_trait]
pub trait PricingService: Send + Sync {
    /// Recomputes the credit amount for one call, applying `margin_percent`
    /// on top of the metered cost recorded under `correlation_id`.
    async fn apply_margin(&self, correlation_id: &str, margin_percent: f64) -> Result<f64>;

    /// Batch-aware variant: recomputes the total credit amount for the batch
    /// anchored at `correlation_id`.
    async fn apply_batch_margin(
        &self,
        correlation_id: &str,
        batch_id: &str,
        margin_percent: f64,
    ) -> Result<f64>;
}
