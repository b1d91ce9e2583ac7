//! Task router.
//!
//! Dispatches a classified request to the matching invoker(s) and prices the
//! outcome. Combined requests run their four sub-operations sequentially in a
//! fixed order; a failure aborts the remaining invocations and carries the
//! partial results for diagnostics only.

use std::sync::Arc;

use medley_core::config::AgentConfig;
use medley_core::cost::CostModel;
use medley_core::error::{MedleyError, Result};
use medley_core::generation::GenerationService;
use medley_core::operation::{
    AggregatedResult, OperationKind, OperationRequest, OperationResult,
};
use medley_core::pricing::PricingService;
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregator;
use crate::invoker::OperationInvoker;

/// Routes one request to its invoker(s) and aggregates the outcome.
pub struct TaskRouter {
    config: Arc<AgentConfig>,
    invoker: OperationInvoker,
    cost: CostModel,
}

impl TaskRouter {
    pub fn new(
        config: Arc<AgentConfig>,
        generation: Arc<dyn GenerationService>,
        pricing: Arc<dyn PricingService>,
    ) -> Self {
        Self {
            invoker: OperationInvoker::new(config.clone(), generation),
            cost: CostModel::new(pricing),
            config,
        }
    }

    /// Dispatches on the declared operation kind.
    pub async fn route(&self, request: &OperationRequest) -> Result<AggregatedResult> {
        info!(kind = %request.kind, "routing request");
        let seed = request.correlation_seed.as_deref();

        match request.kind {
            OperationKind::GptText => {
                let result = self.invoker.invoke_text(&request.prompt, seed, None).await?;
                Ok(self.price_single(OperationKind::GptText, result).await)
            }
            OperationKind::ImageGeneration => {
                let result = self
                    .invoker
                    .invoke_image(&request.prompt, seed, None)
                    .await?;
                Ok(self.price_single(OperationKind::ImageGeneration, result).await)
            }
            OperationKind::SongGeneration => {
                let result = self.invoker.invoke_song(&request.prompt, seed, None).await?;
                Ok(self.price_single(OperationKind::SongGeneration, result).await)
            }
            OperationKind::VideoGeneration => {
                let result = self
                    .invoker
                    .invoke_video(&request.prompt, seed, None)
                    .await?;
                Ok(self.price_single(OperationKind::VideoGeneration, result).await)
            }
            OperationKind::CombinedGeneration => self.route_combined(request).await,
            OperationKind::General => Ok(aggregator::general_response(&request.prompt)),
        }
    }

    /// Prices a single-operation result and wraps it.
    async fn price_single(&self, kind: OperationKind, result: OperationResult) -> AggregatedResult {
        let margin = self.config.effective_margin();
        let credits = self
            .cost
            .operation_cost(kind.base_credits(), &result.correlation_id, margin)
            .await;
        let result = result.with_cost(credits, margin.is_some());
        AggregatedResult::from_single(kind, &result)
    }

    /// Runs text, image, song, video in that fixed order, sequentially.
    ///
    /// Sequential execution is load-bearing: the batch is billed against the
    /// first sub-operation's correlation id after its metering data exists,
    /// and no sub-operation may start once a prior one has failed.
    async fn route_combined(&self, request: &OperationRequest) -> Result<AggregatedResult> {
        let batch_id = request
            .correlation_seed
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let prompt = &request.prompt;
        let mut results: Vec<OperationResult> = Vec::with_capacity(4);

        let text = match self
            .invoker
            .invoke_text(prompt, None, Some(batch_id.clone()))
            .await
        {
            Ok(result) => result,
            Err(err) => return Err(abort_combined(err, results)),
        };
        // The text call anchors batch billing.
        let anchor = text.correlation_id.clone();
        results.push(text);

        match self
            .invoker
            .invoke_image(prompt, None, Some(batch_id.clone()))
            .await
        {
            Ok(result) => results.push(result),
            Err(err) => return Err(abort_combined(err, results)),
        }

        match self
            .invoker
            .invoke_song(prompt, None, Some(batch_id.clone()))
            .await
        {
            Ok(result) => results.push(result),
            Err(err) => return Err(abort_combined(err, results)),
        }

        match self
            .invoker
            .invoke_video(prompt, None, Some(batch_id.clone()))
            .await
        {
            Ok(result) => results.push(result),
            Err(err) => return Err(abort_combined(err, results)),
        }

        let total_credits = self
            .cost
            .batch_cost(
                OperationKind::CombinedGeneration.base_credits(),
                &anchor,
                &batch_id,
                self.config.effective_margin(),
            )
            .await;

        Ok(aggregator::aggregate_combined(&results, total_credits, &batch_id))
    }
}

/// Converts a sub-operation failure into the combined error, keeping the
/// results obtained so far. They are diagnostic only and never billed.
fn abort_combined(err: MedleyError, partial: Vec<OperationResult>) -> MedleyError {
    warn!(
        error = %err,
        completed = partial.len(),
        "combined generation aborted"
    );
    MedleyError::CombinedGeneration {
        message: err.to_string(),
        partial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockGenerationService, MockPricingService};
    use medley_core::operation::MediaPayload;

    fn router(
        generation: Arc<MockGenerationService>,
        pricing: Arc<MockPricingService>,
        margin: Option<f64>,
    ) -> TaskRouter {
        let mut config = AgentConfig::new("agent-test");
        config.margin_percent = margin;
        TaskRouter::new(Arc::new(config), generation, pricing)
    }

    #[tokio::test]
    async fn test_single_kind_calls_exactly_one_invoker() {
        let generation = Arc::new(MockGenerationService::new());
        let pricing = Arc::new(MockPricingService::returning(0.0));
        let router = router(generation.clone(), pricing, None);

        let request = OperationRequest::new(OperationKind::GptText, "Write a haiku about AI");
        let agg = router.route(&request).await.unwrap();

        assert_eq!(generation.calls(), ["text"]);
        assert_eq!(agg.operation_type, OperationKind::GptText);
        assert_eq!(agg.total_credits, 5.0);
    }

    #[tokio::test]
    async fn test_margin_credits_come_from_collaborator() {
        let generation = Arc::new(MockGenerationService::new());
        let pricing = Arc::new(MockPricingService::returning(42.5));
        let router = router(generation, pricing, Some(20.0));

        let request = OperationRequest::new(OperationKind::VideoGeneration, "a clip");
        let agg = router.route(&request).await.unwrap();

        // Independent of the 0.5 base for video.
        assert_eq!(agg.total_credits, 42.5);
    }

    #[tokio::test]
    async fn test_pricing_failure_never_fails_the_task() {
        let generation = Arc::new(MockGenerationService::new());
        let pricing = Arc::new(MockPricingService::failing());
        let router = router(generation, pricing, Some(20.0));

        let request = OperationRequest::new(OperationKind::ImageGeneration, "a cat");
        let agg = router.route(&request).await.unwrap();
        assert_eq!(agg.total_credits, 0.0);
    }

    #[tokio::test]
    async fn test_combined_invokes_in_fixed_order() {
        let generation = Arc::new(MockGenerationService::new());
        let pricing = Arc::new(MockPricingService::returning(0.0));
        let router = router(generation.clone(), pricing, None);

        let request = OperationRequest::new(OperationKind::CombinedGeneration, "a music video");
        let agg = router.route(&request).await.unwrap();

        assert_eq!(generation.calls(), ["text", "image", "song", "video"]);
        assert_eq!(agg.total_credits, 2.0);
        assert!(agg.metadata["results"]["gpt"]["requestId"].is_string());
    }

    #[tokio::test]
    async fn test_combined_aborts_after_song_failure() {
        let generation = Arc::new(MockGenerationService::new().fail_song());
        let pricing = Arc::new(MockPricingService::returning(0.0));
        let router = router(generation.clone(), pricing.clone(), None);

        let request = OperationRequest::new(OperationKind::CombinedGeneration, "a music video");
        let err = router.route(&request).await.unwrap_err();

        // Video was never started.
        assert_eq!(generation.calls(), ["text", "image", "song"]);
        let partial = err.partial_results().unwrap();
        assert_eq!(partial.len(), 2);
        assert!(matches!(partial[0].payload, MediaPayload::Text { .. }));
        assert!(matches!(partial[1].payload, MediaPayload::Image { .. }));
        // Partial results stay unbilled.
        assert!(partial.iter().all(|r| r.credits_used == 0.0));
        // No batch pricing was attempted for the aborted batch.
        assert!(pricing.batch_calls().is_empty());
    }

    #[tokio::test]
    async fn test_combined_batch_cost_keys_off_text_anchor() {
        let generation = Arc::new(MockGenerationService::new());
        let pricing = Arc::new(MockPricingService::returning(9.0));
        let router = router(generation, pricing.clone(), Some(10.0));

        let request = OperationRequest::new(OperationKind::CombinedGeneration, "a music video")
            .with_correlation_seed("batch-42");
        let agg = router.route(&request).await.unwrap();

        assert_eq!(agg.total_credits, 9.0);
        let batch_calls = pricing.batch_calls();
        assert_eq!(batch_calls.len(), 1);
        assert!(batch_calls[0].ends_with("/batch-42"));
        // The anchor is the text sub-result's correlation id.
        let anchor = agg.metadata["results"]["gpt"]["requestId"].as_str().unwrap();
        assert!(batch_calls[0].starts_with(anchor));
    }

    #[tokio::test]
    async fn test_general_kind_invokes_nothing() {
        let generation = Arc::new(MockGenerationService::new());
        let pricing = Arc::new(MockPricingService::returning(0.0));
        let router = router(generation.clone(), pricing, None);

        let request = OperationRequest::new(OperationKind::General, "hello there");
        let agg = router.route(&request).await.unwrap();

        assert!(generation.calls().is_empty());
        assert_eq!(agg.operation_type, OperationKind::General);
        assert_eq!(agg.total_credits, 1.0);
    }
}
