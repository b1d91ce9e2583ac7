//! Operation invoker.
//!
//! Wraps a single generation call in a three-step pipeline: call the
//! collaborator, map the raw payload into the public [`OperationResult`]
//! shape, and record a usage unit for metering. Invokers are stateless and
//! carry no pricing parameters; the cost model prices results afterwards.

use std::sync::Arc;

use medley_core::config::AgentConfig;
use medley_core::error::Result;
use medley_core::generation::GenerationService;
use medley_core::metering::MeteringTags;
use medley_core::operation::{MediaPayload, OperationKind, OperationResult};
use tracing::{debug, info};
use uuid::Uuid;

/// Song usage is metered as a fixed quota per the simulated backend.
const SONG_USAGE_QUOTA: u64 = 6;

/// Invokes one generation operation per call, minting a correlation id and
/// attaching metering tags.
pub struct OperationInvoker {
    config: Arc<AgentConfig>,
    generation: Arc<dyn GenerationService>,
}

impl OperationInvoker {
    pub fn new(config: Arc<AgentConfig>, generation: Arc<dyn GenerationService>) -> Self {
        Self { config, generation }
    }

    /// Invokes the text operation.
    pub async fn invoke_text(
        &self,
        prompt: &str,
        supplied_id: Option<&str>,
        batch_id: Option<String>,
    ) -> Result<OperationResult> {
        let correlation_id = mint_correlation_id(supplied_id);
        let tags = MeteringTags::for_operation(&self.config, OperationKind::GptText, batch_id);
        info!(%correlation_id, "invoking text generation");

        let content = self
            .generation
            .generate_text(prompt, &correlation_id, &tags)
            .await?;
        let payload = MediaPayload::Text { content };

        Ok(self.finish(OperationKind::GptText, payload, correlation_id))
    }

    /// Invokes the image operation.
    pub async fn invoke_image(
        &self,
        prompt: &str,
        supplied_id: Option<&str>,
        batch_id: Option<String>,
    ) -> Result<OperationResult> {
        let correlation_id = mint_correlation_id(supplied_id);
        let tags =
            MeteringTags::for_operation(&self.config, OperationKind::ImageGeneration, batch_id);
        info!(%correlation_id, "invoking image generation");

        let payload = self
            .generation
            .generate_image(prompt, &correlation_id, &tags)
            .await?;

        Ok(self.finish(OperationKind::ImageGeneration, payload, correlation_id))
    }

    /// Invokes the song operation.
    pub async fn invoke_song(
        &self,
        prompt: &str,
        supplied_id: Option<&str>,
        batch_id: Option<String>,
    ) -> Result<OperationResult> {
        let correlation_id = mint_correlation_id(supplied_id);
        let tags =
            MeteringTags::for_operation(&self.config, OperationKind::SongGeneration, batch_id);
        info!(%correlation_id, "invoking song generation");

        let payload = self
            .generation
            .generate_song(prompt, &correlation_id, &tags)
            .await?;

        Ok(self.finish(OperationKind::SongGeneration, payload, correlation_id))
    }

    /// Invokes the video operation.
    pub async fn invoke_video(
        &self,
        prompt: &str,
        supplied_id: Option<&str>,
        batch_id: Option<String>,
    ) -> Result<OperationResult> {
        let correlation_id = mint_correlation_id(supplied_id);
        let tags =
            MeteringTags::for_operation(&self.config, OperationKind::VideoGeneration, batch_id);
        info!(%correlation_id, "invoking video generation");

        let payload = self
            .generation
            .generate_video(prompt, &correlation_id, &tags)
            .await?;

        Ok(self.finish(OperationKind::VideoGeneration, payload, correlation_id))
    }

    /// Step 2 and 3 of the pipeline: wrap the payload and record the usage
    /// unit for metering.
    fn finish(
        &self,
        kind: OperationKind,
        payload: MediaPayload,
        correlation_id: String,
    ) -> OperationResult {
        if let Some(units) = usage_units(&payload) {
            debug!(
                %correlation_id,
                operation = kind.metering_name(),
                usage_units = units,
                "recorded usage"
            );
        }
        OperationResult::unpriced(payload, correlation_id)
    }
}

/// Uses the caller-supplied id when present, otherwise mints a fresh v4 UUID.
/// Process-wide uniqueness of minted ids follows from UUID generation.
fn mint_correlation_id(supplied: Option<&str>) -> String {
    match supplied {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}

/// The usage unit reported for metering, where one is defined.
///
/// Text usage is token-counted by the backend itself, so no unit is reported
/// here.
fn usage_units(payload: &MediaPayload) -> Option<u64> {
    match payload {
        MediaPayload::Text { .. } => None,
        MediaPayload::Image { pixels, .. } => Some(*pixels),
        MediaPayload::Song { .. } => Some(SONG_USAGE_QUOTA),
        MediaPayload::Video { .. } => Some(1),
    }
}
