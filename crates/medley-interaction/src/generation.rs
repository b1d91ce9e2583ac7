//! Composed generation collaborator.

use async_trait::async_trait;
use medley_core::error::Result;
use medley_core::generation::GenerationService;
use medley_core::metering::MeteringTags;
use medley_core::operation::MediaPayload;
use tracing::debug;

use crate::gpt_api_client::GptApiClient;
use crate::simulated_media::SimulatedMediaService;

/// Default [`GenerationService`] implementation: real chat completion for
/// text, simulated generators for image, song, and video.
pub struct MedleyGenerationService {
    gpt: GptApiClient,
    media: SimulatedMediaService,
}

impl MedleyGenerationService {
    pub fn new(gpt: GptApiClient) -> Self {
        Self {
            gpt,
            media: SimulatedMediaService::new(),
        }
    }

    /// Builds the service from process environment variables.
    pub fn try_from_env() -> Result<Self> {
        Ok(Self::new(GptApiClient::try_from_env()?))
    }
}

#[async_trait]
impl GenerationService for MedleyGenerationService {
    async fn generate_text(
        &self,
        prompt: &str,
        correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<String> {
        debug!(correlation_id, operation = %tags.operation, "dispatching text generation");
        self.gpt.complete(prompt, correlation_id, tags).await
    }

    async fn generate_image(
        &self,
        prompt: &str,
        correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<MediaPayload> {
        debug!(correlation_id, operation = %tags.operation, "dispatching image generation");
        self.media.generate_image(prompt)
    }

    async fn generate_song(
        &self,
        prompt: &str,
        correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<MediaPayload> {
        debug!(correlation_id, operation = %tags.operation, "dispatching song generation");
        self.media.generate_song(prompt)
    }

    async fn generate_video(
        &self,
        prompt: &str,
        correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<MediaPayload> {
        debug!(correlation_id, operation = %tags.operation, "dispatching video generation");
        self.media.generate_video(prompt)
    }
}
