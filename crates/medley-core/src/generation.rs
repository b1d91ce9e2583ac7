//! Generation collaborator contract.

use async_trait::async_trait;

use crate::error::Result;
use crate::metering::MeteringTags;
use crate::operation::MediaPayload;

/// The downstream generation collaborator.
///
/// Each call accepts the correlation id minted by the invoker plus an opaque
/// metering tag set. Implementations perform no automatic retries; retrying
/// is at the caller's discretion.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generates a text completion for the prompt.
    async fn generate_text(
        &self,
        prompt: &str,
        correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<String>;

    /// Generates (or simulates) an image for the prompt.
    async fn generate_image(
        &self,
        prompt: &str,
        correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<MediaPayload>;

    /// Generates (or simulates) a song for the prompt.
    async fn generate_song(
        &self,
        prompt: &str,
        correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<MediaPayload>;

    /// Generates (or simulates) a video for the prompt.
    async fn generate_video(
        &self,
        prompt: &str,
        correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<MediaPayload>;
}
