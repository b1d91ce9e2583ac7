//! Collaborator implementations for the Medley agent.
//!
//! - [`GptApiClient`]: chat-completion client for the text operation
//! - [`SimulatedMediaService`]: simulated image/song/video generators
//! - [`MedleyGenerationService`]: composed [`GenerationService`] implementation
//! - [`HttpPricingService`]: REST client for the pricing/margin collaborator
//!
//! [`GenerationService`]: medley_core::generation::GenerationService

mod generation;
mod gpt_api_client;
mod pricing_client;
mod simulated_media;

pub use generation::MedleyGenerationService;
pub use gpt_api_client::GptApiClient;
pub use pricing_client::HttpPricingService;
pub use simulated_media::SimulatedMediaService;
