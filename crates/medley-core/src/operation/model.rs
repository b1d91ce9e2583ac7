//! Operation domain model.
//!
//! Every inbound request is classified into exactly one [`OperationKind`].
//! A single invocation of a downstream generator produces an
//! [`OperationResult`] carrying the payload and the correlation id used for
//! cost attribution; one or more of those are folded into an
//! [`AggregatedResult`] before the terminal status update is published.

use serde::{Deserialize, Serialize};
use serde_json::json;
use strum_macros::{Display, EnumString};

/// The billed operation kinds an inbound request can declare.
///
/// The serialized names are the wire-level `operationType` strings used by
/// clients and preserved in event metadata.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum OperationKind {
    #[strum(serialize = "gpt_text")]
    #[serde(rename = "gpt_text")]
    GptText,
    #[strum(serialize = "image_generation")]
    #[serde(rename = "image_generation")]
    ImageGeneration,
    #[strum(serialize = "song_generation")]
    #[serde(rename = "song_generation")]
    SongGeneration,
    #[strum(serialize = "video_generation")]
    #[serde(rename = "video_generation")]
    VideoGeneration,
    #[strum(serialize = "combined_generation")]
    #[serde(rename = "combined_generation")]
    CombinedGeneration,
    #[strum(serialize = "general")]
    #[serde(rename = "general")]
    General,
}

impl OperationKind {
    /// Resolves the caller-declared `operationType` field.
    ///
    /// The kind is taken verbatim; an absent or unrecognized value falls back
    /// to [`OperationKind::General`] rather than attempting content-based
    /// inference.
    pub fn from_wire(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(OperationKind::General)
    }

    /// Fixed base credit cost for this kind, before any margin adjustment.
    pub fn base_credits(self) -> f64 {
        match self {
            OperationKind::GptText => 5.0,
            OperationKind::ImageGeneration => 3.0,
            OperationKind::SongGeneration => 5.0,
            OperationKind::VideoGeneration => 0.5,
            OperationKind::CombinedGeneration => 2.0,
            OperationKind::General => 1.0,
        }
    }

    /// The operation name recorded in metering tags for this kind.
    pub fn metering_name(self) -> &'static str {
        match self {
            OperationKind::GptText => "gpt_completion",
            OperationKind::ImageGeneration => "simulated_image_generation",
            OperationKind::SongGeneration => "simulated_song_generation",
            OperationKind::VideoGeneration => "simulated_video_generation",
            OperationKind::CombinedGeneration => "combined_generation",
            OperationKind::General => "general",
        }
    }
}

/// An immutable, classified request for a single task.
///
/// Constructed once from the inbound message and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    /// The declared operation kind (falls back to `General`).
    pub kind: OperationKind,
    /// The user prompt text.
    pub prompt: String,
    /// Optional caller-supplied id reused as the batch id for combined
    /// requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_seed: Option<String>,
}

impl OperationRequest {
    pub fn new(kind: OperationKind, prompt: impl Into<String>) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
            correlation_seed: None,
        }
    }

    pub fn with_correlation_seed(mut self, seed: impl Into<String>) -> Self {
        self.correlation_seed = Some(seed.into());
        self
    }
}

/// Kind-specific structured data returned by a generation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaPayload {
    Text {
        content: String,
    },
    Image {
        url: String,
        width: u32,
        height: u32,
        pixels: u64,
    },
    Song {
        job_id: String,
        music_id: String,
        title: String,
        audio_url: String,
        duration_secs: u32,
    },
    Video {
        url: String,
        duration_secs: u32,
        aspect_ratio: String,
        mode: String,
        version: String,
    },
}

impl MediaPayload {
    /// Multi-line human-readable block used for single-operation summaries.
    pub fn summary(&self) -> String {
        match self {
            MediaPayload::Text { content } => format!("🤖 GPT Response:\n{}", content),
            MediaPayload::Image {
                url,
                width,
                height,
                pixels,
            } => format!(
                "🎨 Image Generated:\nSize: {}x{}\nURL: {}\nPixels: {}",
                width, height, url, pixels
            ),
            MediaPayload::Song {
                title,
                audio_url,
                duration_secs,
                ..
            } => format!(
                "🎵 Song Generated:\nTitle: {}\nDuration: {}s\nURL: {}",
                title, duration_secs, audio_url
            ),
            MediaPayload::Video {
                url,
                duration_secs,
                aspect_ratio,
                mode,
                ..
            } => format!(
                "🎬 Video Generated:\nDuration: {}s\nAspect Ratio: {}\nURL: {}\nMode: {}",
                duration_secs, aspect_ratio, url, mode
            ),
        }
    }

    /// One-line rendering used inside a combined summary.
    pub fn summary_line(&self) -> String {
        match self {
            MediaPayload::Text { content } => format!("🤖 GPT: {}", content),
            MediaPayload::Image { width, height, .. } => {
                format!("🎨 Image: {}x{}", width, height)
            }
            MediaPayload::Song {
                title,
                duration_secs,
                ..
            } => format!("🎵 Song: {} ({}s)", title, duration_secs),
            MediaPayload::Video {
                duration_secs,
                aspect_ratio,
                ..
            } => format!("🎬 Video: {}s ({})", duration_secs, aspect_ratio),
        }
    }
}

/// The outcome of one invoker call.
///
/// `correlation_id` is unique per invocation for the lifetime of the process
/// so that external cost reconciliation can be matched back to the
/// originating call. Instances are never mutated after construction; pricing
/// is attached by consuming the unpriced value via [`OperationResult::with_cost`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub payload: MediaPayload,
    pub correlation_id: String,
    pub credits_used: f64,
    pub margin_applied: bool,
}

impl OperationResult {
    /// Creates an unpriced result. The router attaches credits afterwards;
    /// sub-results of a combined batch intentionally stay at zero because the
    /// batch is billed once at aggregation.
    pub fn unpriced(payload: MediaPayload, correlation_id: impl Into<String>) -> Self {
        Self {
            payload,
            correlation_id: correlation_id.into(),
            credits_used: 0.0,
            margin_applied: false,
        }
    }

    /// Attaches the authoritative credit amount computed by the cost model.
    pub fn with_cost(mut self, credits_used: f64, margin_applied: bool) -> Self {
        self.credits_used = credits_used;
        self.margin_applied = margin_applied;
        self
    }
}

/// A single user-facing summary plus the metadata envelope for one task.
///
/// Constructed exactly once per task, after routing succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub summary_text: String,
    pub operation_type: OperationKind,
    pub total_credits: f64,
    /// Operation-specific metadata (request ids, payload data, batch id).
    pub metadata: serde_json::Value,
}

impl AggregatedResult {
    /// Wraps a single priced operation result.
    pub fn from_single(kind: OperationKind, result: &OperationResult) -> Self {
        Self {
            summary_text: result.payload.summary(),
            operation_type: kind,
            total_credits: result.credits_used,
            metadata: json!({
                "requestId": result.correlation_id,
                "data": result.payload,
            }),
        }
    }
}
