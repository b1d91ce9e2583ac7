//! Result aggregation.
//!
//! Merges one or more invoker results into the single user-facing summary and
//! metadata envelope carried by the terminal status update. Single-operation
//! wrapping lives on [`AggregatedResult::from_single`]; this module owns the
//! combined and general shapes.

use medley_core::operation::{AggregatedResult, MediaPayload, OperationKind, OperationResult};
use serde_json::json;

/// Builds the aggregate for a completed combined batch.
///
/// The summary concatenates one line per sub-operation in invocation order.
/// `total_credits` is the batch cost computed once against the billing
/// anchor, not the sum of per-kind costs; metadata keeps each sub-result's
/// correlation id so external reconciliation can match every call.
pub fn aggregate_combined(
    results: &[OperationResult],
    total_credits: f64,
    batch_id: &str,
) -> AggregatedResult {
    let lines: Vec<String> = results
        .iter()
        .map(|result| result.payload.summary_line())
        .collect();
    let summary_text = format!("🎯 Combined Generation Complete:\n\n{}", lines.join("\n\n"));

    let mut entries = serde_json::Map::new();
    for result in results {
        entries.insert(
            result_key(&result.payload).to_string(),
            json!({
                "requestId": result.correlation_id,
                "data": result.payload,
            }),
        );
    }

    AggregatedResult {
        summary_text,
        operation_type: OperationKind::CombinedGeneration,
        total_credits,
        metadata: json!({
            "batchId": batch_id,
            "results": serde_json::Value::Object(entries),
        }),
    }
}

/// Builds the fixed informational response for general or unrecognized
/// requests. Nominal one-credit cost, no downstream invocation.
pub fn general_response(prompt: &str) -> AggregatedResult {
    let summary_text = format!(
        "🔍 Medley Agent received: \"{prompt}\"\n\n\
         I can help you with:\n\
         • GPT text generation\n\
         • Image generation simulation\n\
         • Song generation simulation\n\
         • Video generation simulation\n\
         • Combined multimedia generation\n\n\
         All operations are metered per request."
    );

    AggregatedResult {
        summary_text,
        operation_type: OperationKind::General,
        total_credits: OperationKind::General.base_credits(),
        metadata: json!({ "prompt": prompt }),
    }
}

/// Metadata key for one sub-result of a combined batch.
fn result_key(payload: &MediaPayload) -> &'static str {
    match payload {
        MediaPayload::Text { .. } => "gpt",
        MediaPayload::Image { .. } => "image",
        MediaPayload::Song { .. } => "song",
        MediaPayload::Video { .. } => "video",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_results() -> Vec<OperationResult> {
        vec![
            OperationResult::unpriced(
                MediaPayload::Text {
                    content: "a haiku".to_string(),
                },
                "req-text",
            ),
            OperationResult::unpriced(
                MediaPayload::Image {
                    url: "https://example.com/i.png".to_string(),
                    width: 1024,
                    height: 576,
                    pixels: 589_824,
                },
                "req-image",
            ),
            OperationResult::unpriced(
                MediaPayload::Song {
                    job_id: "job-1".to_string(),
                    music_id: "music-job-1".to_string(),
                    title: "Song".to_string(),
                    audio_url: "https://example.com/s.wav".to_string(),
                    duration_secs: 15,
                },
                "req-song",
            ),
            OperationResult::unpriced(
                MediaPayload::Video {
                    url: "https://example.com/v.mp4".to_string(),
                    duration_secs: 5,
                    aspect_ratio: "16:9".to_string(),
                    mode: "std".to_string(),
                    version: "1.6".to_string(),
                },
                "req-video",
            ),
        ]
    }

    #[test]
    fn test_combined_summary_preserves_invocation_order() {
        let agg = aggregate_combined(&sample_results(), 2.0, "batch-1");

        let gpt = agg.summary_text.find("🤖 GPT").unwrap();
        let image = agg.summary_text.find("🎨 Image").unwrap();
        let song = agg.summary_text.find("🎵 Song").unwrap();
        let video = agg.summary_text.find("🎬 Video").unwrap();
        assert!(gpt < image && image < song && song < video);
    }

    #[test]
    fn test_combined_metadata_maps_each_kind_to_request_id() {
        let agg = aggregate_combined(&sample_results(), 2.0, "batch-1");

        assert_eq!(agg.metadata["batchId"], "batch-1");
        assert_eq!(agg.metadata["results"]["gpt"]["requestId"], "req-text");
        assert_eq!(agg.metadata["results"]["image"]["requestId"], "req-image");
        assert_eq!(agg.metadata["results"]["song"]["requestId"], "req-song");
        assert_eq!(agg.metadata["results"]["video"]["requestId"], "req-video");
        assert_eq!(agg.total_credits, 2.0);
    }

    #[test]
    fn test_general_response_costs_one_credit() {
        let agg = general_response("what can you do?");
        assert_eq!(agg.operation_type, OperationKind::General);
        assert_eq!(agg.total_credits, 1.0);
        assert!(agg.summary_text.contains("what can you do?"));
    }
}
