//! Simulated media generators.
//!
//! Image, song, and video generation are simulated: each returns structured
//! data synchronously with realistic shapes (fixed URL pools, randomized
//! durations). They never fail under normal operation, but return `Result`
//! so collaborator-level faults propagate like any other generation error.

use medley_core::error::Result;
use medley_core::operation::MediaPayload;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

const SIMULATED_IMAGE_URLS: &[&str] = &[
    "https://v3.fal.media/files/kangaroo/OyJfXujVSXxPby1bjYe--.png",
    "https://v3.fal.media/files/rabbit/iGjlnk6hZqq5LPtOOSdiu.png",
    "https://v3.fal.media/files/lion/sGrK0XLGX-V2-LOCMN6aW.png",
    "https://v3.fal.media/files/panda/VytitIH7qWYfrXzLvITxi.png",
    "https://v3.fal.media/files/panda/XJb6IFiXFUxxWvn6tyDBl.png",
    "https://v3.fal.media/files/zebra/7sNOX9UH0mLjndayQsIYw.png",
    "https://v3.fal.media/files/lion/Y5MynHlT3LFGUf-BrD6Dd.png",
    "https://v3.fal.media/files/rabbit/EmyU04RwnZGlODQt9z9WZ.png",
    "https://v3.fal.media/files/koala/9cnEfODPJLdoKLiM2_pND.png",
];

const SIMULATED_VIDEO_URLS: &[&str] = &[
    "https://download.samplelib.com/mp4/sample-5s.mp4",
    "https://download.samplelib.com/mp4/sample-10s.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4",
];

const SIMULATED_SONG_URL: &str = "https://download.samplelib.com/wav/sample-15s.wav";

const IMAGE_WIDTH: u32 = 1024;
const IMAGE_HEIGHT: u32 = 576;

const VIDEO_MODE: &str = "std";
const VIDEO_VERSION: &str = "1.6";

/// Simulated generator for image, song, and video payloads.
#[derive(Debug, Clone, Default)]
pub struct SimulatedMediaService;

impl SimulatedMediaService {
    pub fn new() -> Self {
        Self
    }

    /// Simulates image generation: a random URL from the pool at a fixed
    /// landscape size.
    pub fn generate_image(&self, prompt: &str) -> Result<MediaPayload> {
        debug!(prompt, "simulating image generation");
        let mut rng = rand::thread_rng();
        // The pool is non-empty, so choose cannot return None.
        let url = SIMULATED_IMAGE_URLS
            .choose(&mut rng)
            .copied()
            .unwrap_or(SIMULATED_IMAGE_URLS[0]);

        Ok(MediaPayload::Image {
            url: url.to_string(),
            width: IMAGE_WIDTH,
            height: IMAGE_HEIGHT,
            pixels: u64::from(IMAGE_WIDTH) * u64::from(IMAGE_HEIGHT),
        })
    }

    /// Simulates song generation: a random job id and a fixed 15s sample.
    pub fn generate_song(&self, prompt: &str) -> Result<MediaPayload> {
        debug!(prompt, "simulating song generation");
        let mut rng = rand::thread_rng();
        let job_id = format!("simulated-job-{}", rng.gen_range(0..1_000_000));

        Ok(MediaPayload::Song {
            music_id: format!("music-{job_id}"),
            job_id,
            title: "AI Generated Simulated Song".to_string(),
            audio_url: SIMULATED_SONG_URL.to_string(),
            duration_secs: 15,
        })
    }

    /// Simulates video generation: 5s or 10s, a random URL from the pool.
    pub fn generate_video(&self, prompt: &str) -> Result<MediaPayload> {
        let mut rng = rand::thread_rng();
        let duration_secs: u32 = if rng.gen_bool(0.5) { 5 } else { 10 };
        debug!(prompt, duration_secs, "simulating video generation");

        let url = SIMULATED_VIDEO_URLS
            .choose(&mut rng)
            .copied()
            .unwrap_or(SIMULATED_VIDEO_URLS[0]);

        Ok(MediaPayload::Video {
            url: url.to_string(),
            duration_secs,
            aspect_ratio: "16:9".to_string(),
            mode: VIDEO_MODE.to_string(),
            version: VIDEO_VERSION.to_string(),
        })
    }

    /// The model name recorded for a simulated video call.
    pub fn video_model_name(duration_secs: u32) -> String {
        format!("piapi/kling-v{VIDEO_VERSION}/text-to-video/{VIDEO_MODE}-{duration_secs}s")
    }
}
