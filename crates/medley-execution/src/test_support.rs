//! Shared mock collaborators for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use medley_core::error::{MedleyError, Result};
use medley_core::event::{EventChannel, TaskEvent};
use medley_core::generation::GenerationService;
use medley_core::metering::MeteringTags;
use medley_core::operation::MediaPayload;
use medley_core::pricing::PricingService;
use medley_core::task::{AuthContext, TaskState, TaskStatusUpdate};

pub fn sample_auth() -> AuthContext {
    AuthContext {
        agreement_id: "agreement-1".to_string(),
        subscriber: "0xsubscriber".to_string(),
    }
}

/// Generation collaborator with per-kind failure injection and call
/// recording.
pub struct MockGenerationService {
    fail_text: bool,
    fail_image: bool,
    fail_song: bool,
    fail_video: bool,
    calls: Mutex<Vec<&'static str>>,
    last_tags: Mutex<Option<MeteringTags>>,
}

impl MockGenerationService {
    pub fn new() -> Self {
        Self {
            fail_text: false,
            fail_image: false,
            fail_song: false,
            fail_video: false,
            calls: Mutex::new(Vec::new()),
            last_tags: Mutex::new(None),
        }
    }

    pub fn fail_text(mut self) -> Self {
        self.fail_text = true;
        self
    }

    pub fn fail_song(mut self) -> Self {
        self.fail_song = true;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_tags(&self) -> Option<MeteringTags> {
        self.last_tags.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str, tags: &MeteringTags) {
        self.calls.lock().unwrap().push(name);
        *self.last_tags.lock().unwrap() = Some(tags.clone());
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    async fn generate_text(
        &self,
        prompt: &str,
        _correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<String> {
        self.record("text", tags);
        if self.fail_text {
            return Err(MedleyError::generation("gpt_text", "injected text failure"));
        }
        Ok(format!("echo: {prompt}"))
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        _correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<MediaPayload> {
        self.record("image", tags);
        if self.fail_image {
            return Err(MedleyError::generation(
                "image_generation",
                "injected image failure",
            ));
        }
        Ok(MediaPayload::Image {
            url: "https://example.com/image.png".to_string(),
            width: 1024,
            height: 576,
            pixels: 589_824,
        })
    }

    async fn generate_song(
        &self,
        _prompt: &str,
        _correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<MediaPayload> {
        self.record("song", tags);
        if self.fail_song {
            return Err(MedleyError::generation(
                "song_generation",
                "injected song failure",
            ));
        }
        Ok(MediaPayload::Song {
            job_id: "job-1".to_string(),
            music_id: "music-job-1".to_string(),
            title: "Mock Song".to_string(),
            audio_url: "https://example.com/song.wav".to_string(),
            duration_secs: 15,
        })
    }

    async fn generate_video(
        &self,
        _prompt: &str,
        _correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<MediaPayload> {
        self.record("video", tags);
        if self.fail_video {
            return Err(MedleyError::generation(
                "video_generation",
                "injected video failure",
            ));
        }
        Ok(MediaPayload::Video {
            url: "https://example.com/video.mp4".to_string(),
            duration_secs: 5,
            aspect_ratio: "16:9".to_string(),
            mode: "std".to_string(),
            version: "1.6".to_string(),
        })
    }
}

/// Pricing collaborator returning a fixed value or a fixed error.
pub struct MockPricingService {
    response: Result<f64>,
    batch_calls: Mutex<Vec<String>>,
}

impl MockPricingService {
    pub fn returning(credits: f64) -> Self {
        Self {
            response: Ok(credits),
            batch_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: Err(MedleyError::pricing("collaborator unavailable")),
            batch_calls: Mutex::new(Vec::new()),
        }
    }

    /// Batch calls recorded as `"{correlation_id}/{batch_id}"`.
    pub fn batch_calls(&self) -> Vec<String> {
        self.batch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PricingService for MockPricingService {
    async fn apply_margin(&self, _correlation_id: &str, _margin_percent: f64) -> Result<f64> {
        self.response.clone()
    }

    async fn apply_batch_margin(
        &self,
        correlation_id: &str,
        batch_id: &str,
        _margin_percent: f64,
    ) -> Result<f64> {
        self.batch_calls
            .lock()
            .unwrap()
            .push(format!("{correlation_id}/{batch_id}"));
        self.response.clone()
    }
}

/// Event channel that records everything published to it.
pub struct RecordingEventChannel {
    events: Mutex<Vec<TaskEvent>>,
    finished: Mutex<usize>,
}

impl RecordingEventChannel {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            finished: Mutex::new(0),
        }
    }

    pub fn events(&self) -> Vec<TaskEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn finished_count(&self) -> usize {
        *self.finished.lock().unwrap()
    }

    /// The single final status update, if one was published.
    pub fn terminal_update(&self) -> Option<TaskStatusUpdate> {
        self.events().into_iter().find_map(|event| match event {
            TaskEvent::StatusUpdate(update) if update.is_final => Some(update),
            _ => None,
        })
    }

    pub fn completed_updates(&self) -> Vec<TaskStatusUpdate> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TaskEvent::StatusUpdate(update) if update.state == TaskState::Completed => {
                    Some(update)
                }
                _ => None,
            })
            .collect()
    }
}

impl EventChannel for RecordingEventChannel {
    fn publish(&self, event: TaskEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn finished(&self) {
        *self.finished.lock().unwrap() += 1;
    }
}
