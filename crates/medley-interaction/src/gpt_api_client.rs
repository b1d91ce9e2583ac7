//! GptApiClient - Direct REST API implementation for chat completion.
//!
//! This client calls an OpenAI-compatible `/chat/completions` endpoint. The
//! correlation id and metering tags are forwarded as request headers so the
//! observability backend can attribute the call.

use medley_core::error::{MedleyError, Result};
use medley_core::metering::MeteringTags;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const SYSTEM_PROMPT: &str =
    "You are a simulacrum of a mind that provides concise and creative responses.";

/// Client for the text-generation collaborator.
#[derive(Clone)]
pub struct GptApiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GptApiClient {
    /// Creates a new client with the provided API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Loads the API key from `MEDLEY_OPENAI_API_KEY`.
    pub fn try_from_env() -> Result<Self> {
        let api_key = std::env::var("MEDLEY_OPENAI_API_KEY")
            .map_err(|_| MedleyError::config("MEDLEY_OPENAI_API_KEY is not set"))?;
        let mut client = Self::new(api_key);
        if let Ok(base_url) = std::env::var("MEDLEY_OPENAI_BASE_URL") {
            client.base_url = base_url;
        }
        Ok(client)
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the endpoint base URL (used by tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Runs one chat completion for the prompt.
    pub async fn complete(
        &self,
        prompt: &str,
        correlation_id: &str,
        tags: &MeteringTags,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.7,
            max_tokens: 500,
        };

        let properties = serde_json::to_string(tags)?;
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("X-Request-Id", correlation_id)
            .header("X-Metering-Properties", properties)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                MedleyError::generation("gpt_text", format!("chat completion request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            MedleyError::generation("gpt_text", format!("failed to parse completion: {err}"))
        })?;

        extract_content(parsed)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn extract_content(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .and_then(|mut choices| {
            if choices.is_empty() {
                None
            } else {
                choices.swap_remove(0).message
            }
        })
        .and_then(|message| message.content)
        .ok_or_else(|| MedleyError::generation("gpt_text", "completion contained no content"))
}

fn map_http_error(status: StatusCode, body: String) -> MedleyError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .unwrap_or(body);
    MedleyError::generation("gpt_text", format!("HTTP {}: {}", status.as_u16(), message))
}
