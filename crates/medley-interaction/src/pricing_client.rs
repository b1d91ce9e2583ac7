//! HttpPricingService - REST client for the pricing/margin collaborator.
//!
//! The backend recomputes credit amounts from the metering data recorded
//! under a correlation id. It returns the amount as a string-typed number,
//! which is parsed here.

use async_trait::async_trait;
use medley_core::error::{MedleyError, Result};
use medley_core::pricing::PricingService;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// REST implementation of the pricing collaborator contract.
#[derive(Clone)]
pub struct HttpPricingService {
    client: Client,
    base_url: String,
}

impl HttpPricingService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Loads the endpoint from `MEDLEY_PRICING_URL`.
    pub fn try_from_env() -> Result<Self> {
        let base_url = std::env::var("MEDLEY_PRICING_URL")
            .map_err(|_| MedleyError::config("MEDLEY_PRICING_URL is not set"))?;
        Ok(Self::new(base_url))
    }

    async fn post_margin(&self, url: String, body: &MarginRequest) -> Result<f64> {
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| MedleyError::pricing(format!("margin request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(MedleyError::pricing(format!(
                "margin endpoint returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let parsed: MarginResponse = response
            .json()
            .await
            .map_err(|err| MedleyError::pricing(format!("malformed margin response: {err}")))?;

        let credits = parse_credit_amount(&parsed.credit_amount)?;
        debug!(%url, credits, "margin pricing resolved");
        Ok(credits)
    }
}

#[async_trait]
impl PricingService for HttpPricingService {
    async fn apply_margin(&self, correlation_id: &str, margin_percent: f64) -> Result<f64> {
        let url = format!("{}/margin/{}", self.base_url, correlation_id);
        self.post_margin(
            url,
            &MarginRequest {
                margin_percent,
                batch_id: None,
            },
        )
        .await
    }

    async fn apply_batch_margin(
        &self,
        correlation_id: &str,
        batch_id: &str,
        margin_percent: f64,
    ) -> Result<f64> {
        let url = format!("{}/margin/batch/{}", self.base_url, correlation_id);
        self.post_margin(
            url,
            &MarginRequest {
                margin_percent,
                batch_id: Some(batch_id.to_string()),
            },
        )
        .await
    }
}

#[derive(Serialize)]
struct MarginRequest {
    margin_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch_id: Option<String>,
}

#[derive(Deserialize)]
struct MarginResponse {
    credit_amount: String,
}

fn parse_credit_amount(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| MedleyError::pricing(format!("credit_amount is not a number: {raw:?}")))
}
