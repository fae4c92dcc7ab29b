//! Stable Diffusion via Replicate's predictions API.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::errors::BotError;

pub const REPLICATE_API_BASE: &str = "https://api.replicate.com";

/// stability-ai/stable-diffusion 2.1
pub const STABLE_DIFFUSION_V2_1: &str =
    "db21e45d3f7023abc2a46ee38a23973f6dce16bb082a930b0c49861f96d1e5bf";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(70);
const POLL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_POLLS: u32 = 120;

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

impl Prediction {
    fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }
}

pub struct ReplicateClient {
    http: Client,
    api_base: String,
    api_token: String,
    poll_interval: Duration,
}

impl ReplicateClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_token: String) -> Result<Self, BotError> {
        Self::with_api_base(REPLICATE_API_BASE.to_string(), api_token)
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_api_base(api_base: String, api_token: String) -> Result<Self, BotError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BotError::HttpError(format!("Failed to build Replicate client: {e}")))?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_token,
            poll_interval: POLL_INTERVAL,
        })
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Runs the model for `prompt` and waits for the output image URLs.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, a failed or
    /// canceled prediction, or when the prediction does not finish in time.
    pub async fn run_stable_diffusion(&self, prompt: &str) -> Result<Vec<String>, BotError> {
        let body = json!({
            "version": STABLE_DIFFUSION_V2_1,
            "input": { "prompt": prompt },
        });

        let response = self
            .http
            .post(format!("{}/v1/predictions", self.api_base))
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await?;
        let mut prediction = Self::read_prediction(response).await?;
        info!(prediction_id = %prediction.id, status = %prediction.status, "Prediction created");

        let mut polls = 0;
        while !prediction.is_terminal() {
            if polls >= MAX_POLLS {
                return Err(BotError::ImageError(format!(
                    "prediction {} still {} after {} polls",
                    prediction.id, prediction.status, polls
                )));
            }
            polls += 1;
            tokio::time::sleep(self.poll_interval).await;

            let get_url = prediction
                .urls
                .as_ref()
                .and_then(|u| u.get.clone())
                .unwrap_or_else(|| format!("{}/v1/predictions/{}", self.api_base, prediction.id));
            let response = self
                .http
                .get(get_url)
                .bearer_auth(&self.api_token)
                .send()
                .await?;
            prediction = Self::read_prediction(response).await?;
            debug!(prediction_id = %prediction.id, status = %prediction.status, "Polled prediction");
        }

        if prediction.status != "succeeded" {
            return Err(BotError::ImageError(format!(
                "prediction {} {}: {}",
                prediction.id,
                prediction.status,
                prediction
                    .error
                    .map_or_else(|| "no error detail".to_string(), |e| e.to_string())
            )));
        }

        Ok(output_urls(prediction.output.as_ref()))
    }

    async fn read_prediction(response: reqwest::Response) -> Result<Prediction, BotError> {
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
            return Err(BotError::ImageError(format!(
                "Replicate API error (status {status}): {text}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| BotError::ImageError(format!("Failed to parse prediction: {e}")))
    }
}

/// Predictions return either a list of URLs or a single URL.
fn output_urls(output: Option<&Value>) -> Vec<String> {
    match output {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect(),
        Some(Value::String(url)) => vec![url.clone()],
        other => {
            warn!(output = ?other, "Prediction succeeded without image URLs");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_urls_shapes() {
        let list = json!(["https://img/1.png", "https://img/2.png"]);
        assert_eq!(output_urls(Some(&list)).len(), 2);
        let single = json!("https://img/1.png");
        assert_eq!(output_urls(Some(&single)), vec!["https://img/1.png"]);
        assert!(output_urls(None).is_empty());
    }

    #[tokio::test]
    async fn test_polls_until_succeeded() {
        let mut server = mockito::Server::new_async().await;
        let poll_url = format!("{}/v1/predictions/p1", server.url());
        let create = server
            .mock("POST", "/v1/predictions")
            .match_header("authorization", "Bearer r8_token")
            .match_body(mockito::Matcher::PartialJson(json!({
                "version": STABLE_DIFFUSION_V2_1,
                "input": {"prompt": "a red fox"}
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": "p1",
                    "status": "processing",
                    "urls": {"get": poll_url}
                })
                .to_string(),
            )
            .create_async()
            .await;
        let poll = server
            .mock("GET", "/v1/predictions/p1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"id": "p1", "status": "succeeded", "output": ["https://img/fox.png"]})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = ReplicateClient::with_api_base(server.url(), "r8_token".to_string())
            .unwrap()
            .with_poll_interval(Duration::from_millis(1));
        let urls = client.run_stable_diffusion("a red fox").await.unwrap();

        assert_eq!(urls, vec!["https://img/fox.png"]);
        create.assert_async().await;
        poll.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_prediction_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _create = server
            .mock("POST", "/v1/predictions")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(json!({"id": "p2", "status": "failed", "error": "NSFW"}).to_string())
            .create_async()
            .await;

        let client = ReplicateClient::with_api_base(server.url(), "t".to_string()).unwrap();
        let err = client.run_stable_diffusion("x").await.unwrap_err();
        assert!(matches!(err, BotError::ImageError(_)));
        assert!(err.to_string().contains("NSFW"));
    }
}
