//! Client for the hosted LLM generations gateway
//!
//! The gateway fronts an LLM provider and exposes a single
//! `POST /v1.0/generations` endpoint authenticated with an org id and API key.

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::core::config::AppConfig;
use crate::core::models::ImagePromptSuggestion;
use crate::errors::BotError;

const GENERATIONS_PATH: &str = "/v1.0/generations";
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 512;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct GenerationsResponse {
    #[serde(default)]
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    #[serde(default)]
    text: String,
}

pub struct CompletionClient {
    http: Client,
    gateway_url: String,
    api_key: String,
    org_id: String,
    llm_provider: String,
}

impl CompletionClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        gateway_url: String,
        api_key: String,
        org_id: String,
        llm_provider: String,
        accept_invalid_certs: bool,
    ) -> Result<Self, BotError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| {
                BotError::HttpError(format!("Failed to build completion HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            api_key,
            org_id,
            llm_provider,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, BotError> {
        Self::new(
            config.einstein_gateway.clone(),
            config.einstein_api_key.clone(),
            config.sfdc_org_id.clone(),
            config.llm_provider.clone(),
            config.accept_invalid_certs,
        )
    }

    fn headers(&self) -> Result<HeaderMap, BotError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let provider = HeaderValue::from_str(&self.llm_provider)
            .map_err(|e| BotError::HttpError(format!("Invalid X-LLM-Provider header: {e}")))?;
        headers.insert("X-LLM-Provider", provider);

        let org = HeaderValue::from_str(&self.org_id)
            .map_err(|e| BotError::HttpError(format!("Invalid X-Org-Id header: {e}")))?;
        headers.insert("X-Org-Id", org);

        let auth = HeaderValue::from_str(&format!("API_KEY {}", self.api_key))
            .map_err(|e| BotError::HttpError(format!("Invalid Authorization header: {e}")))?;
        headers.insert(AUTHORIZATION, auth);

        Ok(headers)
    }

    /// Sends `prompt` to the gateway and returns the generated texts.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable response body.
    pub async fn generate_completions(&self, prompt: &str) -> Result<Vec<String>, BotError> {
        let url = format!("{}{}", self.gateway_url, GENERATIONS_PATH);
        let payload = json!({
            "prompt": prompt,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        #[cfg(feature = "debug-logs")]
        debug!("Completion prompt:\n{}", prompt);

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("Completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
            return Err(BotError::CompletionError(format!(
                "status_code={status} content={body}"
            )));
        }

        let parsed: GenerationsResponse = response.json().await.map_err(|e| {
            BotError::CompletionError(format!("Failed to parse generations response: {e}"))
        })?;

        Ok(parsed.generations.into_iter().map(|g| g.text).collect())
    }

    /// Asks the LLM for keywords and an image prompt.
    ///
    /// Any failure is logged and reported as `None`; the caller falls back to
    /// a default prompt.
    pub async fn suggest_image_prompt(&self, prompt: &str) -> Option<ImagePromptSuggestion> {
        let generations = match self.generate_completions(prompt).await {
            Ok(g) => g,
            Err(e) => {
                error!("Error from completion API: {}", e);
                return None;
            }
        };

        let Some(first) = generations.first() else {
            warn!("Unexpected completion response: nothing generated");
            return None;
        };

        match parse_suggestion(first) {
            Ok(suggestion) => {
                info!(
                    keywords = ?suggestion.keywords,
                    prompt = %suggestion.prompt,
                    "Received image prompt suggestion"
                );
                Some(suggestion)
            }
            Err(e) => {
                error!("Completion text was not the expected JSON object: {}", e);
                debug!(text = %first, "Raw completion text");
                None
            }
        }
    }
}

/// Decodes the JSON object the prompt asks the model to produce.
///
/// Models occasionally wrap the object in a fenced code block; the fence is
/// stripped before decoding.
///
/// # Errors
///
/// Returns an error if the text is not a JSON object of the expected shape.
pub fn parse_suggestion(text: &str) -> Result<ImagePromptSuggestion, BotError> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced.trim()).map_err(BotError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard) -> CompletionClient {
        CompletionClient::new(
            server.url(),
            "key123".to_string(),
            "00Dorg".to_string(),
            "OpenAI".to_string(),
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_suggestion_plain_and_fenced() {
        let plain = parse_suggestion(r#"{"keywords":["lake"],"prompt":"a lake"}"#).unwrap();
        assert_eq!(plain.keywords, vec!["lake".to_string()]);
        assert_eq!(plain.prompt, "a lake");

        let fenced = parse_suggestion("```json\n{\"prompt\":\"a boat\"}\n```").unwrap();
        assert_eq!(fenced.prompt, "a boat");
        assert!(fenced.keywords.is_empty());

        assert!(parse_suggestion("not json").is_err());
    }

    #[tokio::test]
    async fn test_suggest_image_prompt_sends_gateway_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1.0/generations")
            .match_header("x-llm-provider", "OpenAI")
            .match_header("x-org-id", "00Dorg")
            .match_header("authorization", "API_KEY key123")
            .match_body(mockito::Matcher::PartialJson(json!({
                "prompt": "hello",
                "temperature": 0.7,
                "max_tokens": 512
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "generations": [
                        {"text": "{\"keywords\": [\"camp\", \"lake\"], \"prompt\": \"tents by a lake\"}"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let suggestion = client_for(&server).suggest_image_prompt("hello").await.unwrap();
        assert_eq!(suggestion.keywords, vec!["camp", "lake"]);
        assert_eq!(suggestion.prompt, "tents by a lake");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1.0/generations")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(client.suggest_image_prompt("hello").await.is_none());

        let err = client.generate_completions("hello").await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_empty_generations_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1.0/generations")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"generations": []}"#)
            .create_async()
            .await;

        assert!(client_for(&server).suggest_image_prompt("hello").await.is_none());
    }
}
