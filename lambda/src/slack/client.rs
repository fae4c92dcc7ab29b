//! Slack API client module
//!
//! Encapsulates the Slack Web API calls the bot needs: listing thread replies,
//! posting into a thread and answering slash commands via `response_url`.

use hyper_rustls::HttpsConnectorBuilder;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::SlackApiChatPostMessageRequest;
use slack_morphism::{
    SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackMessageContent, SlackTs,
};
use std::time::Duration;
use tokio_retry::strategy::jitter;
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::{debug, warn};

use crate::core::models::ThreadMessage;
use crate::errors::BotError;

pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Page size used when listing thread replies.
pub const THREAD_REPLIES_LIMIT: u16 = 100;

/// Attempts after the first failed Slack call.
pub const DEFAULT_MAX_RETRIES: usize = 4;

// First retry waits ~100ms, doubling up to MAX_RETRY_DELAY.
const RETRY_BASE_MILLIS: u64 = 2;
const RETRY_FACTOR: u64 = 50;
const MAX_RETRY_DELAY: Duration = Duration::from_secs(2);

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

#[derive(Debug, Deserialize)]
struct RepliesResponse {
    ok: bool,
    #[serde(default)]
    messages: Vec<ThreadMessage>,
    error: Option<String>,
}

/// Builds the slack-morphism client for `api_base`.
///
/// Plain `http` is allowed next to `https` so the client can talk to a local
/// Slack stand-in. A failure is logged and surfaced as a `BotError` at call sites.
fn build_slack_client(api_base: &str) -> Option<SlackHyperClient> {
    let https = match HttpsConnectorBuilder::new().with_native_roots() {
        Ok(builder) => builder
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build(),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            return None;
        }
    };
    let connector = SlackClientHyperConnector::from(https).with_slack_api_url(api_base);
    Some(SlackHyperClient::new(connector))
}

/// Slack API client with retry logic and error handling
pub struct SlackClient {
    token: SlackApiToken,
    api_base: String,
    slack: Option<SlackHyperClient>,
    max_retries: usize,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self::with_api_base(token, SLACK_API_BASE.to_string())
    }

    /// Points every Slack Web API call, including `chat.postMessage`, at `api_base`.
    #[must_use]
    pub fn with_api_base(token: String, api_base: String) -> Self {
        let api_base = api_base.trim_end_matches('/').to_string();
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
            slack: build_slack_client(&api_base),
            api_base,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn token(&self) -> &SlackApiToken {
        &self.token
    }

    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T, BotError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, BotError>> + Send,
        T: Send,
    {
        let strategy = ExponentialBackoff::from_millis(RETRY_BASE_MILLIS)
            .factor(RETRY_FACTOR)
            .max_delay(MAX_RETRY_DELAY)
            .map(jitter)
            .take(self.max_retries);

        Retry::start(strategy, operation).await
    }

    /// Lists the replies of the thread anchored at `anchor_ts`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or Slack reports `ok: false`.
    pub async fn get_thread_replies(
        &self,
        channel_id: &str,
        anchor_ts: &str,
        limit: u16,
    ) -> Result<Vec<ThreadMessage>, BotError> {
        let url = format!("{}/conversations.replies", self.api_base);
        let limit = limit.to_string();

        let resp = HTTP_CLIENT
            .get(&url)
            .bearer_auth(&self.token.token_value.0)
            .query(&[
                ("channel", channel_id),
                ("ts", anchor_ts),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("conversations.replies failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(BotError::ApiError(format!(
                "conversations.replies HTTP {}",
                resp.status()
            )));
        }

        let body: RepliesResponse = resp.json().await.map_err(|e| {
            BotError::ApiError(format!("conversations.replies JSON parse error: {e}"))
        })?;

        if !body.ok {
            return Err(BotError::ApiError(format!(
                "conversations.replies error: {}",
                body.error.as_deref().unwrap_or("unknown")
            )));
        }

        debug!(
            channel_id = %channel_id,
            anchor_ts = %anchor_ts,
            count = body.messages.len(),
            "Fetched thread replies"
        );
        Ok(body.messages)
    }

    /// Post a plain-text reply into a specific thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack connector is unavailable or every attempt fails.
    pub async fn post_message_in_thread(
        &self,
        channel_id: &str,
        thread_ts: &str,
        message: &str,
    ) -> Result<(), BotError> {
        self.with_retry(|| async {
            let session = self
                .slack
                .as_ref()
                .ok_or_else(|| {
                    BotError::ApiError("Slack HTTP connector not initialized".to_string())
                })?
                .open_session(&self.token);

            let post_req = SlackApiChatPostMessageRequest::new(
                SlackChannelId(channel_id.to_string()),
                SlackMessageContent::new().with_text(message.to_string()),
            )
            .with_thread_ts(SlackTs(thread_ts.to_string()));

            let resp = session.chat_post_message(&post_req).await?;
            debug!(ts = ?resp.ts, "postMessage result");

            Ok(())
        })
        .await
    }

    /// Sends a payload to a slash command's `response_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Slack answers with a non-success status.
    pub async fn post_response_url(
        &self,
        response_url: &str,
        payload: &Value,
    ) -> Result<(), BotError> {
        let resp = HTTP_CLIENT.post(response_url).json(payload).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_text = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            return Err(BotError::ApiError(format!(
                "response_url POST failed: status={status} body={body_text}"
            )));
        }
        Ok(())
    }
}
