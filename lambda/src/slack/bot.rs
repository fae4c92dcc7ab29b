use tracing::{debug, error, info};

use super::client::{SlackClient, THREAD_REPLIES_LIMIT};
use super::response_builder::{
    create_in_channel_payload, format_direct_reply, format_mention_reply,
};
use crate::ai::CompletionClient;
use crate::ai::prompt::{build_prompt_with_list, or_default_prompt, strip_mentions};
use crate::core::config::AppConfig;
use crate::core::models::{ImagePromptSuggestion, ThreadMessage, thread_anchor};
use crate::core::window::ThreadWindower;
use crate::errors::BotError;
use crate::image::ImageGenerator;

/// A mention as seen by the worker.
#[derive(Debug, Clone, Copy)]
pub struct Mention<'a> {
    pub channel_id: &'a str,
    pub ts: &'a str,
    pub thread_ts: Option<&'a str>,
    pub text: &'a str,
}

impl Mention<'_> {
    #[must_use]
    pub fn is_threaded(&self) -> bool {
        self.thread_ts.is_some()
    }

    #[must_use]
    pub fn anchor(&self) -> &str {
        thread_anchor(self.ts, self.thread_ts)
    }
}

/// Common Slack functionality
pub struct SlackBot {
    slack_client: SlackClient,
    completion_client: CompletionClient,
    image_generator: ImageGenerator,
    max_preceding_replies: usize,
}

impl SlackBot {
    /// Construct a `SlackBot` from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the HTTP clients cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, BotError> {
        Ok(Self::from_parts(
            SlackClient::new(config.slack_bot_token.clone()),
            CompletionClient::from_config(config)?,
            ImageGenerator::from_config(config)?,
            config.max_preceding_replies,
        ))
    }

    #[must_use]
    pub fn from_parts(
        slack_client: SlackClient,
        completion_client: CompletionClient,
        image_generator: ImageGenerator,
        max_preceding_replies: usize,
    ) -> Self {
        Self {
            slack_client,
            completion_client,
            image_generator,
            max_preceding_replies,
        }
    }

    #[must_use]
    pub fn slack_client(&self) -> &SlackClient {
        &self.slack_client
    }

    /// Replies preceding (and including) the mention, minus the bot's own posts.
    ///
    /// A failed listing is logged and treated as an empty thread.
    pub async fn get_preceding_replies(
        &self,
        mention: &Mention<'_>,
        self_app_id: Option<&str>,
    ) -> Vec<ThreadMessage> {
        let messages = match self
            .slack_client
            .get_thread_replies(mention.channel_id, mention.anchor(), THREAD_REPLIES_LIMIT)
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                error!("Error fetching replies: {}", e);
                return Vec::new();
            }
        };

        let windower = ThreadWindower::new(self_app_id, self.max_preceding_replies);
        let preceding = windower.window(&messages, mention.ts);
        debug!(
            fetched = messages.len(),
            kept = preceding.len(),
            "Windowed thread replies"
        );
        preceding
    }

    async fn suggest_from_thread(
        &self,
        mention: &Mention<'_>,
        self_app_id: Option<&str>,
    ) -> Option<ImagePromptSuggestion> {
        let messages = self.get_preceding_replies(mention, self_app_id).await;
        if messages.is_empty() {
            return None;
        }
        let prompt = match build_prompt_with_list(&messages) {
            Ok(p) => p,
            Err(e) => {
                error!("Failed to build completion prompt: {}", e);
                return None;
            }
        };
        self.completion_client.suggest_image_prompt(&prompt).await
    }

    /// Builds the text of the reply to a mention: thread-derived keywords and
    /// prompt when the mention is in a thread, then the generated image URLs.
    pub async fn build_mention_reply(
        &self,
        mention: &Mention<'_>,
        self_app_id: Option<&str>,
    ) -> String {
        let (suggestion, image_prompt) = if mention.is_threaded() {
            debug!("Threaded mention, deriving prompt from preceding replies");
            let suggestion = self.suggest_from_thread(mention, self_app_id).await;
            let prompt = suggestion
                .as_ref()
                .map(|s| s.prompt.clone())
                .unwrap_or_default();
            (suggestion, prompt)
        } else {
            (None, strip_mentions(mention.text))
        };

        let image_prompt = or_default_prompt(&image_prompt);
        info!(image_prompt = %image_prompt, "Generating images");
        let image_urls = self.image_generator.generate(image_prompt).await;

        format_mention_reply(suggestion.as_ref(), &image_urls)
    }

    /// Handles a mention end to end. Posting failures are logged, not returned.
    pub async fn respond_mention(&self, mention: &Mention<'_>, self_app_id: Option<&str>) {
        let reply = self.build_mention_reply(mention, self_app_id).await;
        if let Err(e) = self
            .slack_client
            .post_message_in_thread(mention.channel_id, mention.anchor(), &reply)
            .await
        {
            error!("Error posting message: {}", e);
        }
    }

    /// Text of the reply to a `/sum-image` invocation.
    pub async fn build_direct_reply(&self, text: &str) -> String {
        let image_urls = self.image_generator.generate(or_default_prompt(text)).await;
        format_direct_reply(text, &image_urls)
    }

    /// Handles a `/sum-image` invocation. Posting failures are logged, not returned.
    pub async fn respond_direct_invocation(&self, text: &str, response_url: &str) {
        let reply = self.build_direct_reply(text).await;
        let payload = create_in_channel_payload(&reply);
        if let Err(e) = self
            .slack_client
            .post_response_url(response_url, &payload)
            .await
        {
            error!("Error posting slash command reply: {}", e);
        }
    }
}
