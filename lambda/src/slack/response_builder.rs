//! Response-related utilities for Slack interactions.
//!
//! Builds the payloads sent through `response_url` and the plain-text
//! replies the bot posts with generated images.

use serde_json::{Value, json};

use crate::core::models::ImagePromptSuggestion;

/// Every mention reply starts with this.
pub const IMAGE_MESSAGE_PREFIX: &str = ":frame_with_picture: ";

/// Create a JSON payload for an ephemeral response
///
/// Ephemeral messages are only visible to the user who triggered the command.
///
/// # Examples
///
/// ```
/// use sum_image::slack::response_builder::create_ephemeral_payload;
///
/// let payload = create_ephemeral_payload("This message is only visible to you");
/// assert_eq!(payload["response_type"], "ephemeral");
/// ```
#[must_use]
pub fn create_ephemeral_payload(text: &str) -> Value {
    json!({
        "text": text,
        "response_type": "ephemeral"
    })
}

/// Create a JSON payload that posts visibly to the whole channel.
#[must_use]
pub fn create_in_channel_payload(text: &str) -> Value {
    json!({
        "text": text,
        "response_type": "in_channel"
    })
}

/// Header lines describing what the LLM pulled out of the thread.
#[must_use]
pub fn format_suggestion(suggestion: &ImagePromptSuggestion) -> String {
    format!(
        "Keywords: {}\nPrompt: \"{}\"\n",
        suggestion.keywords.join(", "),
        suggestion.prompt
    )
}

/// Full text of a mention reply.
#[must_use]
pub fn format_mention_reply(
    suggestion: Option<&ImagePromptSuggestion>,
    image_urls: &[String],
) -> String {
    let mut message = IMAGE_MESSAGE_PREFIX.to_string();
    if let Some(s) = suggestion {
        message.push_str(&format_suggestion(s));
    }
    message.push_str(&image_urls.join("\n"));
    message
}

/// Reply to `/sum-image`: the prompt quoted, followed by the image URLs.
#[must_use]
pub fn format_direct_reply(prompt: &str, image_urls: &[String]) -> String {
    format!("> {}\n{}", prompt, image_urls.join("\n"))
}
