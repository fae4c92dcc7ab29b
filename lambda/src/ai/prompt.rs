//! Prompt construction for the keyword / image-prompt completion.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use crate::core::models::ThreadMessage;
use crate::errors::BotError;

/// Used whenever neither the mention text nor the LLM produced anything usable.
pub const DEFAULT_IMAGE_PROMPT: &str =
    "sketch of robot contemplating its reflection in a mirror while holding a paintbrush";

const KEYWORD_IMAGE_PROMPT_TEMPLATE: &str = "You are helping a Slack bot illustrate a conversation.\n\
Below is a JSON array of the most recent messages in a Slack thread, oldest first:\n\
\n\
{json_array}\n\
\n\
Pick up to five keywords that capture what the conversation is about, then write a single \
vivid prompt for an image generation model (such as Stable Diffusion) that illustrates it. \
Do not include user names, user ids or Slack markup in the prompt.\n\
\n\
Respond with ONLY a JSON object of the form:\n\
{\"keywords\": [\"keyword\", \"...\"], \"prompt\": \"image prompt\"}";

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@[A-Z0-9]+(\|[^>]*)?>").expect("static regex compile"));

/// Renders the completion prompt for a windowed slice of the thread.
///
/// # Errors
///
/// Returns an error if the message texts cannot be serialized.
pub fn build_prompt_with_list(messages: &[ThreadMessage]) -> Result<String, BotError> {
    let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
    let json_array = to_json_indent2(&texts)?;
    let rendered = KEYWORD_IMAGE_PROMPT_TEMPLATE.replace("{json_array}", &json_array);
    debug!(rendered_prompt = %rendered, "Rendered completion prompt");
    Ok(rendered)
}

fn to_json_indent2<T: Serialize>(value: &T) -> Result<String, BotError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"  "));
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| BotError::ParseError(e.to_string()))
}

/// Removes `<@U…>` mention tokens and collapses the remaining whitespace.
#[must_use]
pub fn strip_mentions(text: &str) -> String {
    MENTION_RE
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Falls back to [`DEFAULT_IMAGE_PROMPT`] for blank prompts.
#[must_use]
pub fn or_default_prompt(prompt: &str) -> &str {
    if prompt.trim().is_empty() {
        DEFAULT_IMAGE_PROMPT
    } else {
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_texts_in_order() {
        let msgs = vec![
            ThreadMessage::new("1", "we should go camping"),
            ThreadMessage::new("2", "by a \"lake\""),
        ];
        let prompt = build_prompt_with_list(&msgs).unwrap();
        assert!(prompt.contains("[\n  \"we should go camping\",\n  \"by a \\\"lake\\\"\"\n]"));
        assert!(prompt.contains("\"keywords\""));
        assert!(!prompt.contains("{json_array}"));
    }

    #[test]
    fn test_strip_mentions() {
        assert_eq!(strip_mentions("<@U01ABC> a red  fox"), "a red fox");
        assert_eq!(strip_mentions("hi <@U1|bot> there"), "hi there");
        assert_eq!(strip_mentions("<@U01ABC>"), "");
    }

    #[test]
    fn test_default_prompt_for_blank() {
        assert_eq!(or_default_prompt("  "), DEFAULT_IMAGE_PROMPT);
        assert_eq!(or_default_prompt("a cat"), "a cat");
    }
}
