use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::BotError;

/// Structure representing a Slack slash command event.
/// Only the fields the bot acts on are kept.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SlashCommandEvent {
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
    pub api_app_id: String,
}

/// Decodes an `application/x-www-form-urlencoded` component.
///
/// `+` is treated as a space before percent-decoding, so an encoded plus
/// (`%2B`) survives as a literal `+`.
///
/// # Examples
///
/// ```
/// use sum_image::slack::command_parser::decode_url_component;
///
/// assert_eq!(decode_url_component("a+red%20fox").unwrap(), "a red fox");
/// assert_eq!(decode_url_component("1%2B1").unwrap(), "1+1");
/// ```
///
/// # Errors
///
/// Returns an error if the decoded bytes are not valid UTF-8.
pub fn decode_url_component(input: &str) -> Result<String, BotError> {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| BotError::ParseError(format!("Failed to decode URL component: {e}")))
}

/// Parses the form-encoded body Slack sends for a slash command.
///
/// # Examples
///
/// ```
/// use sum_image::slack::command_parser::parse_form_data;
///
/// let form_data = "team_id=T123&channel_id=C123&user_id=U123&\
///                  command=%2Fsum-image&text=a+lighthouse&\
///                  response_url=https%3A%2F%2Fhooks.slack.com%2Fcommands%2F1&\
///                  trigger_id=123.456&api_app_id=A123";
///
/// let event = parse_form_data(form_data).unwrap();
/// assert_eq!(event.command, "/sum-image");
/// assert_eq!(event.text, "a lighthouse");
/// ```
///
/// # Errors
///
/// Returns an error if a component cannot be decoded or if the body lacks
/// the channel, user or `response_url` fields.
pub fn parse_form_data(form_data: &str) -> Result<SlashCommandEvent, BotError> {
    let mut map: HashMap<String, String> = HashMap::new();

    for pair in form_data.split('&') {
        if let Some((raw_key, raw_value)) = pair.split_once('=') {
            map.insert(
                decode_url_component(raw_key)?,
                decode_url_component(raw_value)?,
            );
        }
    }

    let mut take = |key: &str| map.remove(key).unwrap_or_default();
    let event = SlashCommandEvent {
        team_id: take("team_id"),
        channel_id: take("channel_id"),
        user_id: take("user_id"),
        command: take("command"),
        text: take("text"),
        response_url: take("response_url"),
        trigger_id: take("trigger_id"),
        api_app_id: take("api_app_id"),
    };

    for (name, value) in [
        ("channel_id", &event.channel_id),
        ("user_id", &event.user_id),
        ("response_url", &event.response_url),
    ] {
        if value.is_empty() {
            return Err(BotError::ParseError(format!(
                "Slash command is missing {name}"
            )));
        }
    }

    Ok(event)
}
