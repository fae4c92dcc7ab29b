//! Handler for the `/sum-image` slash command.

use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use super::ApiState;
use super::helpers::ok_ephemeral;
use super::sqs;
use crate::core::models::ImageTask;
use crate::errors::BotError;
use crate::slack::command_parser::{SlashCommandEvent, parse_form_data};

/// Builds the worker task for a parsed slash command.
#[must_use]
pub fn direct_task(command: &SlashCommandEvent) -> ImageTask {
    ImageTask::Direct {
        correlation_id: Uuid::new_v4().to_string(),
        user_id: command.user_id.clone(),
        channel_id: command.channel_id.clone(),
        text: command.text.trim().to_string(),
        response_url: command.response_url.clone(),
    }
}

/// Immediate acknowledgment shown only to the invoking user.
#[must_use]
pub fn greeting(user_id: &str) -> String {
    format!("Hi, <@{user_id}>!")
}

/// Handle a slash command from Slack.
///
/// # Errors
///
/// Returns an error if the body cannot be parsed.
pub async fn handle_slash_command(state: &ApiState, body: &str) -> Result<Value, BotError> {
    let command = parse_form_data(body)?;
    let task = direct_task(&command);
    let correlation_id = task.correlation_id().to_string();
    info!(
        correlation_id = %correlation_id,
        command = %command.command,
        "Slash command received"
    );

    if let Err(e) = sqs::send_to_sqs(&state.sqs, &state.config.processing_queue_url, &task).await {
        error!(
            "Failed to enqueue task (correlation_id={}): {}",
            correlation_id, e
        );
        return Ok(ok_ephemeral(&format!(
            "Failed to start image generation. Please try again. (ref: {})",
            &correlation_id[..8]
        )));
    }

    Ok(ok_ephemeral(&greeting(&command.user_id)))
}
