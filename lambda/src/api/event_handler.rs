//! Handler for Slack Events API callbacks.
//!
//! This module processes `event_callback` payloads including:
//! - `app_mention` - the bot was mentioned, queue an image task
//! - `message` - acknowledged and ignored

use serde_json::{Value, json};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::ApiState;
use super::helpers::ok_empty;
use super::parsing::v_str;
use super::sqs;
use crate::core::models::ImageTask;

/// What the API Lambda should do with an Events API body.
#[derive(Debug, PartialEq, Eq)]
pub enum EventAction {
    /// Answer Slack's `url_verification` handshake.
    Challenge(String),
    /// Queue work for the worker.
    Enqueue(ImageTask),
    /// Acknowledge without doing anything.
    Ignore,
}

/// Decides how to handle an Events API body without performing any I/O.
#[must_use]
pub fn route_event(json_body: &Value) -> EventAction {
    match v_str(json_body, &["type"]).unwrap_or("") {
        "url_verification" => {
            let challenge = v_str(json_body, &["challenge"]).unwrap_or("");
            EventAction::Challenge(challenge.to_string())
        }
        "event_callback" => {
            let Some(event) = json_body.get("event") else {
                return EventAction::Ignore;
            };
            let event_type = v_str(event, &["type"]).unwrap_or("");
            info!(event_type = %event_type, "Processing event callback");

            match event_type {
                "app_mention" => mention_task(json_body, event)
                    .map_or(EventAction::Ignore, EventAction::Enqueue),
                // Plain channel messages are subscribed to but not acted on.
                _ => EventAction::Ignore,
            }
        }
        _ => EventAction::Ignore,
    }
}

fn mention_task(json_body: &Value, event: &Value) -> Option<ImageTask> {
    let channel_id = v_str(event, &["channel"]).filter(|c| !c.is_empty());
    let ts = v_str(event, &["ts"]).filter(|t| !t.is_empty());
    let (Some(channel_id), Some(ts)) = (channel_id, ts) else {
        warn!("app_mention without channel or ts");
        return None;
    };

    Some(ImageTask::Mention {
        correlation_id: Uuid::new_v4().to_string(),
        api_app_id: v_str(json_body, &["api_app_id"]).unwrap_or("").to_string(),
        channel_id: channel_id.to_string(),
        ts: ts.to_string(),
        thread_ts: v_str(event, &["thread_ts"]).map(ToString::to_string),
        text: v_str(event, &["text"]).unwrap_or("").to_string(),
    })
}

/// Handle an Events API payload from Slack.
///
/// Enqueue failures are logged; Slack still gets a 200 so it does not retry
/// into the same failure.
pub async fn handle_event_callback(state: &ApiState, json_body: &Value) -> Value {
    match route_event(json_body) {
        EventAction::Challenge(challenge) => json!({
            "statusCode": 200,
            "body": challenge
        }),
        EventAction::Enqueue(task) => {
            if let Err(e) =
                sqs::send_to_sqs(&state.sqs, &state.config.processing_queue_url, &task).await
            {
                error!(
                    correlation_id = %task.correlation_id(),
                    "enqueue failed: {}", e
                );
            }
            ok_empty()
        }
        EventAction::Ignore => ok_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_verification_echoes_challenge() {
        let body = json!({"type": "url_verification", "challenge": "abc123"});
        assert_eq!(route_event(&body), EventAction::Challenge("abc123".into()));
    }

    #[test]
    fn test_threaded_mention_becomes_task() {
        let body = json!({
            "type": "event_callback",
            "api_app_id": "A0BOT",
            "event": {
                "type": "app_mention",
                "channel": "C1",
                "ts": "200.1",
                "thread_ts": "100.0",
                "text": "<@U0BOT> draw it"
            }
        });
        let EventAction::Enqueue(ImageTask::Mention {
            api_app_id,
            channel_id,
            ts,
            thread_ts,
            text,
            ..
        }) = route_event(&body)
        else {
            panic!("expected a mention task");
        };
        assert_eq!(api_app_id, "A0BOT");
        assert_eq!(channel_id, "C1");
        assert_eq!(ts, "200.1");
        assert_eq!(thread_ts.as_deref(), Some("100.0"));
        assert_eq!(text, "<@U0BOT> draw it");
    }

    #[test]
    fn test_message_events_are_ignored() {
        let body = json!({
            "type": "event_callback",
            "event": {"type": "message", "channel": "C1", "ts": "1.0", "text": "hi"}
        });
        assert_eq!(route_event(&body), EventAction::Ignore);
    }

    #[test]
    fn test_mention_without_channel_is_ignored() {
        let body = json!({
            "type": "event_callback",
            "event": {"type": "app_mention", "ts": "1.0", "text": "hi"}
        });
        assert_eq!(route_event(&body), EventAction::Ignore);
    }
}
