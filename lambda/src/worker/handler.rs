use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::core::BotIdentity;
use crate::core::models::ImageTask;
use crate::slack::{Mention, SlackBot};

/// Long-lived worker state, built once per Lambda container.
pub struct WorkerState {
    pub bot: SlackBot,
    pub identity: BotIdentity,
}

/// Pulls the `ImageTask` bodies out of an SQS event.
///
/// Records whose body is missing or malformed are logged and skipped, since
/// redelivering them would fail the same way.
#[must_use]
pub fn extract_tasks(payload: &Value) -> Vec<ImageTask> {
    let Some(records) = payload.get("Records").and_then(Value::as_array) else {
        warn!("SQS event without Records");
        return Vec::new();
    };

    records
        .iter()
        .filter_map(|record| {
            let Some(body) = record.get("body").and_then(Value::as_str) else {
                error!("Failed to extract SQS message body");
                return None;
            };
            match serde_json::from_str::<ImageTask>(body) {
                Ok(task) => Some(task),
                Err(e) => {
                    error!("Failed to parse SQS message body into ImageTask: {}", e);
                    None
                }
            }
        })
        .collect()
}

/// Runs one task to completion.
pub async fn process_task(state: &WorkerState, task: &ImageTask) {
    match task {
        ImageTask::Mention {
            correlation_id,
            api_app_id,
            channel_id,
            ts,
            thread_ts,
            text,
        } => {
            let self_app_id = state.identity.resolve(api_app_id);
            info!(
                correlation_id = %correlation_id,
                channel_id = %channel_id,
                threaded = thread_ts.is_some(),
                "Responding to mention"
            );
            let mention = Mention {
                channel_id: channel_id.as_str(),
                ts: ts.as_str(),
                thread_ts: thread_ts.as_deref(),
                text: text.as_str(),
            };
            state.bot.respond_mention(&mention, self_app_id).await;
        }
        ImageTask::Direct {
            correlation_id,
            user_id,
            channel_id,
            text,
            response_url,
        } => {
            info!(
                correlation_id = %correlation_id,
                channel_id = %channel_id,
                user_id = %user_id,
                "Responding to direct invocation"
            );
            state
                .bot
                .respond_direct_invocation(text, response_url)
                .await;
        }
    }
}

/// Lambda handler for the Worker entrypoint. Parses SQS records and responds to each task.
///
/// # Errors
///
/// Never fails for task-level problems; those are logged so the batch is not redelivered.
#[tracing::instrument(level = "info", skip(state, event))]
pub async fn function_handler(
    state: &WorkerState,
    event: LambdaEvent<Value>,
) -> Result<(), Error> {
    let tasks = extract_tasks(&event.payload);
    info!(count = tasks.len(), "Worker Lambda received SQS tasks");

    for task in &tasks {
        process_task(state, task).await;
    }

    Ok(())
}

pub use self::function_handler as handler;
