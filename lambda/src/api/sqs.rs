use aws_sdk_sqs::Client as SqsClient;
use tracing::info;

use crate::core::models::ImageTask;
use crate::errors::BotError;

/// Builds an SQS client from the Lambda's ambient AWS configuration.
pub async fn build_client() -> SqsClient {
    let shared_config = aws_config::from_env().load().await;
    SqsClient::new(&shared_config)
}

/// # Errors
///
/// Returns an error if serialization fails or the message cannot be sent to SQS.
pub async fn send_to_sqs(
    client: &SqsClient,
    queue_url: &str,
    task: &ImageTask,
) -> Result<(), BotError> {
    let message_body = serde_json::to_string(task)
        .map_err(|e| BotError::ParseError(format!("Failed to serialize task: {e}")))?;

    client
        .send_message()
        .queue_url(queue_url)
        .message_body(message_body)
        .send()
        .await
        .map_err(|e| BotError::AwsError(format!("Failed to send message to SQS: {e}")))?;

    info!(correlation_id = %task.correlation_id(), "Enqueued image task");
    Ok(())
}
