//! API Lambda handler - thin router that delegates to specialized handlers.
//!
//! This module handles:
//! - Request validation (headers, body, signature)
//! - Event callbacks (delegated to `event_handler` module)
//! - Slash commands (delegated to `slash_handler` module)

use super::{ApiState, event_handler, helpers, parsing, signature, slash_handler};
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error, info};

pub use self::function_handler as handler;

const HEALTH_BODY: &str = "Hello from sum-image";

/// Lambda handler for the API entrypoint.
///
/// Routes requests to specialized handlers based on path and payload type.
///
/// # Errors
///
/// Returns an error response payload if the request is malformed or fails
/// Slack signature verification; otherwise returns a 200 with a JSON body.
#[tracing::instrument(level = "info", skip(state, event))]
pub async fn function_handler(
    state: &ApiState,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    Ok(route_request(state, &event.payload).await)
}

/// Routes one proxied HTTP request and builds the proxy response.
pub async fn route_request(state: &ApiState, payload: &Value) -> Value {
    if let Some(path) = parsing::request_path(payload) {
        info!(raw_path = %path, "Request path");
        if path == "/" && payload.get("body").is_none_or(Value::is_null) {
            return helpers::ok_text(HEALTH_BODY);
        }
    }

    // ========================================================================
    // Extract and validate headers and body
    // ========================================================================

    let Some(headers) = payload.get("headers") else {
        error!("Request missing headers");
        return helpers::err_response(400, "Missing headers");
    };

    let body = match extract_body(payload) {
        Ok(b) => b,
        Err(response) => return response,
    };

    if let Err(response) = verify_signature(body, headers, &state.config.slack_signing_secret) {
        return response;
    }

    info!("Slack signature verified successfully");
    debug!(body = %body, "Inbound Slack request");

    // Slack redelivers events it considers unacknowledged; the first delivery
    // already queued the work.
    if let Some(retry_num) = parsing::get_header_value(headers, "X-Slack-Retry-Num") {
        info!(retry_num = %retry_num, "Acknowledging Slack retry without reprocessing");
        return helpers::ok_empty();
    }

    // ========================================================================
    // Route to specialized handlers
    // ========================================================================

    if let Ok(json_body) = serde_json::from_str::<Value>(body) {
        return event_handler::handle_event_callback(state, &json_body).await;
    }

    match slash_handler::handle_slash_command(state, body).await {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to parse Slack request: {}", e);
            helpers::err_response(400, &format!("Parse Error: {e}"))
        }
    }
}

// ============================================================================
// Request Validation Helpers
// ============================================================================

fn extract_body(payload: &Value) -> Result<&str, Value> {
    let Some(body) = payload.get("body") else {
        error!("Request missing body");
        return Err(helpers::err_response(400, "Missing body"));
    };

    let Some(body_str) = body.as_str() else {
        error!("Request body is not a string");
        return Err(helpers::err_response(400, "Invalid body format"));
    };

    Ok(body_str)
}

fn verify_signature(body: &str, headers: &Value, signing_secret: &str) -> Result<(), Value> {
    let Some(sig) = parsing::get_header_value(headers, "X-Slack-Signature") else {
        error!("Missing X-Slack-Signature header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Signature header",
        ));
    };

    let Some(timestamp) = parsing::get_header_value(headers, "X-Slack-Request-Timestamp") else {
        error!("Missing X-Slack-Request-Timestamp header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Request-Timestamp header",
        ));
    };

    if !signature::verify_slack_signature(body, timestamp, sig, signing_secret) {
        error!("Slack signature verification failed");
        return Err(helpers::err_response(401, "Invalid Slack signature"));
    }

    Ok(())
}
