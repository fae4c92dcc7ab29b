/// sum-image - A Slack bot that turns threads into pictures.
///
/// When mentioned inside a thread, the bot feeds the last few replies to an
/// LLM gateway, which distills them into keywords and an image prompt. The
/// prompt goes to Stable Diffusion and the resulting image URLs are posted
/// back into the thread. `/sum-image <prompt>` skips the LLM and draws the
/// prompt directly.
///
/// # Architecture
///
/// Two Lambdas share this crate:
/// 1. An API Lambda that verifies Slack requests, acknowledges them and queues an `ImageTask`
/// 2. A Worker Lambda that consumes tasks from SQS, calls the LLM and image APIs and replies
///
/// # Example
///
/// ```
/// use sum_image::core::models::ThreadMessage;
/// use sum_image::core::window;
///
/// let thread = vec![
///     ThreadMessage::new("1.0", "who is up for camping?"),
///     ThreadMessage::from_app("2.0", ":frame_with_picture: ...", "A0BOT"),
///     ThreadMessage::new("3.0", "only if there is a lake"),
///     ThreadMessage::new("4.0", "<@U0BOT> draw it"),
/// ];
///
/// let context = window(&thread, "4.0", 2, Some("A0BOT"));
/// let ts: Vec<&str> = context.iter().map(|m| m.ts.as_str()).collect();
/// assert_eq!(ts, ["1.0", "3.0", "4.0"]);
/// ```
// Module declarations
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod image;
pub mod slack;
pub mod worker;

pub use errors::BotError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Sets up tracing-subscriber with a JSON formatter suitable for `CloudWatch`
/// Logs. The level defaults to `info` and can be overridden with `RUST_LOG`.
/// Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// sum_image::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
