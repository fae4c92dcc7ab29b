//! API Lambda handler and request processing

pub mod event_handler;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod signature;
pub mod slash_handler;
pub mod sqs;

use aws_sdk_sqs::Client as SqsClient;

use crate::core::config::AppConfig;

// Re-export the main handler for convenience
pub use handler::handler;

/// State shared by every API invocation in a Lambda container.
pub struct ApiState {
    pub config: AppConfig,
    pub sqs: SqsClient,
}
