use std::sync::Arc;

use lambda_runtime::{Error, run, service_fn};
use sum_image::api::{ApiState, handler, sqs};
use sum_image::core::config::AppConfig;
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    sum_image::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let sqs = sqs::build_client().await;
    let state = Arc::new(ApiState { config, sqs });

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(&state, event).await }
    }))
    .await
}
