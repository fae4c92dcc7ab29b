use std::sync::Arc;

use lambda_runtime::{Error, run, service_fn};
use sum_image::core::BotIdentity;
use sum_image::core::config::AppConfig;
use sum_image::slack::SlackBot;
use sum_image::worker::{WorkerState, handler};
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    sum_image::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let bot = SlackBot::new(&config).map_err(|e| {
        error!("Failed to initialize bot: {}", e);
        Error::from(e)
    })?;
    let state = Arc::new(WorkerState {
        bot,
        identity: BotIdentity::new(),
    });

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(&state, event).await }
    }))
    .await
}
