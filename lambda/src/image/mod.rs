//! Image generation: hosted Stable Diffusion, or a random colour swatch when
//! the hosted API is switched off.

pub mod replicate;

use rand::Rng;
use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::errors::BotError;
pub use replicate::ReplicateClient;

const COLOR_SWATCH_BASE: &str = "https://www.colorhexa.com";

pub enum ImageGenerator {
    StableDiffusion(ReplicateClient),
    ColorSwatch,
}

impl ImageGenerator {
    /// # Errors
    ///
    /// Returns an error if the image API is enabled but its client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, BotError> {
        if !config.image_api_enabled {
            info!("Image API disabled, using colour swatch placeholders");
            return Ok(Self::ColorSwatch);
        }
        let token = config.replicate_api_token.clone().ok_or_else(|| {
            BotError::ConfigError("REPLICATE_API_TOKEN is not set".to_string())
        })?;
        Ok(Self::StableDiffusion(ReplicateClient::new(token)?))
    }

    /// Generates images for `prompt` and returns their URLs.
    ///
    /// Failures are logged and yield an empty list.
    pub async fn generate(&self, prompt: &str) -> Vec<String> {
        match self {
            Self::StableDiffusion(client) => match client.run_stable_diffusion(prompt).await {
                Ok(urls) => urls,
                Err(e) => {
                    error!("Image generation failed: {}", e);
                    Vec::new()
                }
            },
            Self::ColorSwatch => vec![random_color_image()],
        }
    }
}

/// URL of a solid-colour PNG in a random 24-bit colour.
#[must_use]
pub fn random_color_image() -> String {
    let color: u32 = rand::thread_rng().gen_range(0..1 << 24);
    color_image_url(color)
}

fn color_image_url(color: u32) -> String {
    format!("{COLOR_SWATCH_BASE}/{color:06x}.png")
}
