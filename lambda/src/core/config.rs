use std::env;

use crate::errors::BotError;

pub const DEFAULT_LLM_PROVIDER: &str = "OpenAI";

/// How many replies before the mention are fed to the completion prompt.
pub const DEFAULT_MAX_PRECEDING_REPLIES: usize = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub processing_queue_url: String,
    pub slack_signing_secret: String,
    pub slack_bot_token: String,
    pub einstein_gateway: String,
    pub einstein_api_key: String,
    pub sfdc_org_id: String,
    pub llm_provider: String,
    pub accept_invalid_certs: bool,
    /// Runtime toggle for the hosted diffusion API. When off, a random colour
    /// swatch stands in for generated images.
    pub image_api_enabled: bool,
    pub replicate_api_token: Option<String>,
    pub max_preceding_replies: usize,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` naming the first missing or malformed variable.
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` naming the first missing or malformed variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| BotError::ConfigError(format!("{key} is not set")))
        };

        let image_api_enabled = parse_flag(&required("IS_REPLICATE_API_ENABLED")?);
        let replicate_api_token = lookup("REPLICATE_API_TOKEN").filter(|v| !v.is_empty());
        if image_api_enabled && replicate_api_token.is_none() {
            return Err(BotError::ConfigError(
                "REPLICATE_API_TOKEN is required when IS_REPLICATE_API_ENABLED=true".to_string(),
            ));
        }

        let max_preceding_replies = match lookup("THREAD_CONTEXT_MAX_PRECEDING") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                BotError::ConfigError(format!("THREAD_CONTEXT_MAX_PRECEDING: {e}"))
            })?,
            None => DEFAULT_MAX_PRECEDING_REPLIES,
        };

        Ok(Self {
            processing_queue_url: required("PROCESSING_QUEUE_URL")?,
            slack_signing_secret: required("SLACK_SIGNING_SECRET")?,
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            einstein_gateway: required("EINSTEIN_GATEWAY")?
                .trim_end_matches('/')
                .to_string(),
            einstein_api_key: required("EINSTEIN_API_KEY")?,
            sfdc_org_id: required("SFDC_ORG_ID")?,
            llm_provider: lookup("EINSTEIN_LLM_PROVIDER")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LLM_PROVIDER.to_string()),
            accept_invalid_certs: lookup("EINSTEIN_ACCEPT_INVALID_CERTS")
                .is_some_and(|v| parse_flag(&v)),
            image_api_enabled,
            replicate_api_token,
            max_preceding_replies,
        })
    }
}

fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}
