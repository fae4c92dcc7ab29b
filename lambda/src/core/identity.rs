//! The bot's own Slack application id.
//!
//! Slack does not tell a bot who it is until an event arrives, so the id is
//! learned from the `api_app_id` of the first event and kept for the lifetime
//! of the process.

use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct BotIdentity {
    app_id: OnceLock<String>,
}

impl BotIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `observed` as the bot's app id if none is known yet and returns
    /// the id in effect. Blank observations are ignored.
    pub fn resolve(&self, observed: &str) -> Option<&str> {
        if !observed.is_empty() {
            let current = self.app_id.get_or_init(|| {
                debug!(app_id = %observed, "Setting bot app id according to event");
                observed.to_string()
            });
            if current != observed {
                debug!(
                    known = %current,
                    observed = %observed,
                    "Ignoring app id that differs from the one already resolved"
                );
            }
        }
        self.get()
    }

    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.app_id.get().map(String::as_str)
    }
}
