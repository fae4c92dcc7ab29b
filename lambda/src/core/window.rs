//! Thread context windowing.
//!
//! Picks the mention plus a bounded run of the replies leading up to it, so
//! the completion prompt sees recent conversation without the bot's own
//! earlier output.

use crate::core::models::ThreadMessage;

/// Returns the message with `target_ts` preceded by up to `max_preceding`
/// earlier messages, oldest first.
///
/// Messages authored by `self_app_id` are skipped and do not count towards
/// `max_preceding`. The target itself is always kept, even if the bot wrote
/// it. An absent target yields an empty window.
#[must_use]
pub fn window(
    messages: &[ThreadMessage],
    target_ts: &str,
    max_preceding: usize,
    self_app_id: Option<&str>,
) -> Vec<ThreadMessage> {
    let Some(target_idx) = messages.iter().rposition(|m| m.ts == target_ts) else {
        return Vec::new();
    };

    let is_self = |m: &ThreadMessage| self_app_id.is_some_and(|id| m.is_authored_by(id));

    let mut selected: Vec<&ThreadMessage> = messages[..target_idx]
        .iter()
        .rev()
        .filter(|m| !is_self(*m))
        .take(max_preceding)
        .collect();
    selected.reverse();
    selected.push(&messages[target_idx]);

    selected.into_iter().cloned().collect()
}

/// [`window`] bound to the bot's app id and the configured window size.
#[derive(Debug, Clone)]
pub struct ThreadWindower {
    self_app_id: Option<String>,
    max_preceding: usize,
}

impl ThreadWindower {
    #[must_use]
    pub fn new(self_app_id: Option<&str>, max_preceding: usize) -> Self {
        Self {
            self_app_id: self_app_id.filter(|id| !id.is_empty()).map(ToString::to_string),
            max_preceding,
        }
    }

    #[must_use]
    pub fn window(&self, messages: &[ThreadMessage], target_ts: &str) -> Vec<ThreadMessage> {
        window(
            messages,
            target_ts,
            self.max_preceding,
            self.self_app_id.as_deref(),
        )
    }
}
