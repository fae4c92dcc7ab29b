use serde::{Deserialize, Serialize};

/// A single reply as returned by Slack's `conversations.replies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub ts: String,
    #[serde(default)]
    pub text: String,
    /// Present only on messages posted by an app.
    #[serde(rename = "app_id", default, skip_serializing_if = "Option::is_none")]
    pub author_app_id: Option<String>,
}

impl ThreadMessage {
    #[must_use]
    pub fn new(ts: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            ts: ts.into(),
            text: text.into(),
            author_app_id: None,
        }
    }

    #[must_use]
    pub fn from_app(
        ts: impl Into<String>,
        text: impl Into<String>,
        app_id: impl Into<String>,
    ) -> Self {
        Self {
            author_app_id: Some(app_id.into()),
            ..Self::new(ts, text)
        }
    }

    /// True when this message was posted by the app identified by `app_id`.
    #[must_use]
    pub fn is_authored_by(&self, app_id: &str) -> bool {
        self.author_app_id.as_deref() == Some(app_id)
    }
}

/// Keywords and an image prompt derived from thread context by the LLM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImagePromptSuggestion {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub prompt: String,
}

/// Work item handed from the API Lambda to the worker over SQS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageTask {
    /// The bot was mentioned in a channel or thread.
    Mention {
        correlation_id: String,
        api_app_id: String,
        channel_id: String,
        ts: String,
        thread_ts: Option<String>,
        text: String,
    },
    /// `/sum-image <prompt>` slash command.
    Direct {
        correlation_id: String,
        user_id: String,
        channel_id: String,
        text: String,
        response_url: String,
    },
}

impl ImageTask {
    #[must_use]
    pub fn correlation_id(&self) -> &str {
        match self {
            ImageTask::Mention { correlation_id, .. } | ImageTask::Direct { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

/// Timestamp a reply should be threaded under: the thread parent when the
/// message already lives in a thread, otherwise the message itself.
#[must_use]
pub fn thread_anchor<'a>(ts: &'a str, thread_ts: Option<&'a str>) -> &'a str {
    thread_ts.unwrap_or(ts)
}
