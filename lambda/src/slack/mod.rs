//! All Slack-specific functionality

pub mod bot;
pub mod client;
pub mod command_parser;
pub mod response_builder;

// Re-export main types for convenience
pub use bot::{Mention, SlackBot};
pub use client::{SlackClient, THREAD_REPLIES_LIMIT};
pub use command_parser::{SlashCommandEvent, parse_form_data};
