//! Configuration, data model and the thread-context logic shared by both Lambdas

pub mod config;
pub mod identity;
pub mod models;
pub mod window;

pub use identity::BotIdentity;
pub use window::{ThreadWindower, window};
