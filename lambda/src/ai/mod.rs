//! All LLM functionality

pub mod completion;
pub mod prompt;

// Re-export main types for convenience
pub use completion::CompletionClient;
pub use prompt::{DEFAULT_IMAGE_PROMPT, build_prompt_with_list};
