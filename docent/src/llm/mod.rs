mod api;
pub mod prompts;
mod provider;

pub use api::{Completion, JsonCompletion, LlmApiClient};
pub(crate) use api::strip_code_fences;
pub use provider::{ChatMessage, CompletionOptions, LlmBackend, LlmProvider};
