//! LLM Provider implementations for DocChat.
//!
//! All providers implement the `docchat_core::Provider` trait.
//! The router selects the correct provider based on configuration.

mod http;

pub mod gemini;
pub mod openai_compat;
pub mod router;

pub use gemini::GeminiProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::{build_from_config, ProviderRouter};
