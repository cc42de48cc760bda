//! # DocChat Core
//!
//! Domain types, traits, and error definitions for the DocChat document
//! assistant. This crate has **zero framework dependencies**: it defines the
//! domain model that all other crates implement against.
//!
//! The language-model backend is defined as a trait here; implementations
//! live in `docchat-providers`, so the chat core can be tested against
//! scripted stand-ins.

pub mod error;
pub mod message;
pub mod provider;
pub mod tone;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ExtractionError, FeedbackError, GenerationError, Result};
pub use message::{ConversationHistory, SessionId, Speaker, Turn};
pub use provider::{GenerationRequest, GenerationResponse, Provider, Usage};
pub use tone::Tone;
