//! The chat core of DocChat.
//!
//! A [`Session`] holds one user's conversation, uploaded document, and tone.
//! [`ChatService`] exposes one handler per user action:
//!
//! - `on_upload` / `on_reset_upload`: install or forget a document
//! - `on_submit_query`: retrieve context, prompt the model, record the reply
//! - `on_summarize`: bullet-point summary of the conversation
//! - `on_clear_chat`: forget history and document together
//! - `on_set_tone`
//!
//! Generation failures never escape a handler; they become fixed
//! placeholder replies.

pub mod prompt;
pub mod service;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use prompt::{build_answer_prompt, build_summary_prompt, format_history};
pub use service::{
    ChatService, Reply, UploadOutcome, ANSWER_FALLBACK, RESET_UPLOAD_MESSAGE, SUMMARY_FALLBACK,
    UPLOAD_MESSAGE,
};
pub use session::Session;
