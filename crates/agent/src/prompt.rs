//! Prompt assembly.
//!
//! An answer prompt is laid out in a fixed order:
//!
//! ```text
//! {tone instruction}
//!
//! Refer to this document content if relevant:
//! {retrieved chunks, separated by blank lines}
//!
//! Conversation so far:
//! {formatted history}
//!
//! User: {query}
//! Bot:
//! ```
//!
//! Assembly is deterministic: identical inputs always produce identical
//! prompts.

use docchat_core::{ConversationHistory, Tone};

pub const DOCUMENT_CONTEXT_LABEL: &str = "Refer to this document content if relevant:";
pub const HISTORY_LABEL: &str = "Conversation so far:";
pub const SUMMARY_INSTRUCTION: &str =
    "Summarize the following conversation between a user and a bot in bullet points:";

/// Render the history as `User: ...` / `Bot: ...` lines, oldest first.
pub fn format_history(history: &ConversationHistory) -> String {
    let mut formatted = String::new();
    for turn in history {
        formatted.push_str(turn.speaker().prompt_label());
        formatted.push_str(": ");
        formatted.push_str(turn.text());
        formatted.push('\n');
    }
    formatted.trim_end().to_string()
}

/// Build the prompt for answering `query`.
///
/// `history` is expected to already contain the user turn for `query`.
pub fn build_answer_prompt(
    tone: Tone,
    history: &ConversationHistory,
    retrieved_context: &[String],
    query: &str,
) -> String {
    let prompt = format!(
        "{instruction}\n\n{DOCUMENT_CONTEXT_LABEL}\n{context}\n\n{HISTORY_LABEL}\n{history}\n\nUser: {query}\nBot:",
        instruction = tone.instruction(),
        context = retrieved_context.join("\n\n"),
        history = format_history(history),
    );
    prompt.trim().to_string()
}

/// Build the prompt asking for a bullet-point summary of the conversation.
pub fn build_summary_prompt(history: &ConversationHistory) -> String {
    format!("{SUMMARY_INSTRUCTION}\n\n{}\n", format_history(history))
}
