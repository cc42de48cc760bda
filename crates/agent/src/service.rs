//! Command handlers for a chat session.
//!
//! Every user action maps to one handler on [`ChatService`]. A handler takes
//! the session by exclusive reference, updates it, and returns what should
//! be shown to the user.
//!
//! # Query flow
//!
//! 1. Record the user turn
//! 2. Retrieve the most relevant chunks of the current document
//! 3. Assemble the prompt (tone, context, history, query)
//! 4. Generate a reply
//! 5. Record the reply, or a fixed placeholder if generation failed

use std::sync::Arc;

use docchat_config::AppConfig;
use docchat_core::error::{ExtractionError, GenerationError};
use docchat_core::provider::{GenerationRequest, Provider};
use docchat_core::{Tone, Turn};
use docchat_documents::{ChunkSet, Chunker, Upload, DEFAULT_TOP_K};
use tracing::{debug, info, warn};

use crate::prompt::{build_answer_prompt, build_summary_prompt};
use crate::session::Session;

/// Shown in place of an answer when generation fails.
pub const ANSWER_FALLBACK: &str = "❌ Error getting response from the language model.";
/// Shown in place of a summary when generation fails.
pub const SUMMARY_FALLBACK: &str = "❌ Error summarizing conversation.";
pub const UPLOAD_MESSAGE: &str = "✅ File uploaded and processed!";
pub const RESET_UPLOAD_MESSAGE: &str = "File upload reset. You can now upload a new file.";

/// Result of processing an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Name of the uploaded file.
    pub source: String,
    /// Number of chunks the document was split into.
    pub chunks: usize,
    /// Characters of extracted text.
    pub chars: usize,
}

impl UploadOutcome {
    pub fn message(&self) -> &'static str {
        UPLOAD_MESSAGE
    }
}

/// What a generation handler displays.
#[derive(Debug, Clone)]
pub struct Reply {
    /// The generated text, or the fallback placeholder.
    pub text: String,
    /// Chunks placed in the prompt. Always empty for summaries.
    pub context: Vec<String>,
    /// Set when `text` is a placeholder.
    pub error: Option<GenerationError>,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Drives sessions: owns the provider and the generation/retrieval settings.
pub struct ChatService {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    chunker: Chunker,
    top_k: usize,
}

impl ChatService {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            chunker: Chunker::default(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Build a service with every setting taken from `config`.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, config.effective_model())
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
            .with_max_chars(config.chunking.max_chars)
            .with_top_k(config.retrieval.top_k)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the soft chunk length limit used for new uploads.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.chunker = Chunker::new(max_chars);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Extract, chunk, and install an uploaded document.
    ///
    /// The new chunk set replaces any previous one. On error the session is
    /// left untouched.
    pub fn on_upload(
        &self,
        session: &mut Session,
        upload: &Upload,
    ) -> Result<UploadOutcome, ExtractionError> {
        let text = upload.extract_text()?;
        let chunks = self.chunker.chunk(&text);

        let outcome = UploadOutcome {
            source: upload.name.clone(),
            chunks: chunks.len(),
            chars: text.chars().count(),
        };

        session.replace_document(ChunkSet::new(upload.name.clone(), chunks));

        info!(
            session = %session.id(),
            source = %outcome.source,
            mime = %upload.mime,
            chunks = outcome.chunks,
            "Document uploaded"
        );

        Ok(outcome)
    }

    /// Forget the current document so a new one can be uploaded.
    pub fn on_reset_upload(&self, session: &mut Session) -> &'static str {
        session.reset_document();
        debug!(session = %session.id(), "Document reset");
        RESET_UPLOAD_MESSAGE
    }

    pub fn on_set_tone(&self, session: &mut Session, tone: Tone) {
        session.set_tone(tone);
        debug!(session = %session.id(), tone = %tone, "Tone changed");
    }

    /// Answer `query` against the current document and conversation.
    ///
    /// Always records two turns: the query and either the reply or
    /// [`ANSWER_FALLBACK`].
    pub async fn on_submit_query(&self, session: &mut Session, query: &str) -> Reply {
        session.record(Turn::user(query));

        let context = session.document().search(query, self.top_k);
        debug!(
            session = %session.id(),
            retrieved = context.len(),
            "Chunks retrieved"
        );

        let prompt = build_answer_prompt(session.tone(), session.history(), &context, query);

        let (text, error) = match self.generate(prompt).await {
            Ok(text) => (text, None),
            Err(e) => {
                warn!(session = %session.id(), error = %e, "Answer generation failed");
                (ANSWER_FALLBACK.to_string(), Some(e))
            }
        };

        session.record(Turn::assistant(text.clone()));

        info!(
            session = %session.id(),
            turns = session.history().len(),
            reply_len = text.len(),
            "Query answered"
        );

        Reply {
            text,
            context,
            error,
        }
    }

    /// Summarize the conversation so far in bullet points.
    ///
    /// The summary is displayed only; it is not recorded in the history.
    pub async fn on_summarize(&self, session: &mut Session) -> Reply {
        let prompt = build_summary_prompt(session.history());

        let (text, error) = match self.generate(prompt).await {
            Ok(text) => (text, None),
            Err(e) => {
                warn!(session = %session.id(), error = %e, "Summary generation failed");
                (SUMMARY_FALLBACK.to_string(), Some(e))
            }
        };

        info!(session = %session.id(), turns = session.history().len(), "Conversation summarized");

        Reply {
            text,
            context: Vec::new(),
            error,
        }
    }

    /// Start over: drop the history and the uploaded document at once.
    /// The tone is kept.
    pub fn on_clear_chat(&self, session: &mut Session) {
        session.clear_all();
        debug!(session = %session.id(), "Chat cleared");
    }

    async fn generate(&self, prompt: String) -> Result<String, GenerationError> {
        let mut request = GenerationRequest::new(self.model.clone(), prompt);
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;

        let response = self.provider.generate(request).await?;
        Ok(response.text.trim().to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use docchat_core::Speaker;

    const DOC: &str = "The weather is sunny. I like pizza. Forecast shows rain tomorrow.";

    fn text_upload(text: &str) -> Upload {
        Upload::new("doc.txt", "text/plain", text.as_bytes().to_vec())
    }

    fn service(provider: Arc<SequentialMockProvider>) -> ChatService {
        ChatService::new(provider, "mock-model").with_max_chars(30)
    }

    #[test]
    fn upload_installs_chunks() {
        let svc = service(Arc::new(SequentialMockProvider::texts(&[])));
        let mut session = Session::new();

        let outcome = svc.on_upload(&mut session, &text_upload(DOC)).unwrap();

        assert_eq!(outcome.source, "doc.txt");
        assert_eq!(outcome.chunks, 3);
        assert_eq!(outcome.message(), UPLOAD_MESSAGE);
        assert!(session.file_uploaded());
        assert_eq!(session.document().chunks()[1], "I like pizza.");
    }

    #[test]
    fn second_upload_replaces_document() {
        let svc = service(Arc::new(SequentialMockProvider::texts(&[])));
        let mut session = Session::new();

        svc.on_upload(&mut session, &text_upload(DOC)).unwrap();
        svc.on_upload(&mut session, &text_upload("Only one sentence."))
            .unwrap();

        assert_eq!(session.document().chunks(), ["Only one sentence."]);
    }

    #[test]
    fn unsupported_upload_is_empty_but_marked() {
        let svc = service(Arc::new(SequentialMockProvider::texts(&[])));
        let mut session = Session::new();

        let upload = Upload::new("image.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
        let outcome = svc.on_upload(&mut session, &upload).unwrap();

        assert_eq!(outcome.chunks, 0);
        assert!(session.file_uploaded());
        assert!(session.document().is_empty());
    }

    #[test]
    fn failed_extraction_leaves_session_unchanged() {
        let svc = service(Arc::new(SequentialMockProvider::texts(&[])));
        let mut session = Session::new();
        svc.on_upload(&mut session, &text_upload(DOC)).unwrap();

        let bad = Upload::new("bad.txt", "text/plain", vec![0xff, 0xfe, 0xfd]);
        let err = svc.on_upload(&mut session, &bad).unwrap_err();

        assert!(matches!(err, ExtractionError::InvalidUtf8(_)));
        assert_eq!(session.document().len(), 3);
        assert_eq!(session.document().source(), Some("doc.txt"));
    }

    #[test]
    fn reset_upload_clears_document() {
        let svc = service(Arc::new(SequentialMockProvider::texts(&[])));
        let mut session = Session::new();
        svc.on_upload(&mut session, &text_upload(DOC)).unwrap();

        assert_eq!(svc.on_reset_upload(&mut session), RESET_UPLOAD_MESSAGE);
        assert!(!session.file_uploaded());
        assert!(session.document().is_empty());
    }

    #[tokio::test]
    async fn query_records_both_turns() {
        let provider = Arc::new(SequentialMockProvider::texts(&["  It will rain.\n"]));
        let svc = service(provider.clone());
        let mut session = Session::new();
        svc.on_upload(&mut session, &text_upload(DOC)).unwrap();

        let reply = svc
            .on_submit_query(&mut session, "Will it rain tomorrow?")
            .await;

        assert_eq!(reply.text, "It will rain.");
        assert!(!reply.is_fallback());
        assert_eq!(reply.context, vec!["Forecast shows rain tomorrow."]);

        let turns = session.history().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker(), Speaker::User);
        assert_eq!(turns[0].text(), "Will it rain tomorrow?");
        assert_eq!(turns[1].speaker(), Speaker::Assistant);
        assert_eq!(turns[1].text(), "It will rain.");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn prompt_carries_tone_context_and_history() {
        let provider = Arc::new(SequentialMockProvider::texts(&["first", "second"]));
        let svc = service(provider.clone());
        let mut session = Session::with_tone(Tone::Professional);
        svc.on_upload(&mut session, &text_upload(DOC)).unwrap();

        svc.on_submit_query(&mut session, "hello").await;
        svc.on_submit_query(&mut session, "pizza?").await;

        let prompts = provider.prompts();
        assert!(prompts[1].starts_with(Tone::Professional.instruction()));
        assert!(prompts[1].contains("I like pizza."));
        assert!(prompts[1].contains("User: hello\nBot: first\nUser: pizza?"));
        assert!(prompts[1].ends_with("User: pizza?\nBot:"));
    }

    #[tokio::test]
    async fn query_without_document_has_no_context() {
        let provider = Arc::new(SequentialMockProvider::texts(&["hi"]));
        let svc = service(provider.clone());
        let mut session = Session::new();

        let reply = svc.on_submit_query(&mut session, "weather?").await;

        assert!(reply.context.is_empty());
        assert!(provider.prompts()[0].contains("Refer to this document content if relevant:\n\n\n"));
    }

    #[tokio::test]
    async fn generation_failure_records_placeholder() {
        let provider = Arc::new(SequentialMockProvider::failing(GenerationError::Timeout(
            "120s elapsed".into(),
        )));
        let svc = service(provider);
        let mut session = Session::new();

        let reply = svc.on_submit_query(&mut session, "anyone there?").await;

        assert_eq!(reply.text, ANSWER_FALLBACK);
        assert!(matches!(reply.error, Some(GenerationError::Timeout(_))));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history().turns()[1].text(), ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn placeholder_appears_in_next_prompt() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            Err(GenerationError::Network("connection refused".into())),
            Ok(make_text_response("back online")),
        ]));
        let svc = service(provider.clone());
        let mut session = Session::new();

        svc.on_submit_query(&mut session, "one").await;
        svc.on_submit_query(&mut session, "two").await;

        assert!(provider.prompts()[1].contains(&format!("User: one\nBot: {ANSWER_FALLBACK}\nUser: two")));
        assert_eq!(session.history().len(), 4);
    }

    #[tokio::test]
    async fn summarize_does_not_touch_history() {
        let provider = Arc::new(SequentialMockProvider::texts(&["answer", "- greeted the bot"]));
        let svc = service(provider.clone());
        let mut session = Session::new();
        svc.on_submit_query(&mut session, "hi").await;

        let summary = svc.on_summarize(&mut session).await;

        assert_eq!(summary.text, "- greeted the bot");
        assert_eq!(session.history().len(), 2);
        assert_eq!(
            provider.prompts()[1],
            "Summarize the following conversation between a user and a bot in bullet points:\n\nUser: hi\nBot: answer\n"
        );
    }

    #[tokio::test]
    async fn summarize_failure_uses_summary_placeholder() {
        let provider = Arc::new(SequentialMockProvider::failing(
            GenerationError::AuthenticationFailed("bad key".into()),
        ));
        let svc = service(provider);
        let mut session = Session::new();

        let summary = svc.on_summarize(&mut session).await;

        assert_eq!(summary.text, SUMMARY_FALLBACK);
        assert!(summary.is_fallback());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn clear_chat_resets_history_and_document() {
        let provider = Arc::new(SequentialMockProvider::texts(&["sure"]));
        let svc = service(provider);
        let mut session = Session::new();
        svc.on_upload(&mut session, &text_upload(DOC)).unwrap();
        svc.on_set_tone(&mut session, Tone::Empathetic);
        svc.on_submit_query(&mut session, "pizza").await;

        svc.on_clear_chat(&mut session);

        assert!(session.history().is_empty());
        assert!(session.document().is_empty());
        assert!(!session.file_uploaded());
        assert_eq!(session.tone(), Tone::Empathetic);
    }

    #[tokio::test]
    async fn query_after_clear_has_no_context() {
        let provider = Arc::new(SequentialMockProvider::texts(&["no idea"]));
        let svc = service(provider.clone());
        let mut session = Session::new();
        svc.on_upload(&mut session, &text_upload("A. B.")).unwrap();

        svc.on_clear_chat(&mut session);
        let reply = svc.on_submit_query(&mut session, "A").await;

        assert!(reply.context.is_empty());
        assert_eq!(session.history().len(), 2);
        assert!(!provider.prompts()[0].contains("A. B."));
    }

    #[test]
    fn from_config_applies_settings() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 5;
        config.default_model = "gemini-test".into();

        let svc = ChatService::from_config(
            Arc::new(SequentialMockProvider::texts(&[])),
            &config,
        );

        assert_eq!(svc.model(), "gemini-test");
        assert_eq!(svc.top_k(), 5);
        assert_eq!(svc.provider_name(), "sequential_mock");
    }
}
