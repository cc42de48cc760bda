//! Per-user chat session state.

use chrono::{DateTime, Utc};
use docchat_core::{ConversationHistory, SessionId, Tone, Turn};
use docchat_documents::ChunkSet;

/// Everything one user's conversation carries between interactions.
///
/// State only changes through [`ChatService`](crate::ChatService) handlers.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    history: ConversationHistory,
    document: ChunkSet,
    tone: Tone,
    file_uploaded: bool,
    created_at: DateTime<Utc>,
}

impl Session {
    /// A fresh session: empty history, no document, default tone.
    pub fn new() -> Self {
        Self::with_tone(Tone::default())
    }

    pub fn with_tone(tone: Tone) -> Self {
        Self {
            id: SessionId::new(),
            history: ConversationHistory::new(),
            document: ChunkSet::default(),
            tone,
            file_uploaded: false,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Chunks of the current document. Empty when nothing is uploaded.
    pub fn document(&self) -> &ChunkSet {
        &self.document
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    /// Whether an upload has been processed since the last reset.
    ///
    /// Can be true while the chunk set is empty, e.g. for an upload of an
    /// unsupported type.
    pub fn file_uploaded(&self) -> bool {
        self.file_uploaded
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn record(&mut self, turn: Turn) {
        self.history.push(turn);
    }

    pub(crate) fn replace_document(&mut self, document: ChunkSet) {
        self.document = document;
        self.file_uploaded = true;
    }

    pub(crate) fn reset_document(&mut self) {
        self.document = ChunkSet::default();
        self.file_uploaded = false;
    }

    pub(crate) fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Forget the conversation and the document together. The tone is kept.
    pub(crate) fn clear_all(&mut self) {
        self.clear_history();
        self.reset_document();
    }

    pub(crate) fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
