use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::models::Attachment;
use crate::platform::{DictationEvent, DictationUpdate, PlatformError, SpeechInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationState {
    Idle,
    Listening,
}

/// What the composer hands to the session store on send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub text: String,
    pub attachment: Option<Attachment>,
}

/// Draft state behind the input bar.
pub struct Composer {
    draft: String,
    attachment: Option<Attachment>,
    dictation: DictationState,
    /// Number of the latest dictation session; events from older ones are stale.
    dictation_session: u64,
    disabled: bool,
    speech: Arc<dyn SpeechInput>,
    dictation_tx: UnboundedSender<DictationUpdate>,
}

impl Composer {
    pub fn new(speech: Arc<dyn SpeechInput>, dictation_tx: UnboundedSender<DictationUpdate>) -> Self {
        Self {
            draft: String::new(),
            attachment: None,
            dictation: DictationState::Idle,
            dictation_session: 0,
            disabled: false,
            speech,
            dictation_tx,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn dictation_state(&self) -> DictationState {
        self.dictation
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    /// Dictation replaces the draft instead of appending to it.
    pub fn set_draft_from_dictation(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    /// Attach a file, replacing any previously attached one.
    pub fn attach(&mut self, path: impl AsRef<Path>) -> &Attachment {
        self.attachment.insert(Attachment::from_path(path))
    }

    pub fn detach(&mut self) -> Option<Attachment> {
        self.attachment.take()
    }

    /// Take the draft for sending. Nothing happens while disabled or when
    /// there is neither text nor a file.
    pub fn submit(&mut self) -> Option<Submission> {
        let text = self.draft.trim();
        if (text.is_empty() && self.attachment.is_none()) || self.disabled {
            return None;
        }

        let submission = Submission {
            text: text.to_string(),
            attachment: self.attachment.take(),
        };
        self.draft.clear();
        Some(submission)
    }

    /// Mic button. Errors when speech recognition is unavailable; the state
    /// stays idle in that case. Stopping cancels only the current session.
    pub fn toggle_dictation(&mut self) -> Result<DictationState, PlatformError> {
        match self.dictation {
            DictationState::Idle => {
                let session = self.dictation_session + 1;
                self.speech.start(session, self.dictation_tx.clone())?;
                self.dictation_session = session;
                self.dictation = DictationState::Listening;
            }
            DictationState::Listening => {
                self.speech.stop();
                self.dictation = DictationState::Idle;
            }
        }
        tracing::debug!("Dictation {:?}", self.dictation);
        Ok(self.dictation)
    }

    pub fn handle_dictation_event(&mut self, update: DictationUpdate) {
        if update.session != self.dictation_session {
            tracing::debug!("Ignoring event from dictation session {}", update.session);
            return;
        }

        match update.event {
            DictationEvent::Transcript(text) => {
                if self.dictation == DictationState::Listening {
                    self.set_draft_from_dictation(&text);
                } else {
                    tracing::debug!("Ignoring transcript after dictation stopped");
                }
            }
            DictationEvent::End => self.dictation = DictationState::Idle,
            DictationEvent::Error(e) => {
                tracing::warn!("Speech recognition error: {}", e);
                self.dictation = DictationState::Idle;
            }
        }
    }
}
