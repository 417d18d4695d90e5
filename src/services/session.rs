use uuid::Uuid;

use crate::models::{Attachment, Conversation, Message};
use crate::services::conversation::truncate_title;

/// In-memory registry of conversations for the lifetime of the process.
///
/// Conversations are kept most-recently-created first. The active id is
/// either a registered conversation or a freshly allocated "new chat" id that
/// gets registered when its first message is sent. The displayed message
/// list is always the active conversation's stored list.
#[derive(Debug, Default)]
pub struct SessionStore {
    conversations: Vec<Conversation>,
    active_id: Option<String>,
    sidebar_open: bool,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_id.as_deref().and_then(|id| self.conversation(id))
    }

    /// Messages currently on screen.
    pub fn messages(&self) -> &[Message] {
        self.active_conversation()
            .map(|c| c.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    /// Start an empty chat. It shows up in the history once something is sent.
    pub fn create_conversation(&mut self) -> String {
        let id = Uuid::new_v4().to_string();
        tracing::debug!("New chat {}", id);
        self.active_id = Some(id.clone());
        self.sidebar_open = false;
        id
    }

    /// Returns false (and changes nothing) when `id` is unknown.
    pub fn select_conversation(&mut self, id: &str) -> bool {
        self.sidebar_open = false;
        if self.conversation(id).is_none() {
            tracing::debug!("Ignoring selection of unknown conversation {}", id);
            return false;
        }
        self.active_id = Some(id.to_string());
        true
    }

    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != id);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
        }
        self.conversations.len() != before
    }

    pub fn clear_all(&mut self) {
        self.conversations.clear();
        self.active_id = None;
    }

    /// Append a user message to the active conversation, registering a new
    /// conversation titled after `text` if there is none yet. Returns the
    /// message and the id of the conversation it went to, so the reply can be
    /// routed back there.
    pub fn append_user_message(
        &mut self,
        text: &str,
        attachment: Option<Attachment>,
    ) -> (Message, String) {
        let message = Message::user(text, attachment);

        if let Some(conv) = self.active_conversation_mut() {
            conv.messages.push(message.clone());
            return (message, conv.id.clone());
        }

        let id = self
            .active_id
            .take()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut conv = Conversation::new(id.clone(), truncate_title(text));
        conv.messages.push(message.clone());
        tracing::debug!("Registered conversation {} ({:?})", id, conv.title);

        self.conversations.insert(0, conv);
        self.active_id = Some(id.clone());
        (message, id)
    }

    /// Append an assistant message to whatever is active right now.
    #[allow(dead_code)]
    pub fn append_assistant_message(&mut self, text: &str) -> Option<Message> {
        let id = self.active_conversation()?.id.clone();
        self.append_assistant_reply(&id, text)
    }

    /// Append an assistant reply to the conversation it was requested from,
    /// which may no longer be the active one. Dropped if that conversation was
    /// deleted in the meantime.
    pub fn append_assistant_reply(&mut self, conversation_id: &str, text: &str) -> Option<Message> {
        let Some(conv) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        else {
            tracing::debug!(
                "Dropping reply for conversation {} which no longer exists",
                conversation_id
            );
            return None;
        };

        let message = Message::assistant(text);
        conv.messages.push(message.clone());
        Some(message)
    }

    pub fn clear_animating_flag(&mut self, message_id: &str) {
        for conv in &mut self.conversations {
            if let Some(msg) = conv.messages.iter_mut().find(|m| m.id == message_id) {
                msg.is_animating = false;
                return;
            }
        }
    }

    fn active_conversation_mut(&mut self) -> Option<&mut Conversation> {
        let id = self.active_id.as_deref()?;
        self.conversations.iter_mut().find(|c| c.id == id)
    }
}
