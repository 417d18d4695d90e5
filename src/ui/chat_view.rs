use std::collections::HashMap;
use std::time::Instant;

use super::message_widget::{self, BubbleState};
use crate::config::SUGGESTIONS;
use crate::models::Message;
use crate::platform::CopyFeedback;

pub struct ChatViewState<'a> {
    pub typing: bool,
    pub animations_enabled: bool,
    pub now: Instant,
    /// When each animating message started revealing.
    pub reveal_started: &'a HashMap<String, Instant>,
    pub copy_feedback: &'a CopyFeedback,
}

pub fn render(messages: &[Message], state: &ChatViewState<'_>) -> String {
    if messages.is_empty() && !state.typing {
        return render_empty();
    }

    let mut out = String::new();
    for (i, msg) in messages.iter().enumerate() {
        let bubble = BubbleState {
            animations_enabled: state.animations_enabled,
            reveal_elapsed: state
                .reveal_started
                .get(&msg.id)
                .map(|started| state.now.saturating_duration_since(*started)),
            copied: state.copy_feedback.is_copied(&msg.id, state.now),
        };
        out.push_str(&message_widget::render(i + 1, msg, &bubble));
    }
    if state.typing {
        out.push_str("PAWNIN is typing...\n");
    }
    out
}

fn render_empty() -> String {
    let mut out = String::from("How can I help you today?\n");
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        out.push_str(&format!("  /suggest {}  {}\n", i + 1, suggestion));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state<'a>(
        typing: bool,
        started: &'a HashMap<String, Instant>,
        copy: &'a CopyFeedback,
    ) -> ChatViewState<'a> {
        ChatViewState {
            typing,
            animations_enabled: false,
            now: Instant::now(),
            reveal_started: started,
            copy_feedback: copy,
        }
    }

    #[test]
    fn test_empty_state_lists_suggestions() {
        let started = HashMap::new();
        let copy = CopyFeedback::new();
        let out = render(&[], &state(false, &started, &copy));
        assert!(out.starts_with("How can I help you today?"));
        assert!(out.contains("/suggest 1  Tell me a fun fact"));
        assert!(out.contains("/suggest 4  Creative writing ideas"));
    }

    #[test]
    fn test_messages_numbered_in_order_with_typing_indicator() {
        let started = HashMap::new();
        let copy = CopyFeedback::new();
        let messages = vec![Message::user("first", None), Message::user("second", None)];
        let out = render(&messages, &state(true, &started, &copy));

        let first = out.find("[1] You").unwrap();
        let second = out.find("[2] You").unwrap();
        assert!(first < second);
        assert!(out.ends_with("PAWNIN is typing...\n"));
    }
}
