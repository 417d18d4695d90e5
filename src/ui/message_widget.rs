use std::time::Duration;

use chrono::Local;

use crate::models::Message;
use crate::services::typing::visible_prefix;

/// Per-bubble view state owned by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleState {
    pub animations_enabled: bool,
    /// Time since the reveal started, for messages still animating.
    pub reveal_elapsed: Option<Duration>,
    pub copied: bool,
}

pub fn render(index: usize, message: &Message, state: &BubbleState) -> String {
    let time = message.created_at.with_timezone(&Local).format("%H:%M");
    let mut out = format!("[{}] {} · {}", index, message.role.display_name(), time);
    if !message.is_user() && state.copied {
        out.push_str("  (Copied to clipboard!)");
    }
    out.push('\n');

    if let Some(att) = &message.attachment {
        out.push_str(&format!("    + {} ({})\n", att.filename, att.kind.as_str()));
    }

    let animating = message.is_animating && state.animations_enabled;
    let body = if animating {
        let shown = visible_prefix(&message.content, state.reveal_elapsed.unwrap_or_default());
        format!("{}▌", shown)
    } else {
        message.content.clone()
    };

    for line in body.lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attachment;

    #[test]
    fn test_user_bubble_with_attachment() {
        let msg = Message::user("look at this", Some(Attachment::from_path("/tmp/cat.png")));
        let out = render(1, &msg, &BubbleState::default());
        assert!(out.starts_with("[1] You · "));
        assert!(out.contains("    + cat.png (image)\n"));
        assert!(out.ends_with("    look at this\n"));
    }

    #[test]
    fn test_animating_reply_is_partially_revealed() {
        let msg = Message::assistant("Hello there");
        let state = BubbleState {
            animations_enabled: true,
            reveal_elapsed: Some(Duration::from_millis(60)),
            copied: false,
        };
        let out = render(2, &msg, &state);
        assert!(out.contains("    Hel▌\n"));
    }

    #[test]
    fn test_animations_off_shows_full_text() {
        let msg = Message::assistant("Hello there");
        let out = render(2, &msg, &BubbleState::default());
        assert!(out.contains("    Hello there\n"));
        assert!(!out.contains('▌'));
    }

    #[test]
    fn test_copied_acknowledgement() {
        let mut msg = Message::assistant("copy me");
        msg.is_animating = false;
        let state = BubbleState {
            copied: true,
            ..Default::default()
        };
        assert!(render(1, &msg, &state).contains("(Copied to clipboard!)"));
    }
}
