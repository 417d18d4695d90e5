use chrono::Local;

use crate::models::Conversation;

pub fn render(conversations: &[Conversation], active_id: Option<&str>) -> String {
    let mut out = String::from("+ New Chat (/new)\n");
    if conversations.is_empty() {
        out.push_str("  No chat history yet\n");
        return out;
    }

    for (i, conv) in conversations.iter().enumerate() {
        let marker = if active_id == Some(conv.id.as_str()) {
            '>'
        } else {
            ' '
        };
        let date = conv.created_at.with_timezone(&Local).format("%Y-%m-%d");
        out.push_str(&format!("{} {:>2}. {}  ({})\n", marker, i + 1, conv.title, date));
    }
    out
}
