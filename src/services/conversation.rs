use crate::config::TITLE_MAX_CHARS;

/// Derive a conversation title from the first message: the first
/// `TITLE_MAX_CHARS` characters, with `...` appended only when something was
/// cut off.
pub fn truncate_title(text: &str) -> String {
    match text.char_indices().nth(TITLE_MAX_CHARS) {
        Some((boundary, _)) => format!("{}...", &text[..boundary]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_unchanged() {
        assert_eq!(truncate_title("Hello"), "Hello");
        assert_eq!(truncate_title(""), "");
    }

    #[test]
    fn test_exactly_thirty_chars_has_no_ellipsis() {
        let text = "a".repeat(30);
        assert_eq!(truncate_title(&text), text);
    }

    #[test]
    fn test_long_text_is_cut_with_ellipsis() {
        let title = truncate_title("Hello there, how are you today friend?");
        assert_eq!(title, "Hello there, how are you today...");
        assert_eq!(title.chars().count(), 33);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "é".repeat(31);
        let title = truncate_title(&text);
        assert_eq!(title, format!("{}...", "é".repeat(30)));
    }
}
