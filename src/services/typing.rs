use std::time::Duration;

use crate::config::{TYPING_SETTLE, TYPING_TICK};

/// How long an assistant reply stays flagged as animating: one tick per
/// character plus a short settle.
pub fn animation_duration(text: &str) -> Duration {
    TYPING_TICK * text.chars().count() as u32 + TYPING_SETTLE
}

/// The part of `text` revealed after `elapsed`. The first character shows
/// immediately, then one more per tick.
pub fn visible_prefix(text: &str, elapsed: Duration) -> &str {
    let shown = (elapsed.as_millis() / TYPING_TICK.as_millis()) as usize + 1;
    match text.char_indices().nth(shown) {
        Some((boundary, _)) => &text[..boundary],
        None => text,
    }
}
