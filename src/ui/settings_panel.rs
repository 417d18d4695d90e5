use crate::config::{MAX_TEXT_SCALE, MIN_TEXT_SCALE};
use crate::services::settings::Preferences;

pub fn render(prefs: &Preferences) -> String {
    let on_off = |b: bool| if b { "on" } else { "off" };
    format!(
        "Settings\n  Theme:      {} (/theme)\n  Font size:  {}px [{}-{}] (/font N)\n  Animations: {} (/animations on|off)\n  Clear all chats: /clear\n",
        prefs.theme.as_str(),
        prefs.text_scale,
        MIN_TEXT_SCALE,
        MAX_TEXT_SCALE,
        on_off(prefs.animations_enabled),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shows_current_values() {
        let out = render(&Preferences::default());
        assert!(out.contains("Theme:      dark"));
        assert!(out.contains("Font size:  14px [12-20]"));
        assert!(out.contains("Animations: on"));
    }
}
