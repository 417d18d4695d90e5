use crate::config::APP_NAME;
use crate::services::settings::Theme;

pub fn render(theme: Theme, sidebar_open: bool, active_title: Option<&str>) -> String {
    let menu = if sidebar_open { "[x]" } else { "[=]" };
    let title = active_title.unwrap_or("New Chat");
    format!("{} {} · {} ({})", menu, APP_NAME, title, theme.as_str())
}
