//! Plain-text presentation. Everything here renders from state it is handed
//! and keeps none of its own; `input_area` turns typed lines into intents.

pub mod chat_view;
pub mod header;
pub mod input_area;
pub mod message_widget;
pub mod settings_panel;
pub mod sidebar;
pub mod splash;
