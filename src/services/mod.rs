pub mod chat;
pub mod composer;
pub mod conversation;
pub mod database;
pub mod session;
pub mod settings;
pub mod splash;
pub mod typing;

pub use chat::ChatClient;
pub use composer::Composer;
pub use database::Database;
pub use session::SessionStore;
pub use settings::PreferenceStore;
