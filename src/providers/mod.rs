pub mod pawnin;
pub mod traits;
pub mod types;

pub use pawnin::PawninBackend;
pub use traits::ChatBackend;
pub use types::ChatRequest;
