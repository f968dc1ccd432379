// Gatekeeper common library - main library exports

pub mod messages;
pub mod settings;
pub mod settings_history;
pub mod types;
pub mod validation;

// Flattened re-exports
pub use self::types::*;
