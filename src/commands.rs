//! Tauri IPC handlers. Thin wrappers over [`crate::state::AppState`]; errors
//! cross the boundary as display strings.

mod api_key;
mod ideas;

pub use api_key::*;
pub use ideas::*;
