//! Storage and generation core: everything the desktop shell calls into.
//!
//! Nothing in here depends on Tauri, so it builds and tests headless.

mod api_key;
mod config;
mod generator;
mod history;
mod paths;
mod secrets;
mod store;

pub use api_key::{ApiKeyManager, MigrationOutcome, LEGACY_API_KEY_STORE_KEY};
pub use config::{AppConfig, ENV_API_BASE_URL, ENV_DATA_DIR, ENV_MODEL};
pub use generator::{AnthropicClient, GenerateError, IdeaGenerator, ALL_CATEGORIES, CATEGORIES};
pub use history::{Idea, IdeaHistory, IdeaResponse, HISTORY_LIMIT, HISTORY_STORE_KEY};
pub use paths::{get_app_data_dir, APP_IDENTIFIER, STORE_FILE_NAME};
pub use secrets::{KeyringSecretStore, SecretError, SecretStore};
pub use store::{Document, JsonStore, StoreError};

#[cfg(test)]
pub(crate) use generator::StaticGenerator;
#[cfg(test)]
pub(crate) use secrets::MemorySecretStore;
