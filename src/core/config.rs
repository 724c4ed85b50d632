use std::path::PathBuf;
use std::time::Duration;

use super::paths::{get_app_data_dir, STORE_FILE_NAME};

// ── App Config ───────────────────────────────────────────────────────────────

pub const ENV_DATA_DIR: &str = "IDEA_GENERATOR_DATA_DIR";
pub const ENV_API_BASE_URL: &str = "IDEA_GENERATOR_API_BASE_URL";
pub const ENV_MODEL: &str = "IDEA_GENERATOR_MODEL";

/// Keychain entry name used by every release so far; changing it orphans
/// keys that are already stored.
pub const KEYRING_SERVICE: &str = "ai-idea-prompt-generator";
pub const KEYRING_ACCOUNT: &str = "anthropic_api_key";

const DEFAULT_API_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Everything the backend needs to know before it can build its state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding `settings.json`.
    pub data_dir: PathBuf,
    /// Keyring service name for the API key entry.
    pub keyring_service: String,
    /// Keyring account name for the API key entry.
    pub keyring_account: String,
    /// Base URL of the messages API, without a trailing slash.
    pub api_base_url: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Defaults with an explicit data directory. Tests use this with a tempdir.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            keyring_service: KEYRING_SERVICE.to_string(),
            keyring_account: KEYRING_ACCOUNT.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }

    /// [`AppConfig::from_env_in`] with the data dir resolved without Tauri.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self::from_env_in(get_app_data_dir()?))
    }

    /// Defaults rooted at `default_data_dir`, overlaid with
    /// `IDEA_GENERATOR_*` environment variables. Empty variables are ignored.
    pub fn from_env_in(default_data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = match env_override(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir.into(),
        };
        let mut config = Self::with_data_dir(data_dir);
        if let Some(url) = env_override(ENV_API_BASE_URL) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = env_override(ENV_MODEL) {
            config.model = model;
        }
        config
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_path_is_inside_data_dir() {
        let config = AppConfig::with_data_dir("/tmp/ideas");
        assert_eq!(config.store_path(), PathBuf::from("/tmp/ideas/settings.json"));
        assert_eq!(config.keyring_service, "ai-idea-prompt-generator");
        assert_eq!(config.keyring_account, "anthropic_api_key");
    }

    #[test]
    fn test_defaults_point_at_messages_api() {
        let config = AppConfig::with_data_dir("/tmp/ideas");
        assert_eq!(config.api_base_url, "https://api.anthropic.com");
        assert!(!config.model.is_empty());
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_data_dir_env_overrides_default() {
        std::env::remove_var(ENV_DATA_DIR);
        let config = AppConfig::from_env_in("/resolved/by/tauri");
        assert_eq!(config.data_dir, PathBuf::from("/resolved/by/tauri"));

        std::env::set_var(ENV_DATA_DIR, "/custom/data");
        let config = AppConfig::from_env_in("/resolved/by/tauri");
        std::env::remove_var(ENV_DATA_DIR);
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
    }
}
