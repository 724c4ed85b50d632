use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

use super::secrets::{SecretError, SecretStore};
use super::store::JsonStore;

// ── API Key ──────────────────────────────────────────────────────────────────

/// Key under which older versions kept the API key in plaintext.
pub const LEGACY_API_KEY_STORE_KEY: &str = "apiKey";

/// What the startup migration did. Only used for logging and tests; the
/// caller always gets a usable (possibly empty) active key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// The secure store already held a key; nothing else was touched.
    AlreadySecured,
    /// A plaintext key was moved into the secure store.
    Migrated,
    /// No usable key anywhere.
    NothingToMigrate,
    /// A store call failed; the active key stays empty.
    Failed,
}

/// Owns the in-memory active key and keeps the secure store in step with it.
pub struct ApiKeyManager {
    secrets: Arc<dyn SecretStore>,
    legacy: Arc<JsonStore>,
    active: RwLock<String>,
    /// Held across a whole `set` so the active key and the stored secret
    /// always name the same last writer.
    write_lock: Mutex<()>,
}

impl ApiKeyManager {
    pub fn new(secrets: Arc<dyn SecretStore>, legacy: Arc<JsonStore>) -> Self {
        Self {
            secrets,
            legacy,
            active: RwLock::new(String::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// The key currently used for outbound calls. Empty when none is set.
    pub fn active(&self) -> String {
        match self.active.read() {
            Ok(key) => key.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_active(&self, key: &str) {
        let mut guard = match self.active.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = key.to_string();
    }

    /// Load the key at startup, moving a plaintext key from the legacy store
    /// into the secure store if that is the only copy.
    ///
    /// Never fails: errors are logged and leave the active key empty.
    pub async fn load_and_migrate(&self) -> MigrationOutcome {
        match self.try_load_and_migrate().await {
            Ok(outcome) => {
                tracing::info!(?outcome, "api key loaded");
                outcome
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load or migrate api key");
                MigrationOutcome::Failed
            }
        }
    }

    async fn try_load_and_migrate(&self) -> Result<MigrationOutcome, SecretError> {
        if let Some(stored) = self.read_secret().await?.filter(|k| !k.is_empty()) {
            self.set_active(&stored);
            return Ok(MigrationOutcome::AlreadySecured);
        }

        let legacy = match self.legacy.get_value(LEGACY_API_KEY_STORE_KEY).await {
            Some(Value::String(key)) if !key.trim().is_empty() => key.trim().to_string(),
            _ => return Ok(MigrationOutcome::NothingToMigrate),
        };

        self.write_secret(legacy.clone()).await?;
        self.legacy.delete(LEGACY_API_KEY_STORE_KEY).await;
        if let Err(e) = self.legacy.save().await {
            // The secure copy exists, so the key is still usable; the
            // plaintext copy will be removed on the next successful save.
            tracing::warn!(error = %e, "api key migrated but plaintext copy not removed from disk");
        }
        self.set_active(&legacy);
        Ok(MigrationOutcome::Migrated)
    }

    /// Replace the active key and persist it. A blank key removes the stored
    /// secret. Persistence failures are logged; the in-memory key is updated
    /// regardless.
    pub async fn set(&self, new_key: &str) {
        let key = new_key.trim().to_string();
        let _guard = self.write_lock.lock().await;
        self.set_active(&key);
        if let Err(e) = self.write_secret(key).await {
            tracing::warn!(error = %e, "failed to save api key to secure storage");
        }
    }

    /// Forget the key in memory and in secure storage.
    pub async fn clear(&self) {
        self.set("").await
    }

    async fn read_secret(&self) -> Result<Option<String>, SecretError> {
        let secrets = Arc::clone(&self.secrets);
        tokio::task::spawn_blocking(move || secrets.get()).await?
    }

    async fn write_secret(&self, key: String) -> Result<(), SecretError> {
        let secrets = Arc::clone(&self.secrets);
        tokio::task::spawn_blocking(move || {
            if key.is_empty() {
                secrets.delete()
            } else {
                secrets.set(&key)
            }
        })
        .await?
    }
}
