use std::sync::Arc;

use crate::core::{
    AnthropicClient, ApiKeyManager, AppConfig, GenerateError, Idea, IdeaGenerator, IdeaHistory,
    JsonStore, KeyringSecretStore, MigrationOutcome, SecretStore,
};

// ── App State ────────────────────────────────────────────────────────────────

/// Everything the commands need, built once before the window is usable and
/// owned by the shell for the life of the process.
pub struct AppState {
    store: Arc<JsonStore>,
    api_key: ApiKeyManager,
    history: IdeaHistory,
    generator: Arc<dyn IdeaGenerator>,
}

impl AppState {
    /// Build the state for `config` against the OS keychain and the real API.
    pub async fn initialize(config: &AppConfig) -> Result<Self, GenerateError> {
        let secrets = Arc::new(KeyringSecretStore::new(
            &config.keyring_service,
            &config.keyring_account,
        ));
        let generator = Arc::new(AnthropicClient::new(config)?);
        Ok(Self::initialize_with(config, secrets, generator).await)
    }

    /// Shared store handle, key migration, history load. One store handle
    /// serves both the legacy key and the history.
    pub async fn initialize_with(
        config: &AppConfig,
        secrets: Arc<dyn SecretStore>,
        generator: Arc<dyn IdeaGenerator>,
    ) -> Self {
        let store = Arc::new(JsonStore::new(config.store_path()));
        tracing::info!(path = %store.path().display(), "opening store");

        let api_key = ApiKeyManager::new(secrets, Arc::clone(&store));
        let outcome = api_key.load_and_migrate().await;
        if outcome == MigrationOutcome::Migrated {
            tracing::info!("moved api key from plaintext settings into secure storage");
        }

        let history = IdeaHistory::new(Arc::clone(&store));
        history.load().await;

        Self {
            store,
            api_key,
            history,
            generator,
        }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn api_key(&self) -> &ApiKeyManager {
        &self.api_key
    }

    pub fn history(&self) -> &IdeaHistory {
        &self.history
    }

    /// Generate an idea with the active key and record it in history.
    pub async fn generate_idea(&self, category: &str) -> Result<Idea, GenerateError> {
        let key = self.api_key.active();
        if key.is_empty() {
            return Err(GenerateError::MissingApiKey);
        }
        let content = self.generator.generate(category, &key).await?;
        let idea = Idea::new(category, content);
        self.history.append(idea.clone()).await;
        Ok(idea)
    }

    /// Check `candidate` against the API without storing it.
    pub async fn test_api_key(&self, candidate: &str) -> Result<bool, GenerateError> {
        self.generator.validate_key(candidate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IdeaResponse, MemorySecretStore, StaticGenerator, HISTORY_LIMIT};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn generator(valid_key: &str) -> Arc<StaticGenerator> {
        Arc::new(StaticGenerator {
            response: IdeaResponse {
                concept: "Recipe swap".to_string(),
                platform: "Mobile".to_string(),
                target_audience: "Home cooks".to_string(),
                key_features: vec!["swap".to_string(), "rate".to_string()],
                monetization: "Ads".to_string(),
                value_proposition: "Cook more".to_string(),
            },
            valid_key: valid_key.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_initialize_migrates_and_loads_history() {
        let dir = tempdir().unwrap();
        let config = AppConfig::with_data_dir(dir.path());
        std::fs::write(
            config.store_path(),
            json!({
                "apiKey": "sk-test-123",
                "ideas": [{
                    "id": "old",
                    "timestamp": 1,
                    "category": "SaaS",
                    "concept": "c",
                    "platform": "Web",
                    "target_audience": "t",
                    "key_features": [],
                    "monetization": "m",
                    "value_proposition": "v"
                }]
            })
            .to_string(),
        )
        .unwrap();
        let secrets = Arc::new(MemorySecretStore::default());

        let state = AppState::initialize_with(&config, secrets.clone(), generator("sk-test-123")).await;

        assert_eq!(state.api_key().active(), "sk-test-123");
        assert_eq!(secrets.current().as_deref(), Some("sk-test-123"));
        assert!(state.store().get_value("apiKey").await.is_none());
        let ideas = state.history().list().await;
        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].id, "old");
    }

    #[tokio::test]
    async fn test_generate_records_idea() {
        let dir = tempdir().unwrap();
        let config = AppConfig::with_data_dir(dir.path());
        let secrets = Arc::new(MemorySecretStore::with_value("sk-good"));
        let state = AppState::initialize_with(&config, secrets, generator("sk-good")).await;

        let idea = state.generate_idea("Food & Beverage").await.unwrap();
        assert_eq!(idea.category, "Food & Beverage");
        assert_eq!(idea.content.concept, "Recipe swap");

        let ideas = state.history().list().await;
        assert_eq!(ideas, vec![idea.clone()]);

        let raw: Value =
            serde_json::from_str(&std::fs::read_to_string(config.store_path()).unwrap()).unwrap();
        assert_eq!(raw["ideas"][0]["id"], json!(idea.id));
        assert_eq!(raw["ideas"][0]["target_audience"], json!("Home cooks"));
    }

    #[tokio::test]
    async fn test_generate_without_key_skips_generator() {
        let dir = tempdir().unwrap();
        let config = AppConfig::with_data_dir(dir.path());
        let fake = generator("sk-good");
        let state =
            AppState::initialize_with(&config, Arc::new(MemorySecretStore::default()), fake.clone()).await;

        let err = state.generate_idea("SaaS").await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingApiKey));
        assert!(err.is_api_key_error());
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
        assert!(state.history().list().await.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_key_leaves_history_alone() {
        let dir = tempdir().unwrap();
        let config = AppConfig::with_data_dir(dir.path());
        let secrets = Arc::new(MemorySecretStore::with_value("sk-stale"));
        let state = AppState::initialize_with(&config, secrets, generator("sk-good")).await;

        let err = state.generate_idea("SaaS").await.unwrap_err();
        assert!(matches!(err, GenerateError::InvalidApiKey));
        assert!(state.history().list().await.is_empty());

        assert!(state.test_api_key("sk-good").await.unwrap());
        state.api_key().set("sk-good").await;
        assert!(state.generate_idea("SaaS").await.is_ok());
    }

    #[tokio::test]
    async fn test_history_stays_capped_through_generation() {
        let dir = tempdir().unwrap();
        let config = AppConfig::with_data_dir(dir.path());
        let secrets = Arc::new(MemorySecretStore::with_value("sk-good"));
        let state = AppState::initialize_with(&config, secrets, generator("sk-good")).await;

        let mut last = None;
        for _ in 0..(HISTORY_LIMIT + 3) {
            last = Some(state.generate_idea("Gaming").await.unwrap());
        }
        let ideas = state.history().list().await;
        assert_eq!(ideas.len(), HISTORY_LIMIT);
        assert_eq!(Some(&ideas[0]), last.as_ref());
    }

    #[tokio::test]
    async fn test_failing_keychain_still_starts() {
        let dir = tempdir().unwrap();
        let config = AppConfig::with_data_dir(dir.path());
        let state = AppState::initialize_with(
            &config,
            Arc::new(MemorySecretStore::failing()),
            generator("sk-good"),
        )
        .await;

        assert_eq!(state.api_key().active(), "");
        assert!(state.history().list().await.is_empty());
    }
}
