use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::store::JsonStore;

// ── Idea History ─────────────────────────────────────────────────────────────

/// Store key holding the history array.
pub const HISTORY_STORE_KEY: &str = "ideas";

/// Most ideas kept; older ones are dropped on append.
pub const HISTORY_LIMIT: usize = 50;

/// The six content fields returned by the generator.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IdeaResponse {
    pub concept: String,
    pub platform: String,
    pub target_audience: String,
    pub key_features: Vec<String>,
    pub monetization: String,
    pub value_proposition: String,
}

/// One generated idea as kept in history.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Idea {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub category: String,
    #[serde(flatten)]
    pub content: IdeaResponse,
}

impl Idea {
    pub fn new(category: &str, content: IdeaResponse) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            category: category.to_string(),
            content,
        }
    }
}

/// Newest-first list of generated ideas, capped at [`HISTORY_LIMIT`] and
/// persisted whole under [`HISTORY_STORE_KEY`].
///
/// Only prepend and wholesale replacement exist. Order is insertion order;
/// timestamps are never used to re-sort.
pub struct IdeaHistory {
    store: Arc<JsonStore>,
    ideas: Mutex<Vec<Idea>>,
}

impl IdeaHistory {
    pub fn new(store: Arc<JsonStore>) -> Self {
        Self {
            store,
            ideas: Mutex::new(Vec::new()),
        }
    }

    /// Replace the in-memory list with what is on disk. Missing history, or
    /// a value that is not an array, loads as empty. Entries that fail to
    /// decode are skipped one by one so the rest survive the next save.
    pub async fn load(&self) -> Vec<Idea> {
        let stored: Vec<Value> = self.store.get(HISTORY_STORE_KEY, Vec::new()).await;
        let mut loaded: Vec<Idea> = stored
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(idea) => Some(idea),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed idea in history");
                    None
                }
            })
            .collect();
        loaded.truncate(HISTORY_LIMIT);
        tracing::debug!(count = loaded.len(), "loaded idea history");
        let mut ideas = self.ideas.lock().await;
        *ideas = loaded;
        ideas.clone()
    }

    pub async fn list(&self) -> Vec<Idea> {
        self.ideas.lock().await.clone()
    }

    /// Prepend `idea`, drop anything past the limit, persist.
    pub async fn append(&self, idea: Idea) -> Vec<Idea> {
        let mut ideas = self.ideas.lock().await;
        ideas.insert(0, idea);
        ideas.truncate(HISTORY_LIMIT);
        self.store.set(HISTORY_STORE_KEY, &*ideas).await;
        ideas.clone()
    }

    pub async fn clear(&self) {
        let mut ideas = self.ideas.lock().await;
        ideas.clear();
        self.store.set(HISTORY_STORE_KEY, &*ideas).await;
        tracing::info!("idea history cleared");
    }
}
