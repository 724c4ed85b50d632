use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, OnceCell};

// ── JSON Store (<data_dir>/settings.json) ────────────────────────────────────

pub type Document = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode store document: {0}")]
    Json(#[from] serde_json::Error),
}

/// A string-keyed map of arbitrary JSON values backed by one file.
///
/// The file is read on first access and cached for the life of the handle;
/// share one handle (behind an `Arc`) per file. Nothing here knows which
/// keys are sensitive, so secrets do not belong in it.
pub struct JsonStore {
    path: PathBuf,
    document: OnceCell<Mutex<Document>>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn document(&self) -> &Mutex<Document> {
        self.document
            .get_or_init(|| async { Mutex::new(load_document(&self.path).await) })
            .await
    }

    /// Raw value under `key`. JSON `null` counts as absent.
    pub async fn get_value(&self, key: &str) -> Option<Value> {
        let doc = self.document().await.lock().await;
        doc.get(key).filter(|v| !v.is_null()).cloned()
    }

    /// Value under `key` decoded as `T`, or `default` when it is absent or
    /// does not decode.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(value) = self.get_value(key).await else {
            return default;
        };
        match serde_json::from_value(value) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value has unexpected shape, using default");
                default
            }
        }
    }

    /// Replace the value under `key` and flush the document.
    /// Flush failures are logged; the cached value is kept either way.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to encode value for store");
                return;
            }
        };
        let mut doc = self.document().await.lock().await;
        doc.insert(key.to_string(), value);
        if let Err(e) = write_document(&self.path, &doc).await {
            tracing::error!(key, error = %e, "failed to save store");
        }
    }

    /// Remove `key` from the cached document. Call [`JsonStore::save`] to
    /// persist the removal.
    pub async fn delete(&self, key: &str) -> bool {
        let mut doc = self.document().await.lock().await;
        doc.remove(key).is_some()
    }

    /// Write the cached document to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let doc = self.document().await.lock().await;
        write_document(&self.path, &doc).await
    }
}

async fn load_document(path: &Path) -> Document {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Document::new(),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read store, starting empty");
            return Document::new();
        }
    };
    if raw.trim().is_empty() {
        return Document::new();
    }
    match serde_json::from_str::<Document>(&raw) {
        Ok(doc) => {
            tracing::debug!(path = %path.display(), keys = doc.len(), "loaded store");
            doc
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "store is not a JSON object, starting empty");
            Document::new()
        }
    }
}

async fn write_document(path: &Path, doc: &Document) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let raw = serde_json::to_string_pretty(doc)?;
    fs::write(path, raw).await.map_err(io_err)
}
