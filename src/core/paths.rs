use std::path::PathBuf;

// ── Path Helpers ─────────────────────────────────────────────────────────────

/// Bundle identifier from `tauri.conf.json`. Tauri's app data dir is
/// `<platform data dir>/<identifier>`, which is where earlier releases kept
/// `settings.json`.
pub const APP_IDENTIFIER: &str = "com.ai-idea-generator.app";

/// File name of the shared JSON document (legacy key + idea history).
pub const STORE_FILE_NAME: &str = "settings.json";

/// Same directory Tauri resolves as the app data dir, e.g.
/// `~/.local/share/com.ai-idea-generator.app` on Linux. Used when no Tauri
/// path resolver is available.
pub fn get_app_data_dir() -> Result<PathBuf, String> {
    let base = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
        .ok_or("Could not find a data directory")?;
    Ok(base.join(APP_IDENTIFIER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_matches_tauri_config() {
        let conf: serde_json::Value =
            serde_json::from_str(include_str!("../../tauri.conf.json")).unwrap();
        assert_eq!(conf["identifier"].as_str(), Some(APP_IDENTIFIER));
    }
}
