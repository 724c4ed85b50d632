use tauri::State;

use crate::state::AppState;

// ── API Key ──────────────────────────────────────────────────────────────────

/// The active key, or `None` when the user has not entered one.
#[tauri::command]
pub fn get_api_key(state: State<'_, AppState>) -> Option<String> {
    Some(state.api_key().active()).filter(|k| !k.is_empty())
}

/// Save a key from the settings dialog. Keychain failures are logged, not
/// returned: the key stays active for this session either way.
#[tauri::command]
pub async fn set_api_key(state: State<'_, AppState>, api_key: String) -> Result<(), String> {
    state.api_key().set(&api_key).await;
    Ok(())
}

#[tauri::command]
pub async fn delete_api_key(state: State<'_, AppState>) -> Result<(), String> {
    state.api_key().clear().await;
    Ok(())
}

#[tauri::command]
pub async fn test_api_key(state: State<'_, AppState>, api_key: String) -> Result<bool, String> {
    state
        .test_api_key(&api_key)
        .await
        .map_err(|e| e.to_string())
}
