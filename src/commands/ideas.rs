use tauri::State;

use crate::core::{self, Idea};
use crate::state::AppState;

// ── Ideas ────────────────────────────────────────────────────────────────────

/// Generate an idea for `category` and add it to history.
/// Key problems come back as messages containing "API key" so the UI can
/// offer its settings shortcut.
#[tauri::command]
pub async fn generate_idea(state: State<'_, AppState>, category: String) -> Result<Idea, String> {
    state.generate_idea(&category).await.map_err(|e| {
        tracing::warn!(category = %category, error = %e, "idea generation failed");
        e.to_string()
    })
}

#[tauri::command]
pub async fn get_ideas(state: State<'_, AppState>) -> Result<Vec<Idea>, String> {
    Ok(state.history().list().await)
}

#[tauri::command]
pub async fn clear_ideas(state: State<'_, AppState>) -> Result<(), String> {
    state.history().clear().await;
    Ok(())
}

#[tauri::command]
pub fn list_categories() -> Vec<&'static str> {
    core::CATEGORIES.to_vec()
}
