pub mod core;
pub mod logging;
pub mod state;

#[cfg(feature = "desktop")]
mod commands;

// ── App Entry ────────────────────────────────────────────────────────────────

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::*;
    use tauri::Manager;

    logging::init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            // Key migration and history load finish before the window can
            // invoke any command, so handlers always see a ready state.
            // Tauri's app data dir is where the store-plugin releases wrote
            // settings.json, so the plaintext key is found and migrated.
            let config = core::AppConfig::from_env_in(app.path().app_data_dir()?);
            let app_state = tauri::async_runtime::block_on(state::AppState::initialize(&config))?;
            app.manage(app_state);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            get_api_key,
            set_api_key,
            delete_api_key,
            test_api_key,
            generate_idea,
            get_ideas,
            clear_ideas,
            list_categories,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
