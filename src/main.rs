// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    // Ambient runtime so Tauri's async commands and the startup
    // initialization share one executor.
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    tauri::async_runtime::set(rt.handle().clone());

    ai_idea_generator_lib::run();
}
