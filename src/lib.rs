pub mod app;
pub mod badge;
pub mod commands;
pub mod config;
pub mod error;
pub mod page;

use tauri_plugin_window_state::StateFlags;

pub fn run() {
    commands::logging::init_logger();

    tauri::Builder::default()
        // Must be first so a second launch never builds its own window
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            app::window::show_main_window(app);
        }))
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_notification::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(
            tauri_plugin_window_state::Builder::default()
                .with_state_flags(StateFlags::all() & !StateFlags::VISIBLE)
                .build(),
        )
        .on_window_event(app::events::handle_window_event)
        .invoke_handler(tauri::generate_handler![
            commands::page::report_favicon,
            commands::page::notify,
        ])
        .setup(|app| {
            app::init(app)?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(app::events::handle_run_event);
}
