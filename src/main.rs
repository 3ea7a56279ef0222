#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod clipboard;
mod commands;
mod errors;
mod fs_utils;
mod index;
mod refresh;
mod rules;
mod runtime_lifecycle;
mod selection;
mod tasks;
mod transfer;
mod watcher;

use commands::*;
use once_cell::sync::OnceCell;
use tauri::Manager;

use clipboard::ClipboardState;
use index::FileIndex;
use refresh::RefreshCounter;
use runtime_lifecycle::RuntimeLifecycle;
use selection::SelectionRegistry;
use tasks::CancelState;
use watcher::WatchState;

fn init_logging() {
    static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
    let base = dirs_next::data_dir().unwrap_or_else(std::env::temp_dir);
    let log_dir = base.join("ferry").join("logs");
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log dir {:?}: {}", log_dir, e);
        return;
    }
    let file_appender = tracing_appender::rolling::never(&log_dir, "ferry.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = GUARD.set(guard);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().expect("static directive")),
        )
        .with_ansi(false)
        .with_writer(non_blocking);
    if let Err(e) = subscriber.try_init() {
        eprintln!("Failed to init tracing subscriber: {e}");
    }
    tracing::info!(log_dir = %log_dir.display(), "logging initialized");
}

fn main() {
    init_logging();
    tauri::Builder::default()
        .manage(ClipboardState::default())
        .manage(RefreshCounter::default())
        .manage(SelectionRegistry::default())
        .manage(WatchState::default())
        .manage(CancelState::default())
        .manage(FileIndex::default())
        .manage(RuntimeLifecycle::default())
        .on_window_event(|window, event| {
            if matches!(event, tauri::WindowEvent::Destroyed) {
                runtime_lifecycle::begin_shutdown_from_app(window.app_handle());
                if let Some(watch) = window.try_state::<WatchState>() {
                    let _ = watch.stop_all();
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            list_dir,
            refresh_version,
            load_config,
            update_config,
            set_clipboard_cmd,
            clipboard_contents,
            paste_clipboard_cmd,
            transfer_entries,
            delete_entries,
            create_folder,
            rename_entry,
            open_entry,
            compress_files,
            extract_zip,
            extract_zip_files,
            list_zip_contents,
            build_index,
            load_index,
            search_index,
            watch_path,
            unwatch_all,
            cancel_task,
            selection_click,
            selection_context_click,
            selection_key,
            selection_marquee_begin,
            selection_marquee_update,
            selection_marquee_end,
            selection_clear
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
