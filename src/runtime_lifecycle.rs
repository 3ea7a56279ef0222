use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tauri::{Emitter, Manager};
use tracing::debug;

/// Tracks window teardown so background work (archive jobs, watcher
/// callbacks) stops emitting into a webview that no longer exists.
#[derive(Default)]
pub struct RuntimeLifecycle {
    shutting_down: Arc<AtomicBool>,
}

impl RuntimeLifecycle {
    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }
}

pub fn begin_shutdown_from_app<R: tauri::Runtime>(app: &tauri::AppHandle<R>) {
    if let Some(state) = app.try_state::<RuntimeLifecycle>() {
        state.begin_shutdown();
    }
}

pub fn is_shutting_down<R: tauri::Runtime>(app: &tauri::AppHandle<R>) -> bool {
    app.try_state::<RuntimeLifecycle>()
        .map(|state| state.is_shutting_down())
        .unwrap_or(false)
}

/// Best-effort emit: during shutdown or transient frontend teardown the
/// event is dropped with a debug trace instead of failing the caller.
pub fn emit_if_running<R: tauri::Runtime, S: serde::Serialize + Clone>(
    app: &tauri::AppHandle<R>,
    event: &str,
    payload: S,
) -> bool {
    if is_shutting_down(app) {
        debug!(event, "dropping runtime event during shutdown");
        return false;
    }
    match app.emit(event, payload) {
        Ok(()) => true,
        Err(error) => {
            debug!(event, %error, "failed to emit runtime event");
            false
        }
    }
}
