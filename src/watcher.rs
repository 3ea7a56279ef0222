use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use tauri::Manager;

use crate::errors::api_error::ApiResult;
use crate::errors::domain::{self, DomainError, ErrorCode};
use crate::fs_utils::sanitize_path;
use crate::index::FileIndex;
use crate::runtime_lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherErrorCode {
    InvalidPath,
    Create,
    WatchPath,
    StateLock,
}

impl ErrorCode for WatcherErrorCode {
    fn as_code_str(self) -> &'static str {
        match self {
            Self::InvalidPath => "invalid_path",
            Self::Create => "watcher_create_failed",
            Self::WatchPath => "watch_path_failed",
            Self::StateLock => "watch_state_lock_failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WatcherError {
    code: WatcherErrorCode,
    message: String,
}

impl WatcherError {
    pub fn new(code: WatcherErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for WatcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for WatcherError {}

impl DomainError for WatcherError {
    fn code_str(&self) -> &'static str {
        self.code.as_code_str()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

pub type WatcherResult<T> = Result<T, WatcherError>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub action: &'static str,
    pub path: String,
    pub is_dir: bool,
}

#[derive(Default)]
pub struct WatchState {
    inner: Mutex<Option<RecommendedWatcher>>,
}

impl WatchState {
    pub fn replace(&self, watcher: Option<RecommendedWatcher>) -> WatcherResult<()> {
        let mut guard = self.inner.lock().map_err(|_| {
            WatcherError::new(WatcherErrorCode::StateLock, "Failed to lock watch state")
        })?;
        *guard = watcher;
        Ok(())
    }

    pub fn stop_all(&self) -> WatcherResult<()> {
        self.replace(None)
    }
}

fn changes_for_event(event: &Event) -> Vec<FileChange> {
    let created = match event.kind {
        EventKind::Create(_) => Some(true),
        EventKind::Remove(_) => Some(false),
        // Renames surface as Modify(Name); classify each path by whether it
        // still exists.
        EventKind::Modify(notify::event::ModifyKind::Name(_)) => None,
        _ => return Vec::new(),
    };
    event
        .paths
        .iter()
        .map(|path| {
            let exists = path.exists();
            let created = created.unwrap_or(exists);
            FileChange {
                action: if created { "create" } else { "delete" },
                path: path.to_string_lossy().to_string(),
                is_dir: exists && path.is_dir(),
            }
        })
        .collect()
}

/// Watches `path` recursively; each batch of create/delete changes is pushed
/// to the frontend and folded into the filename index. Replaces any watch
/// that was active before.
pub fn start_watch(app: tauri::AppHandle, path: PathBuf, state: &WatchState) -> WatcherResult<()> {
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if runtime_lifecycle::is_shutting_down(&app) {
            return;
        }
        let Ok(event) = res else { return };
        let changes = changes_for_event(&event);
        if changes.is_empty() {
            return;
        }
        if let Some(index) = app.try_state::<FileIndex>() {
            for change in &changes {
                index.apply_change(
                    std::path::Path::new(&change.path),
                    change.action == "create",
                    change.is_dir,
                );
            }
        }
        // Best effort: a dropped frontend listener should not kill the
        // filesystem watcher callback.
        let _ = runtime_lifecycle::emit_if_running(&app, "file-changes", changes);
    })
    .map_err(|error| {
        WatcherError::new(
            WatcherErrorCode::Create,
            format!("Failed to create watcher: {error}"),
        )
    })?;

    watcher
        .watch(&path, RecursiveMode::Recursive)
        .map_err(|error| {
            WatcherError::new(
                WatcherErrorCode::WatchPath,
                format!("Failed to watch path {}: {error}", path.display()),
            )
        })?;

    state.replace(Some(watcher))?;
    Ok(())
}

#[tauri::command]
pub fn watch_path(
    app: tauri::AppHandle,
    state: tauri::State<WatchState>,
    path: String,
) -> ApiResult<()> {
    let result = sanitize_path(&path, false)
        .map_err(|e| WatcherError::new(WatcherErrorCode::InvalidPath, e))
        .and_then(|path| start_watch(app, path, &state));
    domain::map_api_result(result)
}

#[tauri::command]
pub fn unwatch_all(state: tauri::State<WatchState>) -> ApiResult<()> {
    domain::map_api_result(state.stop_all())
}
