use std::{
    fs,
    path::PathBuf,
    sync::Mutex,
};

use serde::Serialize;

use crate::errors::api_error::ApiResult;
use crate::fs_utils::sanitize_path;
use crate::transfer::TransferOp;

mod error;
#[cfg(test)]
mod tests;

use error::{map_api_result, ClipboardError, ClipboardErrorCode};
pub(crate) use error::ClipboardResult;

/// What a copy/cut gesture captured: the selected sources and whether the
/// following paste copies or moves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub sources: Vec<PathBuf>,
    pub operation: TransferOp,
}

/// Session-scoped clipboard holder. Owned by the Tauri state container so
/// tests construct independent instances instead of sharing a global.
#[derive(Default)]
pub struct ClipboardState {
    inner: Mutex<Option<ClipboardEntry>>,
}

impl ClipboardState {
    pub fn set(&self, entry: ClipboardEntry) -> ClipboardResult<()> {
        if entry.sources.is_empty() {
            return Err(ClipboardError::new(
                ClipboardErrorCode::InvalidInput,
                "Clipboard requires at least one source path",
            ));
        }
        let mut guard = self.lock()?;
        *guard = Some(entry);
        Ok(())
    }

    pub fn get(&self) -> ClipboardResult<Option<ClipboardEntry>> {
        Ok(self.lock()?.clone())
    }

    pub fn clear(&self) -> ClipboardResult<()> {
        *self.lock()? = None;
        Ok(())
    }

    /// A Move clipboard is consumed exactly once, by the successful paste
    /// that drained it. Copy clipboards survive and may be pasted again.
    pub fn clear_if_move(&self) -> ClipboardResult<()> {
        let mut guard = self.lock()?;
        if matches!(
            guard.as_ref().map(|entry| entry.operation),
            Some(TransferOp::Move)
        ) {
            *guard = None;
        }
        Ok(())
    }

    fn lock(&self) -> ClipboardResult<std::sync::MutexGuard<'_, Option<ClipboardEntry>>> {
        self.inner.lock().map_err(|_| {
            ClipboardError::new(
                ClipboardErrorCode::StateLockFailed,
                "Failed to lock clipboard state",
            )
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardSnapshot {
    pub sources: Vec<String>,
    pub operation: &'static str,
}

impl ClipboardSnapshot {
    /// Wire form of an entry. The mode vocabulary is `copy`/`cut` on both
    /// the set and the read side, so the frontend can feed a snapshot
    /// straight back into `set_clipboard_cmd`.
    fn from_entry(entry: ClipboardEntry) -> Self {
        Self {
            sources: entry
                .sources
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect(),
            operation: match entry.operation {
                TransferOp::Copy => "copy",
                TransferOp::Move => "cut",
            },
        }
    }
}

#[tauri::command]
pub fn set_clipboard_cmd(
    state: tauri::State<ClipboardState>,
    paths: Vec<String>,
    mode: String,
) -> ApiResult<()> {
    map_api_result(set_clipboard_impl(&state, paths, &mode))
}

fn set_clipboard_impl(
    state: &ClipboardState,
    paths: Vec<String>,
    mode: &str,
) -> ClipboardResult<()> {
    if paths.is_empty() {
        return state.clear();
    }
    let operation = match mode.to_lowercase().as_str() {
        "copy" => TransferOp::Copy,
        "cut" => TransferOp::Move,
        other => {
            return Err(ClipboardError::new(
                ClipboardErrorCode::InvalidMode,
                format!("Invalid clipboard mode: {other}"),
            ))
        }
    };

    let mut sources = Vec::with_capacity(paths.len());
    for raw in paths {
        fs::symlink_metadata(&raw).map_err(|e| {
            ClipboardError::new(
                ClipboardErrorCode::NotFound,
                format!("Path does not exist: {raw}: {e}"),
            )
        })?;
        let clean = sanitize_path(&raw, true)
            .map_err(|e| ClipboardError::new(ClipboardErrorCode::InvalidInput, e))?;
        sources.push(clean);
    }

    state.set(ClipboardEntry { sources, operation })
}

#[tauri::command]
pub fn clipboard_contents(state: tauri::State<ClipboardState>) -> ApiResult<Option<ClipboardSnapshot>> {
    map_api_result(state.get().map(|entry| entry.map(ClipboardSnapshot::from_entry)))
}
