use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::clipboard::ClipboardState;
use crate::commands::config;
use crate::errors::api_error::{ApiError, ApiResult};
use crate::fs_utils::sanitize_path;
use crate::refresh::RefreshCounter;
use crate::tasks::{CancelGuard, CancelState};

pub mod copier;
mod error;
mod execute;

use copier::RealFs;
use error::{map_api_result, TransferError, TransferErrorCode};
pub use execute::TransferOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferOp {
    Copy,
    Move,
}

/// One validated paste/drop batch: where the sources go and how.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub sources: Vec<PathBuf>,
    pub target_dir: PathBuf,
    pub operation: TransferOp,
}

/// Paste the current clipboard into `dest`. A successful Move paste
/// consumes the clipboard; any failure leaves it intact so the user can
/// retry against another target.
#[tauri::command]
pub async fn paste_clipboard_cmd(
    clipboard: tauri::State<'_, ClipboardState>,
    refresh: tauri::State<'_, RefreshCounter>,
    cancel: tauri::State<'_, CancelState>,
    dest: String,
    task_id: Option<String>,
) -> ApiResult<TransferOutcome> {
    let entry = map_api_result(
        clipboard
            .get()
            .map_err(|e| TransferError::new(TransferErrorCode::TaskFailed, e.to_string())),
    )?;
    let Some(entry) = entry else {
        return Err(ApiError::new("clipboard_empty", "Clipboard is empty"));
    };

    let guard = register_cancel(&cancel, task_id)?;
    let outcome = run_transfer(
        entry.sources,
        dest,
        entry.operation,
        refresh.inner().clone(),
        guard,
    )
    .await?;

    if outcome.succeeded {
        map_api_result(
            clipboard
                .clear_if_move()
                .map_err(|e| TransferError::new(TransferErrorCode::TaskFailed, e.to_string())),
        )?;
    }
    Ok(outcome)
}

/// Direct transfer for drag-and-drop, bypassing the clipboard.
#[tauri::command]
pub async fn transfer_entries(
    refresh: tauri::State<'_, RefreshCounter>,
    cancel: tauri::State<'_, CancelState>,
    sources: Vec<String>,
    target_dir: String,
    operation: TransferOp,
    task_id: Option<String>,
) -> ApiResult<TransferOutcome> {
    let sources = sources.into_iter().map(PathBuf::from).collect();
    let guard = register_cancel(&cancel, task_id)?;
    run_transfer(sources, target_dir, operation, refresh.inner().clone(), guard).await
}

fn register_cancel(
    cancel: &CancelState,
    task_id: Option<String>,
) -> ApiResult<Option<CancelGuard>> {
    task_id.map(|id| cancel.register(id)).transpose()
}

async fn run_transfer(
    sources: Vec<PathBuf>,
    dest: String,
    operation: TransferOp,
    refresh: RefreshCounter,
    guard: Option<CancelGuard>,
) -> ApiResult<TransferOutcome> {
    let result = tauri::async_runtime::spawn_blocking(move || {
        // The guard stays registered for exactly the lifetime of this job.
        let cancel_flag = guard
            .as_ref()
            .map(|g| g.token())
            .unwrap_or_default();
        let target_dir = sanitize_path(&dest, true)
            .map_err(|e| TransferError::new(TransferErrorCode::InvalidPath, e))?;
        let mut clean_sources = Vec::with_capacity(sources.len());
        for source in &sources {
            let clean = sanitize_path(&source.to_string_lossy(), true)
                .map_err(|e| TransferError::new(TransferErrorCode::InvalidPath, e))?;
            clean_sources.push(clean);
        }

        let rules = config::current_rules()
            .map_err(|e| TransferError::new(TransferErrorCode::TaskFailed, e.message))?;
        let request = TransferRequest {
            sources: clean_sources,
            target_dir,
            operation,
        };
        execute::execute_cancellable(&RealFs, &rules, &request, &refresh, &cancel_flag)
    })
    .await
    .map_err(|e| ApiError::new("task_failed", format!("Transfer task failed: {e}")))?;

    map_api_result(result)
}
