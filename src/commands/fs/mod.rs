//! Mutating filesystem commands outside the transfer pipeline: deletion
//! through the trash, folder creation, and renames.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{error, info};

use crate::commands::config;
use crate::errors::api_error::ApiResult;
use crate::fs_utils::{sanitize_path, unique_path};
use crate::refresh::RefreshCounter;
use crate::rules::PathRuleSet;

mod error;

use error::{map_api_result, FsError, FsErrorCode, FsResult};

/// Deletion gateway. Permission is validated for every path before anything
/// is touched; the confirmation callback then gets one veto naming the item
/// count; only then does the delete primitive run, path by path.
///
/// Returns false for the no-op outcomes (empty input, declined
/// confirmation). A primitive failure mid-batch is an error naming the
/// path; items already deleted stay deleted.
pub(crate) fn delete_paths<C, D>(
    rules: &PathRuleSet,
    paths: &[PathBuf],
    confirm: C,
    mut delete_one: D,
) -> FsResult<bool>
where
    C: FnOnce(usize) -> bool,
    D: FnMut(&Path) -> Result<(), String>,
{
    if paths.is_empty() {
        return Ok(false);
    }

    for path in paths {
        if !rules.allows(path) {
            return Err(FsError::new(
                FsErrorCode::PermissionDenied,
                format!("Deleting is not allowed for {}", path.display()),
            ));
        }
    }

    if !confirm(paths.len()) {
        info!(count = paths.len(), "deletion declined by user");
        return Ok(false);
    }

    for path in paths {
        delete_one(path).map_err(|message| {
            error!(path = %path.display(), %message, "delete primitive failed");
            FsError::new(
                FsErrorCode::TrashFailed,
                format!("Failed to delete {}: {message}", path.display()),
            )
        })?;
    }
    Ok(true)
}

/// Runs the gateway and bumps the refresh counter whenever at least one
/// deletion landed, including a batch that failed partway through. Cached
/// listings are stale the moment the first item is gone, error or not.
fn delete_batch<C, D>(
    refresh: &RefreshCounter,
    rules: &PathRuleSet,
    paths: &[PathBuf],
    confirm: C,
    mut delete_one: D,
) -> FsResult<bool>
where
    C: FnOnce(usize) -> bool,
    D: FnMut(&Path) -> Result<(), String>,
{
    let mut mutated = false;
    let result = delete_paths(rules, paths, confirm, |path| {
        delete_one(path).map(|()| mutated = true)
    });
    if mutated {
        refresh.bump();
    }
    result
}

fn trash_delete(path: &Path) -> Result<(), String> {
    trash::delete(path).map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_entries(
    refresh: tauri::State<'_, RefreshCounter>,
    paths: Vec<String>,
    confirmed: bool,
) -> ApiResult<bool> {
    let refresh = refresh.inner().clone();
    let result = tauri::async_runtime::spawn_blocking(move || -> FsResult<bool> {
        let mut clean = Vec::with_capacity(paths.len());
        for raw in &paths {
            clean.push(
                sanitize_path(raw, true)
                    .map_err(|e| FsError::new(FsErrorCode::InvalidPath, e))?,
            );
        }
        let rules = config::current_rules()
            .map_err(|e| FsError::new(FsErrorCode::IoError, e.message))?;
        // The frontend has already shown the blocking dialog; `confirmed`
        // carries its answer through.
        delete_batch(&refresh, &rules, &clean, |_count| confirmed, trash_delete)
    })
    .await
    .map_err(|e| {
        crate::errors::api_error::ApiError::new("task_failed", format!("Delete task failed: {e}"))
    })?;
    map_api_result(result)
}

#[tauri::command]
pub fn create_folder(
    refresh: tauri::State<RefreshCounter>,
    parent: String,
    name: String,
) -> ApiResult<String> {
    map_api_result(create_folder_impl(&refresh, &parent, &name))
}

fn create_folder_impl(refresh: &RefreshCounter, parent: &str, name: &str) -> FsResult<String> {
    let name = name.trim();
    if name.is_empty() || name.contains(std::path::is_separator) {
        return Err(FsError::new(
            FsErrorCode::InvalidInput,
            format!("Invalid folder name: {name:?}"),
        ));
    }
    let parent = sanitize_path(parent, true)
        .map_err(|e| FsError::new(FsErrorCode::InvalidPath, e))?;
    let rules = config::current_rules()
        .map_err(|e| FsError::new(FsErrorCode::IoError, e.message))?;
    if !rules.allows(&parent) {
        return Err(FsError::new(
            FsErrorCode::PermissionDenied,
            format!("Writing is not allowed in {}", parent.display()),
        ));
    }

    let target = unique_path(&parent, name);
    fs::create_dir(&target).map_err(|e| {
        FsError::from_io_error(&format!("Failed to create folder {}", target.display()), e)
    })?;
    refresh.bump();
    Ok(target.to_string_lossy().to_string())
}

#[tauri::command]
pub fn rename_entry(
    refresh: tauri::State<RefreshCounter>,
    path: String,
    new_name: String,
) -> ApiResult<String> {
    map_api_result(rename_entry_impl(&refresh, &path, &new_name))
}

fn rename_entry_impl(refresh: &RefreshCounter, path: &str, new_name: &str) -> FsResult<String> {
    let new_name = new_name.trim();
    if new_name.is_empty() || new_name.contains(std::path::is_separator) {
        return Err(FsError::new(
            FsErrorCode::InvalidInput,
            format!("Invalid name: {new_name:?}"),
        ));
    }
    let source = sanitize_path(path, true)
        .map_err(|e| FsError::new(FsErrorCode::InvalidPath, e))?;
    let rules = config::current_rules()
        .map_err(|e| FsError::new(FsErrorCode::IoError, e.message))?;
    if !rules.allows(&source) {
        return Err(FsError::new(
            FsErrorCode::PermissionDenied,
            format!("Renaming is not allowed for {}", source.display()),
        ));
    }

    let parent = source.parent().ok_or_else(|| {
        FsError::new(FsErrorCode::InvalidPath, "Cannot rename the filesystem root")
    })?;
    let target = parent.join(new_name);
    if fs::symlink_metadata(&target).is_ok() {
        return Err(FsError::new(
            FsErrorCode::DestinationExists,
            format!("An entry named {new_name:?} already exists here"),
        ));
    }
    fs::rename(&source, &target).map_err(|e| {
        FsError::from_io_error(
            &format!("Failed to rename {} -> {}", source.display(), target.display()),
            e,
        )
    })?;
    refresh.bump();
    Ok(target.to_string_lossy().to_string())
}

#[tauri::command]
pub fn open_entry(path: String) -> ApiResult<()> {
    map_api_result(
        open::that(&path)
            .map_err(|e| FsError::new(FsErrorCode::OpenFailed, format!("Failed to open {path}: {e}"))),
    )
}
