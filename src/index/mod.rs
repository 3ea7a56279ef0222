//! In-memory filename index for fast global search. A full walk seeds it,
//! watcher events keep it current, and queries run a parallel substring scan
//! over lowercased names.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        RwLock,
    },
};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tauri::Manager;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::commands::config;
use crate::errors::api_error::{ApiError, ApiResult};
use crate::fs_utils::sanitize_path;
use crate::runtime_lifecycle::emit_if_running;

mod error;

use error::{map_api_result, IndexError, IndexErrorCode, IndexResult};

const MAX_HITS: usize = 500;
const SNAPSHOT_FILE: &str = "index.json";

#[derive(Debug, Clone)]
struct IndexEntry {
    name_lc: String,
    path: PathBuf,
    is_dir: bool,
}

/// Persisted row. The lowercased search key is recomputed on load, so the
/// snapshot only carries what cannot be derived.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
    path: PathBuf,
    is_dir: bool,
}

fn snapshot_path() -> IndexResult<PathBuf> {
    let dir = config::config_dir().map_err(|e| {
        IndexError::new(IndexErrorCode::SnapshotFailed, e.to_string())
    })?;
    Ok(dir.join(SNAPSHOT_FILE))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexHit {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
}

#[derive(Default)]
pub struct FileIndex {
    entries: RwLock<Vec<IndexEntry>>,
    ready: AtomicBool,
}

impl FileIndex {
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Walks `root` and replaces the whole index. Unreadable entries are
    /// skipped with a trace; a directory full of permission holes should
    /// still produce a usable index.
    pub fn rebuild(&self, root: &Path) -> IndexResult<usize> {
        let mut entries = Vec::new();
        for item in WalkDir::new(root).follow_links(false) {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry during index walk");
                    continue;
                }
            };
            let name_lc = item.file_name().to_string_lossy().to_lowercase();
            let is_dir = item.file_type().is_dir();
            entries.push(IndexEntry {
                name_lc,
                path: item.into_path(),
                is_dir,
            });
        }

        let count = entries.len();
        let mut guard = self.entries.write().map_err(|_| {
            IndexError::new(IndexErrorCode::StateLockFailed, "Index lock poisoned")
        })?;
        *guard = entries;
        drop(guard);
        self.ready.store(true, Ordering::SeqCst);
        Ok(count)
    }

    pub fn search(&self, query: &str) -> IndexResult<Vec<IndexHit>> {
        self.search_limited(query, MAX_HITS)
    }

    fn search_limited(&self, query: &str, limit: usize) -> IndexResult<Vec<IndexHit>> {
        if !self.is_ready() {
            return Err(IndexError::new(
                IndexErrorCode::NotReady,
                "The file index has not been built yet",
            ));
        }
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let guard = self.entries.read().map_err(|_| {
            IndexError::new(IndexErrorCode::StateLockFailed, "Index lock poisoned")
        })?;
        let mut hits: Vec<IndexHit> = guard
            .par_iter()
            .filter(|entry| entry.name_lc.contains(&needle))
            .map(|entry| IndexHit {
                name: entry
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                path: entry.path.to_string_lossy().to_string(),
                is_dir: entry.is_dir,
            })
            .collect();
        hits.truncate(limit);
        Ok(hits)
    }

    /// Writes the entries to `path` so the next session can serve searches
    /// without waiting for a fresh walk.
    pub fn save_snapshot(&self, path: &Path) -> IndexResult<()> {
        let guard = self.entries.read().map_err(|_| {
            IndexError::new(IndexErrorCode::StateLockFailed, "Index lock poisoned")
        })?;
        let rows: Vec<SnapshotEntry> = guard
            .iter()
            .map(|entry| SnapshotEntry {
                path: entry.path.clone(),
                is_dir: entry.is_dir,
            })
            .collect();
        drop(guard);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                IndexError::new(
                    IndexErrorCode::SnapshotFailed,
                    format!("Failed to create {}: {e}", parent.display()),
                )
            })?;
        }
        let raw = serde_json::to_string(&rows).map_err(|e| {
            IndexError::new(
                IndexErrorCode::SnapshotFailed,
                format!("Failed to serialize index snapshot: {e}"),
            )
        })?;
        fs::write(path, raw).map_err(|e| {
            IndexError::new(
                IndexErrorCode::SnapshotFailed,
                format!("Failed to write {}: {e}", path.display()),
            )
        })
    }

    /// Replaces the index with a previously saved snapshot and marks it
    /// ready. Entries whose files vanished since the save are corrected by
    /// watcher events or the next rebuild.
    pub fn load_snapshot(&self, path: &Path) -> IndexResult<usize> {
        let raw = fs::read_to_string(path).map_err(|e| {
            IndexError::new(
                IndexErrorCode::SnapshotFailed,
                format!("Failed to read index snapshot {}: {e}", path.display()),
            )
        })?;
        let rows: Vec<SnapshotEntry> = serde_json::from_str(&raw).map_err(|e| {
            IndexError::new(
                IndexErrorCode::SnapshotFailed,
                format!("Index snapshot is not valid JSON: {e}"),
            )
        })?;
        let entries: Vec<IndexEntry> = rows
            .into_iter()
            .map(|row| IndexEntry {
                name_lc: row
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_lowercase())
                    .unwrap_or_default(),
                path: row.path,
                is_dir: row.is_dir,
            })
            .collect();

        let count = entries.len();
        let mut guard = self.entries.write().map_err(|_| {
            IndexError::new(IndexErrorCode::StateLockFailed, "Index lock poisoned")
        })?;
        *guard = entries;
        drop(guard);
        self.ready.store(true, Ordering::SeqCst);
        Ok(count)
    }

    /// Incremental update from a watcher event. A no-op before the first
    /// build; the walk will pick the change up anyway.
    pub fn apply_change(&self, path: &Path, created: bool, is_dir: bool) {
        if !self.is_ready() {
            return;
        }
        let Ok(mut guard) = self.entries.write() else {
            warn!("index lock poisoned; dropping incremental update");
            return;
        };
        if created {
            let name_lc = path
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            guard.push(IndexEntry {
                name_lc,
                path: path.to_path_buf(),
                is_dir,
            });
        } else {
            // A removed directory takes its subtree with it.
            guard.retain(|entry| entry.path != path && !entry.path.starts_with(path));
        }
    }
}

#[tauri::command]
pub async fn build_index(app: tauri::AppHandle, root: String) -> ApiResult<usize> {
    let result = tauri::async_runtime::spawn_blocking(move || -> IndexResult<usize> {
        let root = sanitize_path(&root, false)
            .map_err(|e| IndexError::new(IndexErrorCode::InvalidPath, e))?;
        let state = app
            .try_state::<FileIndex>()
            .ok_or_else(|| {
                IndexError::new(IndexErrorCode::StateLockFailed, "Index state unavailable")
            })?;
        let count = state.rebuild(&root)?;
        info!(root = %root.display(), count, "file index built");
        // Best effort; a failed save only costs the next session its warm start.
        if let Err(e) = snapshot_path().and_then(|p| state.save_snapshot(&p)) {
            warn!(error = %e, "failed to persist index snapshot");
        }
        emit_if_running(&app, "index-ready", count);
        Ok(count)
    })
    .await
    .map_err(|e| ApiError::new("task_failed", format!("Index task failed: {e}")))?;
    map_api_result(result)
}

/// Restores the index from the snapshot written by the last successful
/// build, skipping the full walk. Fails when no snapshot exists; the
/// frontend falls back to `build_index`.
#[tauri::command]
pub async fn load_index(app: tauri::AppHandle) -> ApiResult<usize> {
    let result = tauri::async_runtime::spawn_blocking(move || -> IndexResult<usize> {
        let state = app
            .try_state::<FileIndex>()
            .ok_or_else(|| {
                IndexError::new(IndexErrorCode::StateLockFailed, "Index state unavailable")
            })?;
        let count = state.load_snapshot(&snapshot_path()?)?;
        info!(count, "file index restored from snapshot");
        emit_if_running(&app, "index-ready", count);
        Ok(count)
    })
    .await
    .map_err(|e| ApiError::new("task_failed", format!("Index task failed: {e}")))?;
    map_api_result(result)
}

#[tauri::command]
pub fn search_index(index: tauri::State<FileIndex>, query: String) -> ApiResult<Vec<IndexHit>> {
    map_api_result(index.search(&query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, SystemTime};

    fn uniq_dir(label: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_nanos();
        std::env::temp_dir().join(format!("ferry-index-{label}-{}-{ts}", std::process::id()))
    }

    fn sample_tree(label: &str) -> PathBuf {
        let base = uniq_dir(label);
        fs::create_dir_all(base.join("Reports")).unwrap();
        fs::write(base.join("Reports").join("Q1-report.txt"), b"q1").unwrap();
        fs::write(base.join("notes.md"), b"n").unwrap();
        base
    }

    #[test]
    fn search_before_build_is_rejected() {
        let index = FileIndex::default();
        let err = index.search("anything").unwrap_err();
        assert_eq!(err.code(), IndexErrorCode::NotReady);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let base = sample_tree("search");
        let index = FileIndex::default();
        let count = index.rebuild(&base).unwrap();
        assert!(count >= 3, "root, dir, and two files");

        let hits = index.search("REPORT").unwrap();
        let names: Vec<&str> = hits.iter().map(|h| h.name.as_str()).collect();
        assert!(names.contains(&"Reports"));
        assert!(names.contains(&"Q1-report.txt"));
        assert!(!names.contains(&"notes.md"));

        assert!(index.search("   ").unwrap().is_empty());

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn hits_are_capped_at_the_limit() {
        let base = uniq_dir("cap");
        fs::create_dir_all(&base).unwrap();
        for i in 0..10 {
            fs::write(base.join(format!("log-{i}.txt")), b"x").unwrap();
        }
        let index = FileIndex::default();
        index.rebuild(&base).unwrap();

        assert_eq!(index.search_limited("log-", 4).unwrap().len(), 4);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn snapshot_round_trip_restores_search_without_a_walk() {
        let base = sample_tree("snap");
        let index = FileIndex::default();
        let built = index.rebuild(&base).unwrap();

        let store = uniq_dir("snapstore");
        let file = store.join("index.json");
        index.save_snapshot(&file).unwrap();

        let restored = FileIndex::default();
        let count = restored.load_snapshot(&file).unwrap();
        assert_eq!(count, built);
        assert!(restored.is_ready());
        assert!(restored
            .search("q1-report")
            .unwrap()
            .iter()
            .any(|h| h.name == "Q1-report.txt"));
        // Watcher updates keep applying on top of the restored entries.
        restored.apply_change(&base.join("late.txt"), true, false);
        assert!(!restored.search("late").unwrap().is_empty());

        let _ = fs::remove_dir_all(&base);
        let _ = fs::remove_dir_all(&store);
    }

    #[test]
    fn missing_snapshot_is_a_reported_error() {
        let index = FileIndex::default();
        let gone = uniq_dir("nosnap").join("index.json");
        let err = index.load_snapshot(&gone).unwrap_err();
        assert_eq!(err.code(), IndexErrorCode::SnapshotFailed);
        assert!(!index.is_ready());
    }

    #[test]
    fn incremental_changes_update_hits() {
        let base = sample_tree("incr");
        let index = FileIndex::default();
        index.rebuild(&base).unwrap();

        let added = base.join("report-final.pdf");
        index.apply_change(&added, true, false);
        assert!(index
            .search("final")
            .unwrap()
            .iter()
            .any(|h| h.name == "report-final.pdf"));

        // Removing a directory drops its children too.
        index.apply_change(&base.join("Reports"), false, true);
        assert!(index.search("q1-report").unwrap().is_empty());

        let _ = fs::remove_dir_all(&base);
    }
}
