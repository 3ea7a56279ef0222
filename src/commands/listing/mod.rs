//! Directory listing for the explorer view. One entry per child with the
//! metadata the frontend renders; the current refresh version rides along so
//! the view knows which generation it is showing.

use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::errors::api_error::ApiResult;
use crate::fs_utils::sanitize_path;
use crate::refresh::RefreshCounter;

mod error;

use error::{map_api_result, ListingError, ListingErrorCode, ListingResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size: u64,
    /// Unix millis of the last modification, when the platform reports one.
    pub modified: Option<i64>,
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirListing {
    pub entries: Vec<ListingEntry>,
    pub refresh_version: u64,
}

#[cfg(windows)]
fn is_hidden(path: &Path, name: &str) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    if name.starts_with('.') {
        return true;
    }
    fs::symlink_metadata(path)
        .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn is_hidden(_path: &Path, name: &str) -> bool {
    name.starts_with('.')
}

fn modified_millis(metadata: &fs::Metadata) -> Option<i64> {
    metadata
        .modified()
        .ok()
        .map(|time| DateTime::<Utc>::from(time).timestamp_millis())
}

fn read_entries(dir: &Path) -> ListingResult<Vec<ListingEntry>> {
    let metadata = fs::symlink_metadata(dir)
        .map_err(|e| ListingError::from_io_error(&format!("Failed to stat {}", dir.display()), e))?;
    if !metadata.is_dir() {
        return Err(ListingError::new(
            ListingErrorCode::NotDirectory,
            format!("{} is not a directory", dir.display()),
        ));
    }

    let reader = fs::read_dir(dir)
        .map_err(|e| ListingError::from_io_error(&format!("Failed to read {}", dir.display()), e))?;

    let mut entries = Vec::new();
    for item in reader {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable dir entry");
                continue;
            }
        };
        let name = item.file_name().to_string_lossy().to_string();
        let path = item.path();
        // symlink_metadata so a broken link still shows up as a row.
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unstatable entry");
                continue;
            }
        };
        let is_dir = metadata.is_dir();
        entries.push(ListingEntry {
            is_hidden: is_hidden(&path, &name),
            path: path.to_string_lossy().to_string(),
            is_dir,
            size: if is_dir { 0 } else { metadata.len() },
            modified: modified_millis(&metadata),
            name,
        });
    }

    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

#[tauri::command]
pub async fn list_dir(
    refresh: tauri::State<'_, RefreshCounter>,
    path: String,
) -> ApiResult<DirListing> {
    let refresh = refresh.inner().clone();
    let result = tauri::async_runtime::spawn_blocking(move || -> ListingResult<DirListing> {
        let dir = sanitize_path(&path, false)
            .map_err(|e| ListingError::new(ListingErrorCode::InvalidPath, e))?;
        Ok(DirListing {
            entries: read_entries(&dir)?,
            refresh_version: refresh.current(),
        })
    })
    .await
    .map_err(|e| {
        crate::errors::api_error::ApiError::new("task_failed", format!("Listing task failed: {e}"))
    })?;
    map_api_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn uniq_dir(label: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_nanos();
        std::env::temp_dir().join(format!("ferry-list-{label}-{}-{ts}", std::process::id()))
    }

    #[test]
    fn directories_sort_before_files_then_by_name() {
        let base = uniq_dir("sort");
        fs::create_dir_all(base.join("zeta")).unwrap();
        fs::create_dir_all(base.join("Alpha")).unwrap();
        fs::write(base.join("beta.txt"), b"b").unwrap();
        fs::write(base.join("apple.txt"), b"a").unwrap();

        let names: Vec<String> = read_entries(&base)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "zeta", "apple.txt", "beta.txt"]);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn dot_prefixed_entries_are_hidden() {
        let base = uniq_dir("hidden");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join(".secret"), b"s").unwrap();
        fs::write(base.join("plain.txt"), b"p").unwrap();

        let entries = read_entries(&base).unwrap();
        let secret = entries.iter().find(|e| e.name == ".secret").unwrap();
        let plain = entries.iter().find(|e| e.name == "plain.txt").unwrap();
        assert!(secret.is_hidden);
        assert!(!plain.is_hidden);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn file_rows_carry_size_and_modification_time() {
        let base = uniq_dir("meta");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("data.bin"), vec![0u8; 1234]).unwrap();

        let entries = read_entries(&base).unwrap();
        let row = &entries[0];
        assert_eq!(row.size, 1234);
        assert!(row.modified.is_some());
        assert!(!row.is_dir);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn listing_a_file_is_not_directory() {
        let base = uniq_dir("notdir");
        fs::create_dir_all(&base).unwrap();
        let file = base.join("f.txt");
        fs::write(&file, b"f").unwrap();

        let err = read_entries(&file).unwrap_err();
        assert!(err.to_string().contains("not a directory"));

        let _ = fs::remove_dir_all(&base);
    }
}
