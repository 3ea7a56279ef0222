//! Zip archive commands: create, inspect, and extract, with optional AES
//! passwords and throttled progress events for the frontend.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use serde::Serialize;
use tracing::info;
use walkdir::WalkDir;
use zip::{write::FileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::commands::config;
use crate::errors::api_error::{ApiError, ApiResult};
use crate::fs_utils::sanitize_path;
use crate::refresh::RefreshCounter;
use crate::rules::PathRuleSet;
use crate::runtime_lifecycle::emit_if_running;

mod error;

use error::{map_api_result, ArchiveError, ArchiveErrorCode, ArchiveResult};

const COPY_BUF: usize = 64 * 1024;
const PROGRESS_INTERVAL_MS: u128 = 100;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipEntrySummary {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub is_encrypted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressPayload {
    pub total: u64,
    pub processed: u64,
    pub filename: String,
}

/// Throttles progress callbacks to one per interval; the terminal report
/// always goes through.
struct Progress<'a> {
    emit: &'a mut dyn FnMut(ProgressPayload),
    total: u64,
    processed: u64,
    last_emit: Instant,
}

impl<'a> Progress<'a> {
    fn new(total: u64, emit: &'a mut dyn FnMut(ProgressPayload)) -> Self {
        Self {
            emit,
            total,
            processed: 0,
            last_emit: Instant::now(),
        }
    }

    fn add(&mut self, bytes: u64, filename: &str) {
        self.processed = self.processed.saturating_add(bytes);
        if self.last_emit.elapsed().as_millis() > PROGRESS_INTERVAL_MS {
            (self.emit)(ProgressPayload {
                total: self.total,
                processed: self.processed,
                filename: filename.to_string(),
            });
            self.last_emit = Instant::now();
        }
    }

    fn finish(&mut self) {
        (self.emit)(ProgressPayload {
            total: self.total,
            processed: self.total,
            filename: "done".to_string(),
        });
    }
}

fn zip_entry_name(source_root: &Path, path: &Path) -> ArchiveResult<String> {
    let base = source_root.parent().unwrap_or_else(|| Path::new("/"));
    let rel = path.strip_prefix(base).map_err(|_| {
        ArchiveError::new(
            ArchiveErrorCode::InvalidPath,
            format!("{} escapes its source root", path.display()),
        )
    })?;
    Ok(rel.to_string_lossy().replace('\\', "/"))
}

fn source_total_size(sources: &[PathBuf]) -> ArchiveResult<u64> {
    let mut total = 0u64;
    for source in sources {
        if source.is_dir() {
            for entry in WalkDir::new(source).follow_links(false) {
                let entry = entry.map_err(|e| {
                    ArchiveError::new(ArchiveErrorCode::IoError, format!("Failed to walk: {e}"))
                })?;
                if entry.file_type().is_file() {
                    let meta = entry.metadata().map_err(|e| {
                        ArchiveError::new(ArchiveErrorCode::IoError, format!("Failed to stat: {e}"))
                    })?;
                    total = total.saturating_add(meta.len());
                }
            }
        } else {
            let meta = fs::metadata(source).map_err(|e| {
                ArchiveError::from_io_error(&format!("Failed to stat {}", source.display()), e)
            })?;
            total = total.saturating_add(meta.len());
        }
    }
    Ok(total)
}

fn write_zip_file<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    source: &Path,
    entry_name: &str,
    progress: &mut Progress<'_>,
    buf: &mut [u8],
) -> ArchiveResult<()> {
    let file = File::open(source).map_err(|e| {
        ArchiveError::from_io_error(&format!("Failed to open {}", source.display()), e)
    })?;
    let mut reader = BufReader::new(file);
    loop {
        let n = reader.read(buf).map_err(|e| {
            ArchiveError::from_io_error(&format!("Failed to read {}", source.display()), e)
        })?;
        if n == 0 {
            break;
        }
        zip.write_all(&buf[..n]).map_err(|e| {
            ArchiveError::from_io_error(&format!("Failed to write {entry_name}"), e)
        })?;
        progress.add(n as u64, entry_name);
    }
    Ok(())
}

/// Writes `sources` into a fresh zip at `dest`. Directory sources keep their
/// top-level folder inside the archive; plain files land at the root.
fn build_zip(
    dest: &Path,
    sources: &[PathBuf],
    method: Option<&str>,
    password: Option<&str>,
    emit: &mut dyn FnMut(ProgressPayload),
) -> ArchiveResult<()> {
    let compression = match method.unwrap_or("deflated") {
        "stored" => CompressionMethod::Stored,
        _ => CompressionMethod::Deflated,
    };
    let mut options = FileOptions::<()>::default()
        .compression_method(compression)
        .unix_permissions(0o755);
    if let Some(pass) = password {
        options = options.with_aes_encryption(zip::AesMode::Aes128, pass);
    }

    // Exclusive create so an existing archive is never clobbered silently.
    let file = File::options()
        .write(true)
        .create_new(true)
        .open(dest)
        .map_err(|e| {
            ArchiveError::from_io_error(&format!("Failed to create {}", dest.display()), e)
        })?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let total = source_total_size(sources)?;
    let mut progress = Progress::new(total, emit);
    let mut buf = vec![0u8; COPY_BUF];

    for source in sources {
        if source.is_dir() {
            for entry in WalkDir::new(source).follow_links(false) {
                let entry = entry.map_err(|e| {
                    ArchiveError::new(ArchiveErrorCode::IoError, format!("Failed to walk: {e}"))
                })?;
                let name = zip_entry_name(source, entry.path())?;
                if entry.file_type().is_dir() {
                    zip.add_directory(name, options).map_err(|e| {
                        ArchiveError::from_zip_error("Failed to add directory", e)
                    })?;
                } else {
                    zip.start_file(name.clone(), options).map_err(|e| {
                        ArchiveError::from_zip_error("Failed to start zip entry", e)
                    })?;
                    write_zip_file(&mut zip, entry.path(), &name, &mut progress, &mut buf)?;
                }
            }
        } else {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| {
                    ArchiveError::new(
                        ArchiveErrorCode::InvalidPath,
                        format!("{} has no file name", source.display()),
                    )
                })?;
            zip.start_file(name.clone(), options)
                .map_err(|e| ArchiveError::from_zip_error("Failed to start zip entry", e))?;
            write_zip_file(&mut zip, source, &name, &mut progress, &mut buf)?;
        }
    }

    zip.finish()
        .map_err(|e| ArchiveError::from_zip_error("Failed to finalize archive", e))?;
    progress.finish();
    Ok(())
}

/// True when `name` is covered by the selection: an exact match, or a child
/// of a selected directory entry (with or without the trailing slash).
fn entry_selected(name: &str, filters: Option<&[String]>) -> bool {
    let Some(filters) = filters else {
        return true;
    };
    filters.iter().any(|f| {
        if f == name {
            return true;
        }
        if f.ends_with('/') && name.starts_with(f.as_str()) {
            return true;
        }
        name.starts_with(f.as_str()) && name[f.len()..].starts_with('/')
    })
}

fn open_archive(zip_path: &Path) -> ArchiveResult<ZipArchive<File>> {
    let file = File::open(zip_path).map_err(|e| {
        ArchiveError::from_io_error(&format!("Failed to open {}", zip_path.display()), e)
    })?;
    ZipArchive::new(file)
        .map_err(|e| ArchiveError::from_zip_error("Failed to read archive", e))
}

/// Lists archive entries. Encrypted entries that cannot be opened without
/// the (missing or wrong) password degrade to a name-only row instead of
/// failing the whole listing.
fn read_zip_entries(
    zip_path: &Path,
    password: Option<&str>,
) -> ArchiveResult<Vec<ZipEntrySummary>> {
    let mut archive = open_archive(zip_path)?;
    let names: Vec<String> = archive.file_names().map(|s| s.to_string()).collect();

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let opened = match password {
            Some(p) => archive.by_index_decrypt(i, p.as_bytes()),
            None => archive.by_index(i),
        };
        match opened {
            Ok(file) => entries.push(ZipEntrySummary {
                name: file.name().to_string(),
                is_dir: file.is_dir(),
                size: file.size(),
                is_encrypted: file.encrypted(),
            }),
            Err(e) => {
                let classified = ArchiveError::from_zip_error("Failed to open entry", e);
                match classified.code() {
                    ArchiveErrorCode::PasswordRequired | ArchiveErrorCode::InvalidPassword => {
                        let name = names.get(i).cloned().unwrap_or_else(|| format!("entry_{i}"));
                        entries.push(ZipEntrySummary {
                            is_dir: name.ends_with('/'),
                            name,
                            size: 0,
                            is_encrypted: true,
                        });
                    }
                    _ => return Err(classified),
                }
            }
        }
    }
    Ok(entries)
}

/// Extracts the selected entries (all of them when `files` is None) into
/// `target_dir`. With `overwrite` off, any collision with an existing file
/// aborts the whole job before a single byte is written.
fn extract_entries(
    zip_path: &Path,
    files: Option<&[String]>,
    target_dir: &Path,
    overwrite: bool,
    password: Option<&str>,
    emit: &mut dyn FnMut(ProgressPayload),
) -> ArchiveResult<()> {
    let mut archive = open_archive(zip_path)?;

    // Metadata scan via the raw accessor so encrypted entries do not trip it.
    let mut indices = Vec::new();
    let mut total = 0u64;
    for i in 0..archive.len() {
        let file = archive
            .by_index_raw(i)
            .map_err(|e| ArchiveError::from_zip_error("Failed to read entry", e))?;
        if entry_selected(file.name(), files) {
            indices.push(i);
            if !file.is_dir() {
                total = total.saturating_add(file.size());
            }
        }
    }

    if !overwrite {
        for &i in &indices {
            let file = archive
                .by_index_raw(i)
                .map_err(|e| ArchiveError::from_zip_error("Failed to read entry", e))?;
            if file.is_dir() {
                continue;
            }
            let Some(rel) = file.enclosed_name() else {
                continue;
            };
            let outpath = target_dir.join(rel);
            if outpath.exists() {
                return Err(ArchiveError::new(
                    ArchiveErrorCode::FileExists,
                    format!("{} already exists", outpath.display()),
                ));
            }
        }
    }

    let mut progress = Progress::new(total, emit);
    let mut buf = vec![0u8; COPY_BUF];

    for &i in &indices {
        let encrypted = archive
            .by_index_raw(i)
            .map_err(|e| ArchiveError::from_zip_error("Failed to read entry", e))?
            .encrypted();
        let mut file = match password {
            Some(p) => archive
                .by_index_decrypt(i, p.as_bytes())
                .map_err(|e| ArchiveError::from_zip_error("Failed to decrypt entry", e))?,
            None if encrypted => {
                return Err(ArchiveError::new(
                    ArchiveErrorCode::PasswordRequired,
                    "Archive entries are encrypted; a password is required",
                ))
            }
            None => archive
                .by_index(i)
                .map_err(|e| ArchiveError::from_zip_error("Failed to read entry", e))?,
        };

        // enclosed_name rejects entries that would escape the target dir.
        let Some(rel) = file.enclosed_name() else {
            continue;
        };
        let outpath = target_dir.join(rel);
        let entry_name = file.name().to_string();

        if file.is_dir() {
            fs::create_dir_all(&outpath).map_err(|e| {
                ArchiveError::from_io_error(&format!("Failed to create {}", outpath.display()), e)
            })?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ArchiveError::from_io_error(&format!("Failed to create {}", parent.display()), e)
            })?;
        }
        let mut outfile = File::create(&outpath).map_err(|e| {
            ArchiveError::from_io_error(&format!("Failed to create {}", outpath.display()), e)
        })?;
        loop {
            let n = file.read(&mut buf).map_err(|e| {
                ArchiveError::from_io_error(&format!("Failed to read {entry_name}"), e)
            })?;
            if n == 0 {
                break;
            }
            outfile.write_all(&buf[..n]).map_err(|e| {
                ArchiveError::from_io_error(&format!("Failed to write {}", outpath.display()), e)
            })?;
            progress.add(n as u64, &entry_name);
        }
    }

    progress.finish();
    Ok(())
}

/// Destination for a new archive. The parent must already exist; it is
/// canonicalized before the rule check so `..` segments cannot route the
/// write into a denied folder, then the file name is re-joined onto the
/// normalized parent.
fn resolve_destination(target_zip_path: &str, rules: &PathRuleSet) -> ArchiveResult<PathBuf> {
    let raw = PathBuf::from(target_zip_path);
    let name = raw
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| {
            ArchiveError::new(ArchiveErrorCode::InvalidPath, "Archive needs a file name")
        })?;
    let parent = match raw.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => {
            return Err(ArchiveError::new(
                ArchiveErrorCode::InvalidPath,
                "Archive needs a parent folder",
            ))
        }
    };
    let parent = sanitize_path(&parent.to_string_lossy(), true)
        .map_err(|e| ArchiveError::new(ArchiveErrorCode::InvalidPath, e))?;
    if !rules.allows(&parent) {
        return Err(ArchiveError::new(
            ArchiveErrorCode::PermissionDenied,
            format!("Writing is not allowed in {}", parent.display()),
        ));
    }
    Ok(parent.join(name))
}

fn require_writable(path: &Path) -> ArchiveResult<()> {
    let rules = config::current_rules()
        .map_err(|e| ArchiveError::new(ArchiveErrorCode::IoError, e.message))?;
    if !rules.allows(path) {
        return Err(ArchiveError::new(
            ArchiveErrorCode::PermissionDenied,
            format!("Writing is not allowed in {}", path.display()),
        ));
    }
    Ok(())
}

fn task_failed(e: tauri::Error) -> ApiError {
    ApiError::new("task_failed", format!("Archive task failed: {e}"))
}

#[tauri::command]
pub async fn compress_files(
    app: tauri::AppHandle,
    refresh: tauri::State<'_, RefreshCounter>,
    paths: Vec<String>,
    target_zip_path: String,
    method: Option<String>,
    password: Option<String>,
) -> ApiResult<String> {
    let refresh = refresh.inner().clone();
    let result = tauri::async_runtime::spawn_blocking(move || -> ArchiveResult<String> {
        if paths.is_empty() {
            return Err(ArchiveError::new(
                ArchiveErrorCode::InvalidInput,
                "Nothing to compress",
            ));
        }
        let mut sources = Vec::with_capacity(paths.len());
        for raw in &paths {
            sources.push(
                sanitize_path(raw, true)
                    .map_err(|e| ArchiveError::new(ArchiveErrorCode::InvalidPath, e))?,
            );
        }
        let rules = config::current_rules()
            .map_err(|e| ArchiveError::new(ArchiveErrorCode::IoError, e.message))?;
        let dest = resolve_destination(&target_zip_path, &rules)?;

        let mut emit = |payload: ProgressPayload| {
            emit_if_running(&app, "compress-progress", payload);
        };
        build_zip(
            &dest,
            &sources,
            method.as_deref(),
            password.as_deref(),
            &mut emit,
        )?;
        info!(dest = %dest.display(), sources = sources.len(), "archive created");
        refresh.bump();
        Ok(dest.to_string_lossy().to_string())
    })
    .await
    .map_err(task_failed)?;
    map_api_result(result)
}

#[tauri::command]
pub async fn extract_zip(
    app: tauri::AppHandle,
    refresh: tauri::State<'_, RefreshCounter>,
    zip_path: String,
    target_dir: String,
    password: Option<String>,
) -> ApiResult<()> {
    extract_zip_files(app, refresh, zip_path, None, target_dir, true, password).await
}

#[tauri::command]
pub async fn extract_zip_files(
    app: tauri::AppHandle,
    refresh: tauri::State<'_, RefreshCounter>,
    zip_path: String,
    files: Option<Vec<String>>,
    target_dir: String,
    overwrite: bool,
    password: Option<String>,
) -> ApiResult<()> {
    let refresh = refresh.inner().clone();
    let result = tauri::async_runtime::spawn_blocking(move || -> ArchiveResult<()> {
        let zip = sanitize_path(&zip_path, true)
            .map_err(|e| ArchiveError::new(ArchiveErrorCode::InvalidPath, e))?;
        let target = sanitize_path(&target_dir, true)
            .map_err(|e| ArchiveError::new(ArchiveErrorCode::InvalidPath, e))?;
        require_writable(&target)?;

        let mut emit = |payload: ProgressPayload| {
            emit_if_running(&app, "extract-progress", payload);
        };
        extract_entries(
            &zip,
            files.as_deref(),
            &target,
            overwrite,
            password.as_deref(),
            &mut emit,
        )?;
        info!(zip = %zip.display(), target = %target.display(), "archive extracted");
        refresh.bump();
        Ok(())
    })
    .await
    .map_err(task_failed)?;
    map_api_result(result)
}

#[tauri::command]
pub async fn list_zip_contents(
    zip_path: String,
    password: Option<String>,
) -> ApiResult<Vec<ZipEntrySummary>> {
    let result = tauri::async_runtime::spawn_blocking(move || {
        let zip = sanitize_path(&zip_path, true)
            .map_err(|e| ArchiveError::new(ArchiveErrorCode::InvalidPath, e))?;
        read_zip_entries(&zip, password.as_deref())
    })
    .await
    .map_err(task_failed)?;
    map_api_result(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn uniq_dir(label: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_nanos();
        std::env::temp_dir().join(format!("ferry-zip-{label}-{}-{ts}", std::process::id()))
    }

    fn sink() -> impl FnMut(ProgressPayload) {
        |_payload| {}
    }

    fn sample_tree(base: &Path) -> PathBuf {
        let root = base.join("docs");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a.txt"), b"alpha").unwrap();
        fs::write(root.join("sub").join("b.txt"), b"beta").unwrap();
        root
    }

    #[test]
    fn selection_matches_exact_and_directory_children() {
        let filters = vec!["docs/sub/".to_string(), "docs/a.txt".to_string()];
        assert!(entry_selected("docs/a.txt", Some(&filters)));
        assert!(entry_selected("docs/sub/b.txt", Some(&filters)));
        assert!(!entry_selected("docs/other.txt", Some(&filters)));
        // No trailing slash on the filter still covers children.
        let bare = vec!["docs/sub".to_string()];
        assert!(entry_selected("docs/sub/b.txt", Some(&bare)));
        assert!(!entry_selected("docs/subset.txt", Some(&bare)));
        // None means everything.
        assert!(entry_selected("anything", None));
    }

    #[test]
    fn destination_parent_is_normalized_before_the_rule_check() {
        let base = uniq_dir("ruledodge");
        fs::create_dir_all(base.join("allowed")).unwrap();
        fs::create_dir_all(base.join("denied")).unwrap();
        let base = base.canonicalize().unwrap();
        let rules =
            PathRuleSet::from_lists(&[base.join("allowed").to_string_lossy().to_string()], &[]);

        // A dot-dot segment routes the lexical path under the allowed folder
        // while the real parent is the denied sibling.
        let dodgy = base.join("allowed").join("..").join("denied").join("x.zip");
        let err = resolve_destination(&dodgy.to_string_lossy(), &rules).unwrap_err();
        assert_eq!(err.code(), ArchiveErrorCode::PermissionDenied);

        let fine = base.join("allowed").join("x.zip");
        let dest = resolve_destination(&fine.to_string_lossy(), &rules).unwrap();
        assert_eq!(dest, base.join("allowed").join("x.zip"));

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn build_then_list_shows_tree_entries() {
        let base = uniq_dir("list");
        fs::create_dir_all(&base).unwrap();
        let root = sample_tree(&base);
        let dest = base.join("out.zip");

        let mut emit = sink();
        build_zip(&dest, &[root], None, None, &mut emit).unwrap();

        let entries = read_zip_entries(&dest, None).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"docs/a.txt"));
        assert!(names.contains(&"docs/sub/b.txt"));
        let file = entries.iter().find(|e| e.name == "docs/a.txt").unwrap();
        assert_eq!(file.size, 5);
        assert!(!file.is_encrypted);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn creating_over_an_existing_archive_fails() {
        let base = uniq_dir("clobber");
        fs::create_dir_all(&base).unwrap();
        let root = sample_tree(&base);
        let dest = base.join("out.zip");
        fs::write(&dest, b"not a zip").unwrap();

        let mut emit = sink();
        let err = build_zip(&dest, &[root], None, None, &mut emit).unwrap_err();
        assert_eq!(err.code(), ArchiveErrorCode::FileExists);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn extract_selected_entries_only() {
        let base = uniq_dir("select");
        fs::create_dir_all(&base).unwrap();
        let root = sample_tree(&base);
        let dest = base.join("out.zip");
        let mut emit = sink();
        build_zip(&dest, &[root], None, None, &mut emit).unwrap();

        let target = base.join("unpacked");
        fs::create_dir_all(&target).unwrap();
        let files = vec!["docs/sub/".to_string()];
        let mut payloads = Vec::new();
        extract_entries(&dest, Some(&files), &target, false, None, &mut |p| {
            payloads.push(p)
        })
        .unwrap();

        assert!(target.join("docs/sub/b.txt").exists());
        assert!(!target.join("docs/a.txt").exists());
        let last = payloads.last().unwrap();
        assert_eq!(last.processed, last.total);
        assert_eq!(last.filename, "done");

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn overwrite_off_aborts_before_writing_anything() {
        let base = uniq_dir("exists");
        fs::create_dir_all(&base).unwrap();
        let root = sample_tree(&base);
        let dest = base.join("out.zip");
        let mut emit = sink();
        build_zip(&dest, &[root], None, None, &mut emit).unwrap();

        let target = base.join("unpacked");
        fs::create_dir_all(target.join("docs")).unwrap();
        fs::write(target.join("docs/a.txt"), b"old").unwrap();

        let err =
            extract_entries(&dest, None, &target, false, None, &mut sink()).unwrap_err();
        assert_eq!(err.code(), ArchiveErrorCode::FileExists);
        // The colliding file is untouched and nothing else was created.
        assert_eq!(fs::read(target.join("docs/a.txt")).unwrap(), b"old");
        assert!(!target.join("docs/sub").exists());

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn encrypted_archive_lists_name_only_without_password() {
        let base = uniq_dir("aes");
        fs::create_dir_all(&base).unwrap();
        let root = sample_tree(&base);
        let dest = base.join("secret.zip");
        let mut emit = sink();
        build_zip(&dest, &[root], None, Some("hunter2"), &mut emit).unwrap();

        let entries = read_zip_entries(&dest, None).unwrap();
        let file = entries.iter().find(|e| e.name == "docs/a.txt").unwrap();
        assert!(file.is_encrypted);
        assert_eq!(file.size, 0, "size is withheld without the password");

        let with_pass = read_zip_entries(&dest, Some("hunter2")).unwrap();
        let file = with_pass.iter().find(|e| e.name == "docs/a.txt").unwrap();
        assert_eq!(file.size, 5);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn extracting_encrypted_entries_without_password_is_rejected() {
        let base = uniq_dir("needpass");
        fs::create_dir_all(&base).unwrap();
        let root = sample_tree(&base);
        let dest = base.join("secret.zip");
        let mut emit = sink();
        build_zip(&dest, &[root], None, Some("hunter2"), &mut emit).unwrap();

        let target = base.join("unpacked");
        fs::create_dir_all(&target).unwrap();
        let err = extract_entries(&dest, None, &target, true, None, &mut sink()).unwrap_err();
        assert_eq!(err.code(), ArchiveErrorCode::PasswordRequired);

        let target2 = base.join("unpacked2");
        fs::create_dir_all(&target2).unwrap();
        extract_entries(&dest, None, &target2, true, Some("hunter2"), &mut sink()).unwrap();
        assert_eq!(fs::read(target2.join("docs/a.txt")).unwrap(), b"alpha");

        let _ = fs::remove_dir_all(&base);
    }
}
