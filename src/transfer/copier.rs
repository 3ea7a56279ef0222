use std::{
    fs,
    io::{ErrorKind, Read, Write},
    path::{Path, PathBuf},
};

use super::error::{TransferError, TransferErrorCode, TransferResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// The walk/stat/copy/mkdir seam the copier and orchestrator run against.
/// Production uses [`RealFs`]; tests script failures through a wrapper to
/// exercise the abort-on-first-failure contract.
pub trait FsPrimitives {
    fn kind(&self, path: &Path) -> TransferResult<EntryKind>;
    fn exists(&self, path: &Path) -> bool;
    /// Immediate child names of `dir`, no recursion.
    fn children(&self, dir: &Path) -> TransferResult<Vec<String>>;
    /// Create `path` as a directory; an already existing directory is fine.
    fn mkdir(&self, path: &Path) -> TransferResult<()>;
    /// Copy file content and permissions. Destination is opened with
    /// exclusive-create semantics so a concurrent name grab fails loudly
    /// instead of silently overwriting.
    fn copy_file(&self, src: &Path, dest: &Path) -> TransferResult<()>;
    fn rename(&self, src: &Path, dest: &Path) -> TransferResult<()>;
    fn remove(&self, path: &Path) -> TransferResult<()>;
}

pub struct RealFs;

impl FsPrimitives for RealFs {
    fn kind(&self, path: &Path) -> TransferResult<EntryKind> {
        let meta = fs::symlink_metadata(path).map_err(|e| {
            TransferError::from_io_error(&format!("Failed to read metadata for {}", path.display()), e)
        })?;
        if meta.file_type().is_symlink() {
            return Err(TransferError::new(
                TransferErrorCode::SymlinkUnsupported,
                format!("Symlinks are not supported: {}", path.display()),
            ));
        }
        Ok(if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        })
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn children(&self, dir: &Path) -> TransferResult<Vec<String>> {
        let rd = fs::read_dir(dir).map_err(|e| {
            TransferError::from_io_error(&format!("Failed to read dir {}", dir.display()), e)
        })?;
        let mut names = Vec::new();
        for item in rd {
            let item = item.map_err(|e| {
                TransferError::from_io_error("Failed to read dir entry", e)
            })?;
            match item.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    return Err(TransferError::new(
                        TransferErrorCode::InvalidPath,
                        format!("Entry name is not valid UTF-8: {:?}", raw),
                    ))
                }
            }
        }
        Ok(names)
    }

    fn mkdir(&self, path: &Path) -> TransferResult<()> {
        match fs::create_dir(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            Err(e) => Err(TransferError::from_io_error(
                &format!("Failed to create dir {}", path.display()),
                e,
            )),
        }
    }

    fn copy_file(&self, src: &Path, dest: &Path) -> TransferResult<()> {
        let mut reader = fs::File::open(src).map_err(|e| {
            TransferError::from_io_error(&format!("Failed to open source {}", src.display()), e)
        })?;
        let mut writer = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dest)
            .map_err(|e| {
                TransferError::from_io_error(
                    &format!("Failed to create destination {}", dest.display()),
                    e,
                )
            })?;

        let mut buf = vec![0u8; 512 * 1024];
        loop {
            let n = reader.read(&mut buf).map_err(|e| {
                TransferError::from_io_error(&format!("Read failed for {}", src.display()), e)
            })?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n]).map_err(|e| {
                TransferError::from_io_error(&format!("Write failed for {}", dest.display()), e)
            })?;
        }

        // Permission bits travel with the copy; timestamps are left to the
        // filesystem.
        if let Ok(meta) = fs::metadata(src) {
            let _ = fs::set_permissions(dest, meta.permissions());
        }
        Ok(())
    }

    fn rename(&self, src: &Path, dest: &Path) -> TransferResult<()> {
        fs::rename(src, dest).map_err(|e| {
            TransferError::from_io_error(
                &format!("Failed to rename {} -> {}", src.display(), dest.display()),
                e,
            )
        })
    }

    fn remove(&self, path: &Path) -> TransferResult<()> {
        let result = match self.kind(path)? {
            EntryKind::Dir => fs::remove_dir_all(path),
            EntryKind::File => fs::remove_file(path),
        };
        result.map_err(|e| {
            TransferError::from_io_error(&format!("Failed to delete {}", path.display()), e)
        })
    }
}

/// Copy a file or directory subtree. Directories are walked with an explicit
/// work list rather than recursion, so tree depth never grows the call
/// stack. The first failing entry aborts the remainder; output already
/// written stays in place.
pub fn copy_entry<F: FsPrimitives>(fs: &F, source: &Path, destination: &Path) -> TransferResult<()> {
    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(source.to_path_buf(), destination.to_path_buf())];
    while let Some((src, dest)) = pending.pop() {
        match fs.kind(&src)? {
            EntryKind::File => fs.copy_file(&src, &dest)?,
            EntryKind::Dir => {
                fs.mkdir(&dest)?;
                for name in fs.children(&src)? {
                    pending.push((src.join(&name), dest.join(&name)));
                }
            }
        }
    }
    Ok(())
}

/// Move an entry: atomic rename when the filesystem permits, copy plus
/// delete-source across devices.
pub fn move_entry<F: FsPrimitives>(fs: &F, source: &Path, destination: &Path) -> TransferResult<()> {
    if fs.rename(source, destination).is_ok() {
        return Ok(());
    }
    copy_entry(fs, source, destination)?;
    fs.remove(source)
}
