use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a raw frontend path into an absolute, symlink-free path.
/// Mutating commands refuse to operate on the filesystem root.
pub fn sanitize_path(raw: &str, forbid_root: bool) -> Result<PathBuf, String> {
    let pb = PathBuf::from(raw);
    let canon = match pb.canonicalize() {
        Ok(c) => c,
        Err(e) => {
            debug!(path = %pb.display(), error = ?e, "canonicalize failed");
            return Err(format!("Failed to canonicalize path: {e}"));
        }
    };
    if forbid_root && canon.is_absolute() && canon.parent().is_none() {
        return Err("Refusing to operate on filesystem root".into());
    }
    Ok(canon)
}

pub fn leaf_name(path: &Path) -> Result<&str, String> {
    path.file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Path has no usable file name: {}", path.display()))
}

/// Split a file name at the last dot. Names without a dot, or with a
/// leading dot only ("\.profile"), have no extension.
pub fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

pub fn numbered_candidate(name: &str, idx: usize) -> String {
    if idx == 0 {
        return name.to_string();
    }
    let (stem, ext) = split_name(name);
    match ext {
        Some(ext) => format!("{stem}_{idx}.{ext}"),
        None => format!("{stem}_{idx}"),
    }
}

/// Collision-free destination for `desired_name` under `dir`, probing
/// `stem_1.ext`, `stem_2.ext`, ... against the live filesystem. Best effort
/// only; the exclusive-create open of the copy primitive is the real
/// guarantee against a concurrent actor grabbing the name first.
pub fn unique_path(dir: &Path, desired_name: &str) -> PathBuf {
    unique_path_with(dir, desired_name, |candidate| {
        fs::symlink_metadata(candidate).is_ok()
    })
}

pub fn unique_path_with<F>(dir: &Path, desired_name: &str, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let mut idx = 0usize;
    loop {
        let candidate = dir.join(numbered_candidate(desired_name, idx));
        if !exists(&candidate) {
            return candidate;
        }
        idx += 1;
    }
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
        std::env::temp_dir().join(format!("ferry-fsutil-{label}-{}-{ts}", std::process::id()))
    }

    #[test]
    fn split_name_keeps_last_extension_only() {
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", Some("gz")));
        assert_eq!(split_name("README"), ("README", None));
        assert_eq!(split_name(".profile"), (".profile", None));
    }

    #[test]
    fn unique_path_counts_up_preserving_extension() {
        let dir = uniq_dir("unique");
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(unique_path(&dir, "f.txt"), dir.join("f.txt"));

        fs::write(dir.join("f.txt"), b"x").unwrap();
        assert_eq!(unique_path(&dir, "f.txt"), dir.join("f_1.txt"));

        fs::write(dir.join("f_1.txt"), b"x").unwrap();
        assert_eq!(unique_path(&dir, "f.txt"), dir.join("f_2.txt"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unique_path_without_extension_appends_counter() {
        let dir = uniq_dir("noext");
        fs::create_dir_all(&dir).unwrap();
        fs::create_dir(dir.join("notes")).unwrap();

        assert_eq!(unique_path(&dir, "notes"), dir.join("notes_1"));

        let _ = fs::remove_dir_all(&dir);
    }
}
