//! Crash-safe file helpers
//!
//! Every write goes through a temp file in the destination directory that is
//! fsynced and renamed over the target, so readers never see a torn file.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write `data` to `path` atomically with the given unix permission bits.
pub fn write_atomic(path: &Path, data: &[u8], mode: Option<u32>) -> io::Result<()> {
    let dir = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    if let Some(mode) = mode {
        set_mode(tmp.path(), mode)?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Copy `src` to `dst` atomically, preserving the source permissions.
pub fn copy_atomic(src: &Path, dst: &Path) -> io::Result<()> {
    let mut data = Vec::new();
    fs::File::open(src)?.read_to_end(&mut data)?;
    let mode = file_mode(src)?;
    write_atomic(dst, &data, mode)
}

/// Permission bits of an existing file, `None` where not applicable.
pub fn file_mode(path: &Path) -> io::Result<Option<u32>> {
    let meta = fs::metadata(path)?;
    Ok(mode_of(&meta))
}

#[cfg(unix)]
fn mode_of(meta: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn mode_of(_meta: &fs::Metadata) -> Option<u32> {
    None
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Pick `base`, or `base-1`, `base-2`, ... until a name is free.
pub fn unique_path(base: PathBuf) -> PathBuf {
    if fs::symlink_metadata(&base).is_err() {
        return base;
    }
    let raw = base.as_os_str().to_string_lossy().into_owned();
    let mut n = 1;
    loop {
        let candidate = PathBuf::from(format!("{raw}-{n}"));
        if fs::symlink_metadata(&candidate).is_err() {
            return candidate;
        }
        n += 1;
    }
}

/// Local timestamp used in backup names.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y%m%d-%H%M%S").to_string()
}

/// Expand a leading `~` to the home directory.
pub fn expand_user(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.json");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, b"new", None).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_atomic_preserves_mode() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::write(&src, "data").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o600)).unwrap();
        let dst = tmp.path().join("dst");
        copy_atomic(&src, &dst).unwrap();
        let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "data");
    }

    #[test]
    fn test_unique_path_appends_counter() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("x.bak.20240101-000000");
        assert_eq!(unique_path(base.clone()), base);
        fs::write(&base, "").unwrap();
        let next = unique_path(base.clone());
        assert!(next.to_string_lossy().ends_with("-1"));
        fs::write(&next, "").unwrap();
        assert!(unique_path(base).to_string_lossy().ends_with("-2"));
    }

    #[test]
    fn test_expand_user_leaves_plain_paths() {
        assert_eq!(expand_user("/etc/x"), PathBuf::from("/etc/x"));
        assert_eq!(expand_user("rel/x"), PathBuf::from("rel/x"));
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "-");
    }
}
