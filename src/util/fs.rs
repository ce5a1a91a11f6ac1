//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Read a file to string, returning `None` if it doesn't exist.
pub fn read_to_string_if_exists(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read file: {}", path.display())),
    }
}

/// Canonicalize a path, but don't fail if it doesn't exist.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Create a symlink (platform-aware).
#[cfg(unix)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
pub fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relative_path() {
        let base = Path::new("/project");
        let path = Path::new("/project/src/ik/solver.cpp");
        assert_eq!(relative_path(base, path), PathBuf::from("src/ik/solver.cpp"));
    }

    #[test]
    fn test_read_to_string_if_exists() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("present.txt");
        fs::write(&file, "content").unwrap();

        assert_eq!(
            read_to_string_if_exists(&file).unwrap().as_deref(),
            Some("content")
        );
        assert!(read_to_string_if_exists(&tmp.path().join("absent.txt"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_resolve_against() {
        let base = Path::new("/project");
        assert_eq!(
            resolve_against(base, Path::new("src")),
            PathBuf::from("/project/src")
        );
        assert_eq!(
            resolve_against(base, Path::new("/opt/src")),
            PathBuf::from("/opt/src")
        );
    }
}
