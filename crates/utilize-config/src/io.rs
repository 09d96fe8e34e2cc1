//! Atomic file I/O with advisory locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Write content atomically to a file with locking.
///
/// Content goes to a sibling temp file first, which is locked, flushed and
/// then renamed over `path`. An existing file at `path` is replaced.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_path = temp_path_for(path);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .lock_exclusive()
        .map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(path, e));
    }

    tracing::trace!(path = %path.display(), bytes = content.len(), "atomic write completed");
    Ok(())
}

/// Read a UTF-8 text file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Read a file as raw bytes.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/config.ini");

        write_text(&path, "[global]\n").unwrap();

        assert_eq!(read_text(&path).unwrap(), "[global]\n");
    }

    #[test]
    fn test_write_atomic_replaces_existing_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "old content that is longer than the new one").unwrap();

        write_text(&path, "new").unwrap();

        assert_eq!(read_text(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file_behind() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.kvs");

        write_atomic(&path, b"\x00\x01").unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["data.kvs".to_string()]);
        assert_eq!(read_bytes(&path).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_read_text_reports_missing_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.ini");

        let err = read_text(&missing).unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path == &missing));
    }
}
