use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

/// Documents at or above this size are memory-mapped instead of read.
pub const DEFAULT_MMAP_THRESHOLD_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("the file '{}' does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Decide whether to use mmap based on file size and threshold.
pub fn should_use_mmap(file_size_bytes: u64, threshold_bytes: u64) -> bool {
    file_size_bytes >= threshold_bytes
}

/// Read a whole document into memory. Files at or above `threshold_bytes` are
/// memory-mapped. Invalid UTF-8 is replaced rather than rejected.
pub fn read_document<P: AsRef<Path>>(path: P, threshold_bytes: u64) -> Result<String, LoadError> {
    let path = path.as_ref();
    let meta = fs::metadata(path).map_err(|e| LoadError::from_io(path, e))?;
    let text = if meta.is_file() && should_use_mmap(meta.len(), threshold_bytes) {
        let file = File::open(path).map_err(|e| LoadError::from_io(path, e))?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| LoadError::from_io(path, e))?;
        decode(&mmap)
    } else {
        let bytes = fs::read(path).map_err(|e| LoadError::from_io(path, e))?;
        decode(&bytes)
    };
    log::info!(
        "loaded {} ({} bytes, {} lines)",
        path.display(),
        text.len(),
        memchr::memchr_iter(b'\n', text.as_bytes()).count()
    );
    Ok(text)
}

fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            log::warn!("document is not valid UTF-8; invalid sequences replaced");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = read_document(dir.path().join("nope.ldif"), DEFAULT_MMAP_THRESHOLD_BYTES)
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = read_document(dir.path(), DEFAULT_MMAP_THRESHOLD_BYTES).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn mmap_and_buffered_reads_agree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("d.ldif");
        fs::write(&path, "dn: uid=a\r\nuid: a\n").unwrap();
        let mapped = read_document(&path, 1).unwrap();
        let buffered = read_document(&path, u64::MAX).unwrap();
        assert_eq!(mapped, buffered);
        assert_eq!(mapped.lines().count(), 2);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.ldif");
        fs::write(&path, b"dn: cn=caf\xe9\n").unwrap();
        let text = read_document(&path, u64::MAX).unwrap();
        assert!(text.starts_with("dn: cn=caf"));
    }
}
