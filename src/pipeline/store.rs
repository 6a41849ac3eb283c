//! Upload storage: persist the received statement under the upload directory.
//!
//! Files keep the name the client sent. Nothing is deduplicated or cleaned
//! up; a second upload with the same name overwrites the first. A name that
//! would land outside the upload directory (`..`, absolute paths, nested
//! directories) is refused.

use crate::error::RelayError;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Name used when the client sends no filename at all.
pub const FALLBACK_FILENAME: &str = "upload.pdf";

/// Resolve the on-disk path for a client-supplied filename.
pub fn upload_path(upload_dir: &Path, filename: &str) -> Result<PathBuf, RelayError> {
    if filename.trim().is_empty() {
        return Ok(upload_dir.join(FALLBACK_FILENAME));
    }

    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Ok(upload_dir.join(name)),
        _ => Err(RelayError::UnsafeFilename {
            filename: filename.to_string(),
        }),
    }
}

/// Write `bytes` to the upload directory and return the stored path.
///
/// The directory is created if it does not exist yet.
pub async fn store_upload(
    upload_dir: &Path,
    filename: &str,
    bytes: &[u8],
) -> Result<PathBuf, RelayError> {
    let path = upload_path(upload_dir, filename)?;

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| RelayError::StoreFailed {
            path: upload_dir.to_path_buf(),
            source: e,
        })?;

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| RelayError::StoreFailed {
            path: path.clone(),
            source: e,
        })?;

    debug!("Stored {} bytes at {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_filename_joins_upload_dir() {
        let p = upload_path(Path::new("uploads"), "march.pdf").unwrap();
        assert_eq!(p, PathBuf::from("uploads/march.pdf"));
    }

    #[test]
    fn empty_filename_falls_back() {
        let p = upload_path(Path::new("uploads"), "  ").unwrap();
        assert_eq!(p, PathBuf::from("uploads").join(FALLBACK_FILENAME));
    }

    #[test]
    fn surrounding_whitespace_is_kept() {
        let p = upload_path(Path::new("uploads"), " a.pdf ").unwrap();
        assert_eq!(p, PathBuf::from("uploads/ a.pdf "));
    }

    #[test]
    fn escaping_filenames_are_refused() {
        for name in ["../secret.pdf", "/etc/passwd", "a/b.pdf", ".", ".."] {
            let err = upload_path(Path::new("uploads"), name).unwrap_err();
            assert!(
                matches!(err, RelayError::UnsafeFilename { .. }),
                "{name} should be refused"
            );
        }
    }

    #[tokio::test]
    async fn store_creates_directory_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested");

        let first = store_upload(&dir, "s.pdf", b"one").await.unwrap();
        let second = store_upload(&dir, "s.pdf", b"two").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second).unwrap(), b"two");
    }
}
