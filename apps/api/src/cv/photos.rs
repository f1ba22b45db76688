use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

/// Route prefix photo references are served under. Stored records embed
/// `{PHOTO_ROUTE_PREFIX}<filename>` in `personalInfo.photo`.
pub const PHOTO_ROUTE_PREFIX: &str = "/api/image/";

/// Maximum accepted upload size: 5 MB.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// MIME types the upload gate lets through.
pub const ACCEPTED_PHOTO_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Owns the uploads directory: writes photo binaries under generated
/// collision-resistant filenames and deletes them on replace/delete.
///
/// Orphan cleanup relies entirely on the delete/replace paths calling
/// [`PhotoLibrary::remove`]; a file orphaned by a crash between the photo
/// write and the collection write is never reconciled.
#[derive(Clone)]
pub struct PhotoLibrary {
    root: PathBuf,
}

impl PhotoLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PhotoLibrary { root: root.into() }
    }

    /// Writes the binary under `<millis>-<uuid-fragment>.<ext>` and returns
    /// the serving reference to embed in the record.
    pub fn save(&self, bytes: &Bytes, content_type: &str) -> Result<String> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("creating {}", self.root.display()))?;

        let ext = match content_type {
            "image/png" => "png",
            _ => "jpg",
        };
        let filename = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            ext
        );
        let path = self.root.join(&filename);
        std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
        info!("Stored photo {} ({} bytes)", filename, bytes.len());
        Ok(format!("{PHOTO_ROUTE_PREFIX}{filename}"))
    }

    /// Deletes the file behind a stored reference. A reference outside the
    /// image route or an already-missing file is logged and ignored — the
    /// record mutation has priority over the cleanup.
    pub fn remove(&self, reference: &str) {
        let Some(filename) = reference.strip_prefix(PHOTO_ROUTE_PREFIX) else {
            warn!("Ignoring photo reference outside the image route: {reference}");
            return;
        };
        let Some(path) = self.resolve(filename) else {
            warn!("Ignoring photo reference with unsafe filename: {reference}");
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => info!("Deleted photo {filename}"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete photo {filename}: {e}"),
        }
    }

    /// Maps a bare filename to its on-disk path, rejecting anything that
    /// could escape the uploads directory.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return None;
        }
        Some(self.root.join(filename))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Content type for a stored photo, derived from its file extension.
pub fn content_type_for(filename: &str) -> &'static str {
    match Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> (tempfile::TempDir, PhotoLibrary) {
        let dir = tempfile::tempdir().unwrap();
        let library = PhotoLibrary::new(dir.path());
        (dir, library)
    }

    #[test]
    fn test_save_returns_serving_reference() {
        let (_dir, library) = library();
        let reference = library.save(&Bytes::from_static(b"png-bytes"), "image/png").unwrap();
        assert!(reference.starts_with(PHOTO_ROUTE_PREFIX));
        assert!(reference.ends_with(".png"));

        let filename = reference.strip_prefix(PHOTO_ROUTE_PREFIX).unwrap();
        let path = library.resolve(filename).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"png-bytes");
    }

    #[test]
    fn test_save_generates_distinct_filenames() {
        let (_dir, library) = library();
        let a = library.save(&Bytes::from_static(b"a"), "image/jpeg").unwrap();
        let b = library.save(&Bytes::from_static(b"b"), "image/jpeg").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_deletes_file() {
        let (_dir, library) = library();
        let reference = library.save(&Bytes::from_static(b"x"), "image/jpeg").unwrap();
        let filename = reference.strip_prefix(PHOTO_ROUTE_PREFIX).unwrap().to_string();
        library.remove(&reference);
        assert!(!library.resolve(&filename).unwrap().exists());
    }

    #[test]
    fn test_remove_is_silent_on_missing_file() {
        let (_dir, library) = library();
        library.remove("/api/image/never-existed.png");
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (_dir, library) = library();
        assert!(library.resolve("../secrets.txt").is_none());
        assert!(library.resolve("a/b.png").is_none());
        assert!(library.resolve("").is_none());
        assert!(library.resolve("photo.png").is_some());
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for("a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("a.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.gif"), "image/gif");
        assert_eq!(content_type_for("a.webp"), "image/webp");
        assert_eq!(content_type_for("a.svg"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
