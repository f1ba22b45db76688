use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::models::cv::CvRecord;

/// On-disk layout of the backing file: one JSON document `{ "cvs": [...] }`.
#[derive(Debug, Deserialize)]
struct CvDocument {
    cvs: Vec<CvRecord>,
}

/// How a [`crate::store::CvStore`] survives (or doesn't) across restarts.
///
/// `load` returning `Ok(None)` means "no usable prior state" — the store
/// seeds itself and persists the seed immediately. The CRUD logic upstream
/// never branches on which implementation is mounted.
pub trait Persistence: Send {
    fn load(&self) -> Result<Option<Vec<CvRecord>>>;
    fn persist(&self, cvs: &[CvRecord]) -> Result<()>;
}

/// Pure in-memory backend: nothing to load, nothing to write.
pub struct Ephemeral;

impl Persistence for Ephemeral {
    fn load(&self) -> Result<Option<Vec<CvRecord>>> {
        Ok(None)
    }

    fn persist(&self, _cvs: &[CvRecord]) -> Result<()> {
        Ok(())
    }
}

/// File-mirrored backend: the whole collection is rewritten after every
/// mutation, last writer wins. A corrupt file is treated the same as a
/// missing one (logged, then reseeded) rather than taking the server down.
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFile { path: path.into() }
    }
}

impl Persistence for JsonFile {
    fn load(&self) -> Result<Option<Vec<CvRecord>>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        match serde_json::from_str::<CvDocument>(&raw) {
            Ok(doc) => Ok(Some(doc.cvs)),
            Err(e) => {
                warn!(
                    "Backing file {} is corrupt ({e}); falling back to seed data",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    fn persist(&self, cvs: &[CvRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let doc = serde_json::json!({ "cvs": cvs });
        let raw = serde_json::to_string_pretty(&doc)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}
