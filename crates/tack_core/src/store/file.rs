//! Tack file bootstrap and persistence.
//!
//! # Responsibility
//! - Open the tack file, creating its directory and an empty document on
//!   first use.
//! - Persist the whole document through a temporary file and atomic rename.
//!
//! # Invariants
//! - A returned `TackStore` always corresponds to a file that exists on disk.
//! - A crash mid-persist leaves either the old or the new file, never a
//!   truncated one.

use super::document::TackDocument;
use super::{StoreError, StoreResult};
use log::{debug, error, info};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Loaded tack file plus the path it is persisted to.
#[derive(Debug)]
pub struct TackStore {
    path: PathBuf,
    document: TackDocument,
}

impl TackStore {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &TackDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut TackDocument {
        &mut self.document
    }

    /// Writes the full document, pretty-printed, over the store file.
    ///
    /// # Errors
    /// - Returns `StoreError::Serialize` when encoding fails.
    /// - Returns `StoreError::Io` when the temporary file cannot be written
    ///   or renamed over the target.
    pub fn save(&self) -> StoreResult<()> {
        let started_at = Instant::now();
        let data = serde_json::to_vec_pretty(&self.document).map_err(StoreError::Serialize)?;

        let dir = parent_dir(&self.path);
        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| StoreError::Io {
            action: "create temporary file in",
            path: dir.to_path_buf(),
            source,
        })?;
        tmp.write_all(&data)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|source| StoreError::Io {
                action: "write",
                path: tmp.path().to_path_buf(),
                source,
            })?;
        tmp.persist(&self.path).map_err(|err| StoreError::Io {
            action: "replace",
            path: self.path.clone(),
            source: err.error,
        })?;

        debug!(
            "event=store_save module=store status=ok bytes={} duration_ms={}",
            data.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Opens the tack file at `path`, creating it when absent.
///
/// # Side effects
/// - Creates the parent directory if missing.
/// - Writes an empty document when the file does not exist yet.
/// - Emits `store_open` logging events with duration and status.
pub fn open_store(path: impl AsRef<Path>) -> StoreResult<TackStore> {
    let started_at = Instant::now();
    info!("event=store_open module=store status=start");

    match load_or_init(path.as_ref()) {
        Ok(store) => {
            info!(
                "event=store_open module=store status=ok directories={} tacks={} duration_ms={}",
                store.document.groups().len(),
                store.document.tack_count(),
                started_at.elapsed().as_millis()
            );
            Ok(store)
        }
        Err(err) => {
            error!(
                "event=store_open module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn load_or_init(path: &Path) -> StoreResult<TackStore> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        action: "create directory",
        path: dir.to_path_buf(),
        source,
    })?;

    match fs::read(path) {
        Ok(bytes) => {
            let document = serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(TackStore {
                path: path.to_path_buf(),
                document,
            })
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("event=store_init module=store status=ok");
            let store = TackStore {
                path: path.to_path_buf(),
                document: TackDocument::default(),
            };
            store.save()?;
            Ok(store)
        }
        Err(source) => Err(StoreError::Io {
            action: "read",
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
