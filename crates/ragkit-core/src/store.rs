//! Flat JSON vector store.
//!
//! A store file is a pretty-printed JSON array of [`Entry`] objects:
//!
//! ```json
//! [
//!   {
//!     "id": 0,
//!     "source": "guide.md",
//!     "text": "…",
//!     "embedding": [0.012, -0.034]
//!   }
//! ]
//! ```
//!
//! The file is always rewritten whole. [`save_store`] writes to a temporary
//! file next to the target and renames it into place, so a concurrent
//! [`load_store`] sees either the old list or the new one, never a
//! truncated file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::models::Entry;

/// Read and decode a store file.
///
/// # Errors
///
/// [`Error::StoreIo`] if the file is missing or unreadable,
/// [`Error::StoreDecode`] if it is not a JSON array of entries.
pub fn load_store(path: &Path) -> Result<Vec<Entry>> {
    let data = fs::read(path).map_err(|source| Error::StoreIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| Error::StoreDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `entries` and replace the store file at `path`.
///
/// Creates the parent directory if needed.
///
/// # Errors
///
/// [`Error::StoreIo`] if the directory cannot be created or the file cannot
/// be written.
pub fn save_store(path: &Path, entries: &[Entry]) -> Result<()> {
    let dir = parent_dir(path);
    let io_err = |source| Error::StoreIo {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(&dir).map_err(io_err)?;

    let payload = serde_json::to_vec_pretty(entries).map_err(Error::StoreEncode)?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
    tmp.write_all(&payload).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    tracing::debug!(path = %path.display(), entries = entries.len(), "store saved");
    Ok(())
}

/// The directory a store file lives in (`.` for a bare file name).
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
