//! Filesystem entry snapshot
//!
//! Metadata is read fresh for every request; nothing is cached.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemEntry {
    pub path: PathBuf,
    pub is_directory: bool,
    pub is_regular_file: bool,
    pub readable: bool,
    pub writable: bool,
    pub len: u64,
    /// Modification time, millis since the epoch
    pub modified_ms: i64,
}

impl FileSystemEntry {
    /// Read metadata for `path`, following symlinks
    ///
    /// Returns `None` when nothing exists at `path`.
    pub async fn probe(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).await.ok()?;
        let is_directory = metadata.is_dir();

        let modified_ms = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |since| i64::try_from(since.as_millis()).unwrap_or(i64::MAX));

        Some(Self {
            path: path.to_path_buf(),
            is_directory,
            is_regular_file: metadata.is_file(),
            readable: is_readable(path, &metadata).await,
            writable: !metadata.permissions().readonly(),
            len: metadata.len(),
            modified_ms,
        })
    }

    /// Placeholder for a name that vanished between listing and probing
    pub fn absent(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            is_directory: false,
            is_regular_file: false,
            readable: false,
            writable: false,
            len: 0,
            modified_ms: 0,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Directories and regular files are opened, which honours ACLs and
/// ownership. Special files are judged by their permission bits instead:
/// `open` on a FIFO blocks until a writer shows up.
async fn is_readable(path: &Path, metadata: &Metadata) -> bool {
    if metadata.is_dir() {
        fs::read_dir(path).await.is_ok()
    } else if metadata.is_file() {
        fs::File::open(path).await.is_ok()
    } else {
        special_file_readable(metadata)
    }
}

#[cfg(unix)]
fn special_file_readable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o444 != 0
}

#[cfg(not(unix))]
const fn special_file_readable(_metadata: &Metadata) -> bool {
    false
}
