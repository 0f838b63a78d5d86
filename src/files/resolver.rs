//! Path resolution module
//!
//! Turns a logical request path plus its translated filesystem path into a
//! serving decision: a file, a directory listing, a trailing-slash
//! redirect, or an error outcome.

use super::entry::FileSystemEntry;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// Index pages, in the order they are tried
pub const DEFAULT_INDEX_PAGES: [&str; 4] = ["index.html", "index.htm", "default.htm", "default.html"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Serve this file (also used for a located index page)
    ServeFile(FileSystemEntry),
    /// Render a listing of this directory
    ServeDirectory(PathBuf),
    /// Directory requested without a trailing slash
    RedirectWithSlash { location: String },
    NotFound,
    Forbidden,
}

/// Normalize a logical request path and reject parent traversal
///
/// Paths of up to two characters are passed through untouched. Longer ones
/// have `\` turned into `/` and are rejected when they contain `/../` or end
/// with `/..`.
pub fn normalize_request_path(path: &str) -> Option<String> {
    if path.chars().count() <= 2 {
        return Some(path.to_string());
    }

    let path = path.replace('\\', "/");
    if path.contains("/../") || path.ends_with("/..") {
        return None;
    }
    Some(path)
}

/// Convert a translated path to the platform separator and drop one trailing separator
fn translate(translated_path: &str) -> String {
    let mut filename = translated_path.replace('/', MAIN_SEPARATOR_STR);
    if filename.ends_with(MAIN_SEPARATOR) {
        filename.pop();
    }
    filename
}

/// Resolve a request
///
/// # Arguments
/// * `request_path` - Logical path as seen by the client
/// * `translated_path` - Filesystem path the host mapped it to
pub async fn resolve(request_path: &str, translated_path: &str) -> Resolution {
    let Some(request_path) = normalize_request_path(request_path) else {
        return Resolution::Forbidden;
    };

    let filename = translate(translated_path);
    let file = Path::new(&filename);
    if file.components().any(|c| c == Component::ParentDir) {
        return Resolution::Forbidden;
    }

    match FileSystemEntry::probe(file).await {
        Some(entry) if !entry.is_directory => Resolution::ServeFile(entry),
        Some(entry) => {
            if request_path.ends_with('/') {
                serve_index_or_listing(&entry.path).await
            } else {
                Resolution::RedirectWithSlash {
                    location: format!("{request_path}/"),
                }
            }
        }
        None => fallback_to_parent_index(&filename).await,
    }
}

/// Handle a missing path that names one of the index pages
///
/// The parent directory is searched for an index page and otherwise listed,
/// without first confirming that the parent exists. A missing parent ends up
/// as an unreadable listing.
async fn fallback_to_parent_index(filename: &str) -> Resolution {
    let names_index_page = DEFAULT_INDEX_PAGES
        .iter()
        .any(|page| filename.ends_with(&format!("{MAIN_SEPARATOR}{page}")));
    if !names_index_page {
        return Resolution::NotFound;
    }

    match Path::new(filename).parent() {
        Some(parent) => serve_index_or_listing(parent).await,
        None => Resolution::NotFound,
    }
}

async fn serve_index_or_listing(dir: &Path) -> Resolution {
    match find_index_file(dir).await {
        Some(index) => Resolution::ServeFile(index),
        None => Resolution::ServeDirectory(dir.to_path_buf()),
    }
}

/// First existing, readable index page in `dir`
pub async fn find_index_file(dir: &Path) -> Option<FileSystemEntry> {
    for page in DEFAULT_INDEX_PAGES {
        if let Some(entry) = FileSystemEntry::probe(&dir.join(page)).await {
            if entry.is_regular_file && entry.readable {
                return Some(entry);
            }
        }
    }
    None
}
