//! MIME type detection module
//!
//! The file server only asks its host for a content type string per file
//! name; [`ExtensionMimeResolver`] is the table used by the bundled host.

use std::path::Path;

/// Host-supplied content type lookup
pub trait MimeResolver: Send + Sync {
    /// Content type for a file name, `None` when unknown
    fn content_type(&self, file_name: &str) -> Option<String>;
}

impl<F> MimeResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn content_type(&self, file_name: &str) -> Option<String> {
        self(file_name)
    }
}

/// Extension based resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionMimeResolver;

impl MimeResolver for ExtensionMimeResolver {
    fn content_type(&self, file_name: &str) -> Option<String> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        get_content_type(extension.as_deref()).map(ToString::to_string)
    }
}

/// Get MIME Content-Type based on file extension
///
/// # Examples
/// ```
/// use static_serve::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), Some("text/html"));
/// assert_eq!(get_content_type(Some("mp4")), Some("video/mp4"));
/// assert_eq!(get_content_type(None), None);
/// ```
pub fn get_content_type(extension: Option<&str>) -> Option<&'static str> {
    let content_type = match extension? {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "txt" | "md" => "text/plain",
        "xml" => "application/xml",

        // JavaScript/WASM
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "mov" => "video/quicktime",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",

        // Archives and documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => return None,
    };
    Some(content_type)
}
