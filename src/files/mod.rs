//! File serving module
//!
//! [`FileServer`] answers GET and HEAD requests for files, index pages and
//! generated directory listings. It produces a [`ResponseDescriptor`] and
//! later writes the body into whatever sink the host provides.

mod entry;
pub mod listing;
mod request;
pub mod resolver;
pub mod stream;

pub use entry::FileSystemEntry;
pub use listing::Identification;
pub use request::{translate_path, RequestContext, ServeRequest};
pub use resolver::{Resolution, DEFAULT_INDEX_PAGES};

use crate::config::{FilesConfig, LoggingConfig};
use crate::error::ServeError;
use crate::http::cache::{self, ConditionalMode, Freshness};
use crate::http::{ExtensionMimeResolver, MimeResolver, ResponseBody, ResponseDescriptor};
use crate::logger;
use crate::throttle::{ThrottleError, ThrottleRegistry};
use hyper::header::IF_MODIFIED_SINCE;
use hyper::{Method, StatusCode};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

pub struct FileServer {
    throttles: Arc<ThrottleRegistry>,
    mime: Arc<dyn MimeResolver>,
    identification: Identification,
    conditional: ConditionalMode,
    log_enabled: bool,
}

impl FileServer {
    /// Create a server sharing `throttles` with any other instance
    pub fn new(throttles: Arc<ThrottleRegistry>, mime: impl MimeResolver + 'static) -> Self {
        Self {
            throttles,
            mime: Arc::new(mime),
            identification: Identification::default(),
            conditional: ConditionalMode::default(),
            log_enabled: false,
        }
    }

    pub fn from_config(
        files: &FilesConfig,
        logging: &LoggingConfig,
        throttles: Arc<ThrottleRegistry>,
    ) -> Self {
        Self::new(throttles, ExtensionMimeResolver)
            .with_identification(Identification {
                name: files.server_name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                url: files.server_url.clone(),
            })
            .with_conditional_mode(files.conditional)
            .with_logging(logging.enabled)
    }

    /// Load a throttle file and merge it into the shared registry
    pub async fn with_throttle_file(self, path: impl AsRef<Path>) -> Result<Self, ThrottleError> {
        self.throttles.load_file(path).await?;
        Ok(self)
    }

    #[must_use]
    pub fn with_identification(mut self, identification: Identification) -> Self {
        self.identification = identification;
        self
    }

    #[must_use]
    pub const fn with_conditional_mode(mut self, mode: ConditionalMode) -> Self {
        self.conditional = mode;
        self
    }

    /// Toggle tracing of serving decisions
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.log_enabled = enabled;
        self
    }

    pub const fn throttles(&self) -> &Arc<ThrottleRegistry> {
        &self.throttles
    }

    /// Decide the response for a request
    ///
    /// Never fails: every error outcome becomes a status-only descriptor.
    pub async fn serve<R: ServeRequest + ?Sized>(&self, req: &R) -> ResponseDescriptor {
        match self.try_serve(req).await {
            Ok(descriptor) => descriptor,
            Err(err) => {
                if let ServeError::PathTraversalRejected(path) = &err {
                    logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
                } else {
                    logger::log_decision(self.log_enabled, &err.to_string());
                }
                ResponseDescriptor::from_error(&err)
            }
        }
    }

    async fn try_serve<R: ServeRequest + ?Sized>(
        &self,
        req: &R,
    ) -> Result<ResponseDescriptor, ServeError> {
        let head_only = match req.method() {
            &Method::GET => false,
            &Method::HEAD => true,
            other => return Err(ServeError::MethodNotSupported(other.to_string())),
        };

        let raw_path = req.path().unwrap_or_default();
        let path = resolver::normalize_request_path(raw_path)
            .ok_or_else(|| ServeError::PathTraversalRejected(raw_path.to_string()))?;
        let translated = req.translated_path().unwrap_or_default();
        logger::log_decision(
            self.log_enabled,
            &format!("showing {translated} for path {path}"),
        );

        match resolver::resolve(&path, translated).await {
            Resolution::ServeFile(entry) => self.serve_file(req, head_only, &path, entry),
            Resolution::ServeDirectory(dir) => self.serve_directory(head_only, &path, &dir).await,
            Resolution::RedirectWithSlash { location } => {
                logger::log_decision(self.log_enabled, &format!("redirecting {path}"));
                Ok(ResponseDescriptor::redirect(location))
            }
            Resolution::NotFound => Err(ServeError::NotFound(path)),
            Resolution::Forbidden => Err(ServeError::PathTraversalRejected(path)),
        }
    }

    fn serve_file<R: ServeRequest + ?Sized>(
        &self,
        req: &R,
        head_only: bool,
        path: &str,
        entry: FileSystemEntry,
    ) -> Result<ResponseDescriptor, ServeError> {
        logger::log_decision(self.log_enabled, &format!("getting {}", entry.path.display()));
        // Special files are refused: opening a FIFO would block the transfer
        if !entry.readable || !entry.is_regular_file {
            return Err(ServeError::Unreadable(entry.path));
        }

        let freshness = cache::evaluate(
            req.header(IF_MODIFIED_SINCE.as_str()),
            entry.modified_ms,
            self.conditional,
        );
        // 304 suppresses the body even for GET
        let (status, head_only) = match freshness {
            Freshness::NotModified => (StatusCode::NOT_MODIFIED, true),
            Freshness::Fresh => (StatusCode::OK, head_only),
        };

        let descriptor = ResponseDescriptor {
            status,
            content_type: self.mime.content_type(&entry.file_name()),
            content_length: Some(entry.len),
            headers: Vec::new(),
            body: if head_only {
                ResponseBody::Empty
            } else {
                ResponseBody::File {
                    path: entry.path,
                    request_path: path.to_string(),
                }
            },
        };
        Ok(descriptor.with_last_modified(cache::format_http_date(entry.modified_ms)))
    }

    async fn serve_directory(
        &self,
        head_only: bool,
        path: &str,
        dir: &Path,
    ) -> Result<ResponseDescriptor, ServeError> {
        logger::log_decision(self.log_enabled, &format!("indexing {}", dir.display()));

        if head_only {
            let readable = FileSystemEntry::probe(dir)
                .await
                .is_some_and(|entry| entry.is_directory && entry.readable);
            return if readable {
                Ok(ResponseDescriptor::listing(None))
            } else {
                Err(ServeError::Unreadable(dir.to_path_buf()))
            };
        }

        let page = listing::render(dir, path, &self.identification)
            .await
            .map_err(|_| ServeError::Unreadable(dir.to_path_buf()))?;
        Ok(ResponseDescriptor::listing(Some(page)))
    }

    /// Write a descriptor's body into `sink` and shut the sink down
    ///
    /// File bodies go through the throttle registry; errors here mean the
    /// headers are already out and the connection should be dropped.
    pub async fn write_body<W>(&self, body: ResponseBody, mut sink: W) -> Result<u64, ServeError>
    where
        W: AsyncWrite + Unpin,
    {
        match body {
            ResponseBody::Empty => {
                sink.shutdown().await?;
                Ok(0)
            }
            ResponseBody::Listing(page) => {
                sink.write_all(page.as_bytes()).await?;
                sink.shutdown().await?;
                Ok(page.len() as u64)
            }
            ResponseBody::File { path, request_path } => {
                stream::stream(&path, sink, &self.throttles, &request_path).await
            }
        }
    }
}
