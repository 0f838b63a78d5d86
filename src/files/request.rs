//! Request abstraction
//!
//! The narrow view of a request the file server needs. Any host can
//! implement [`ServeRequest`]; [`RequestContext`] is the owned version used
//! by the bundled hyper host and by tests.

use hyper::header::{HeaderMap, HeaderName};
use hyper::{Method, Request};
use std::path::Path;

pub trait ServeRequest {
    fn method(&self) -> &Method;
    /// Logical request path, before translation
    fn path(&self) -> Option<&str>;
    /// Filesystem path the host translated the request to
    fn translated_path(&self) -> Option<&str>;
    /// Header value by case-insensitive name
    fn header(&self, name: &str) -> Option<&str>;
}

/// Immutable request snapshot
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: Option<String>,
    pub translated_path: Option<String>,
    pub headers: HeaderMap,
}

impl RequestContext {
    pub fn new(method: Method, path: &str, translated_path: impl AsRef<Path>) -> Self {
        Self {
            method,
            path: Some(path.to_string()),
            translated_path: Some(translated_path.as_ref().to_string_lossy().into_owned()),
            headers: HeaderMap::new(),
        }
    }

    /// Snapshot a hyper request, translating its path against `root`
    pub fn from_request<B>(req: &Request<B>, root: &Path) -> Self {
        let path = req.uri().path();
        Self {
            method: req.method().clone(),
            path: Some(path.to_string()),
            translated_path: Some(translate_path(root, path)),
            headers: req.headers().clone(),
        }
    }

    /// Add a header, ignoring values that are not valid header text
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }
}

impl ServeRequest for RequestContext {
    fn method(&self) -> &Method {
        &self.method
    }

    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn translated_path(&self) -> Option<&str> {
        self.translated_path.as_deref()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Join a logical path onto the document root, keeping a trailing slash
pub fn translate_path(root: &Path, path: &str) -> String {
    let mut translated = root
        .join(path.trim_start_matches('/'))
        .to_string_lossy()
        .into_owned();
    if path.ends_with('/') && !translated.ends_with('/') {
        translated.push('/');
    }
    translated
}
