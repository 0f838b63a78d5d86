//! Response descriptor module
//!
//! Transport-neutral description of a response. The file server decides
//! status, headers and what the body is; the host writes it to the wire.

use crate::error::ServeError;
use hyper::header::{HeaderName, LAST_MODIFIED, LOCATION};
use hyper::StatusCode;
use std::path::PathBuf;

/// What to send after the headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// No body (HEAD, 304, errors, redirects)
    Empty,
    /// Stream a file, throttled by the rule matching `request_path`
    File { path: PathBuf, request_path: String },
    /// Pre-rendered directory listing
    Listing(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub headers: Vec<(HeaderName, String)>,
    pub body: ResponseBody,
}

impl ResponseDescriptor {
    /// Status-only response
    pub const fn status_only(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            content_length: None,
            headers: Vec::new(),
            body: ResponseBody::Empty,
        }
    }

    /// Status-only response for a serving error
    pub const fn from_error(err: &ServeError) -> Self {
        Self::status_only(err.status())
    }

    /// 302 redirect to `location`
    pub fn redirect(location: String) -> Self {
        let mut descriptor = Self::status_only(StatusCode::FOUND);
        descriptor.headers.push((LOCATION, location));
        descriptor
    }

    /// 200 generated listing; `page` is `None` for HEAD
    pub fn listing(page: Option<String>) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: Some("text/html".to_string()),
            content_length: None,
            headers: Vec::new(),
            body: page.map_or(ResponseBody::Empty, ResponseBody::Listing),
        }
    }

    pub fn with_last_modified(mut self, http_date: String) -> Self {
        self.headers.push((LAST_MODIFIED, http_date));
        self
    }

    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub const fn has_body(&self) -> bool {
        !matches!(self.body, ResponseBody::Empty)
    }
}
