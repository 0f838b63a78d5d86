//! Hyper host adapter
//!
//! Bridges hyper requests to the [`FileServer`]: translates the request
//! path against the document root, turns the resulting descriptor into a
//! `hyper::Response`, and streams bodies through a [`PipeBody`] that owns
//! the task writing them.

mod body;

pub use body::PipeBody;

use crate::config::Config;
use crate::files::{FileServer, RequestContext};
use crate::http::{ResponseBody, ResponseDescriptor};
use crate::logger;
use crate::throttle::{ThrottleError, ThrottleRegistry};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

/// Pipe capacity between the streaming task and the connection
const PIPE_CAPACITY: usize = 64 * 1024;

/// State shared by every connection of the host
pub struct HostState {
    pub server: FileServer,
    pub root: PathBuf,
    pub access_log: bool,
}

impl HostState {
    pub const fn new(server: FileServer, root: PathBuf, access_log: bool) -> Self {
        Self {
            server,
            root,
            access_log,
        }
    }

    /// Build the file server and load every configured throttle file
    ///
    /// Files are merged in order, so later files override earlier ones for
    /// the same pattern.
    pub async fn from_config(config: &Config) -> Result<Self, ThrottleError> {
        let throttles = Arc::new(ThrottleRegistry::new());
        for path in &config.files.throttle_files {
            throttles.load_file(path).await?;
        }

        let server = FileServer::from_config(&config.files, &config.logging, throttles);
        Ok(Self::new(
            server,
            PathBuf::from(&config.files.root),
            config.logging.access_log,
        ))
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<HostState>,
) -> Result<Response<PipeBody>, Infallible> {
    if state.access_log {
        logger::log_request(req.method(), req.uri(), req.version());
    }

    let ctx = RequestContext::from_request(&req, &state.root);
    let descriptor = state.server.serve(&ctx).await;

    if state.access_log {
        logger::log_response(descriptor.status, descriptor.content_length);
    }

    Ok(into_response(descriptor, &state))
}

/// Convert a descriptor into a hyper response, spawning the body writer
fn into_response(descriptor: ResponseDescriptor, state: &Arc<HostState>) -> Response<PipeBody> {
    let mut builder = Response::builder().status(descriptor.status);

    if let Some(content_type) = &descriptor.content_type {
        builder = builder.header(CONTENT_TYPE, content_type.as_str());
    }
    if let Some(len) = descriptor.content_length {
        builder = builder.header(CONTENT_LENGTH, len);
    }
    for (name, value) in &descriptor.headers {
        builder = builder.header(name, value.as_str());
    }

    let body = spawn_body_writer(descriptor.body, state);
    builder.body(body).unwrap_or_else(|e| {
        logger::log_error(&format!(
            "Failed to build {} response: {e}",
            descriptor.status.as_u16()
        ));
        let mut fallback = Response::new(PipeBody::empty());
        *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

/// Start the body writer on a task owned by the returned body
///
/// Dropping the body aborts the writer; a failed transfer is logged here
/// and surfaces to hyper as the body's error frame.
fn spawn_body_writer(body: ResponseBody, state: &Arc<HostState>) -> PipeBody {
    if body == ResponseBody::Empty {
        return PipeBody::empty();
    }

    let (writer, reader) = tokio::io::duplex(PIPE_CAPACITY);
    let state = Arc::clone(state);
    let task = tokio::spawn(async move {
        let target = match &body {
            ResponseBody::File { path, .. } => path.clone(),
            _ => PathBuf::from("listing"),
        };
        let result = state.server.write_body(body, writer).await;
        if let Err(e) = &result {
            logger::log_transfer_failure(&target, e);
        }
        result
    });
    PipeBody::new(reader, task)
}
