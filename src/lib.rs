//! Static resource serving core
//!
//! Resolves request paths to files, index pages or generated directory
//! listings, applies `If-Modified-Since` handling and streams file bodies
//! with optional per-path bandwidth throttling. The transport is supplied
//! by a host; the [`host`] module adapts the core to hyper.

pub mod config;
pub mod error;
pub mod files;
pub mod host;
pub mod http;
pub mod logger;
pub mod throttle;

pub use error::ServeError;
pub use files::{FileServer, RequestContext, ServeRequest};
pub use throttle::{ThrottleRegistry, ThrottleRule};
