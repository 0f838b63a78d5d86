//! HTTP protocol layer module
//!
//! Conditional request evaluation, MIME lookup and the transport-neutral
//! response descriptor produced by the file server.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::{ConditionalMode, Freshness};
pub use mime::{ExtensionMimeResolver, MimeResolver};
pub use response::{ResponseBody, ResponseDescriptor};
