//! Bandwidth throttling module
//!
//! Maps wildcard request-path patterns to a maximum transfer rate and
//! paces response bodies that match one of them.
//!
//! Throttle files are line oriented:
//!
//! ```text
//! # pattern        bytes/second
//! /img/*           20000
//! *.mp4|*.webm     100000
//! ```

mod parse;
pub mod pattern;
mod registry;
mod writer;

pub use parse::parse_throttles;
pub use registry::{ThrottleRegistry, ThrottleRule};
pub use writer::ThrottledWriter;

use std::io;
use thiserror::Error;

/// Failure loading a throttle source
#[derive(Debug, Error)]
pub enum ThrottleError {
    #[error("failed to read throttle file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed throttle line {line}: '{text}'")]
    Malformed { line: usize, text: String },

    #[error("invalid rate in throttle line {line}: '{text}'")]
    InvalidRate { line: usize, text: String },
}
