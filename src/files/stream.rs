//! Content streaming module
//!
//! Copies a file into the response sink, through a [`ThrottledWriter`] when
//! the logical request path matches a throttle rule. Each transfer paces
//! itself independently; simultaneous transfers under one rule are not
//! aggregated.

use crate::error::ServeError;
use crate::throttle::{ThrottleRegistry, ThrottledWriter};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Stream `source` into `destination`, returning the number of bytes copied
///
/// The source is closed when the copy ends either way and the destination
/// is shut down afterwards. A write failure (typically a vanished client)
/// ends the copy at once and is returned as [`ServeError::TransferFailure`].
pub async fn stream<W>(
    source: &Path,
    destination: W,
    throttles: &ThrottleRegistry,
    request_path: &str,
) -> Result<u64, ServeError>
where
    W: AsyncWrite + Unpin,
{
    let file = File::open(source).await?;

    match throttles.lookup(request_path) {
        Some(rule) => {
            let throttled = ThrottledWriter::new(destination, rule.max_bytes_per_sec);
            copy_and_close(file, throttled).await
        }
        None => copy_and_close(file, destination).await,
    }
}

async fn copy_and_close<R, W>(mut source: R, mut destination: W) -> Result<u64, ServeError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let copied = tokio::io::copy(&mut source, &mut destination).await;
    drop(source);

    let copied = match copied {
        Ok(n) => n,
        Err(e) => {
            // best effort; the copy error is the one worth reporting
            let _ = destination.shutdown().await;
            return Err(e.into());
        }
    };

    destination.shutdown().await?;
    Ok(copied)
}
