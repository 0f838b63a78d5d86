//! Rate-limited writer
//!
//! Wraps an [`AsyncWrite`] sink and paces it to an average ceiling: after
//! each write the time the cumulative byte count should have taken is
//! computed, and the next write (or shutdown) waits until then. A burst is
//! therefore bounded by the size of a single write.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::time::{sleep_until, Instant, Sleep};

pub struct ThrottledWriter<W> {
    inner: W,
    max_bytes_per_sec: u64,
    started: Instant,
    written: u64,
    delay: Option<Pin<Box<Sleep>>>,
}

impl<W> ThrottledWriter<W> {
    /// `max_bytes_per_sec` of zero is treated as one byte per second
    pub fn new(inner: W, max_bytes_per_sec: u64) -> Self {
        Self {
            inner,
            max_bytes_per_sec: max_bytes_per_sec.max(1),
            started: Instant::now(),
            written: 0,
            delay: None,
        }
    }

    pub const fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Wait out any pending pacing delay
    fn poll_delay(&mut self, cx: &mut Context<'_>) -> Poll<()> {
        if let Some(delay) = self.delay.as_mut() {
            ready!(delay.as_mut().poll(cx));
            self.delay = None;
        }
        Poll::Ready(())
    }

    /// Schedule a delay if the transfer is ahead of the allowed rate
    #[allow(clippy::cast_precision_loss)]
    fn schedule_delay(&mut self) {
        let due = self.started
            + Duration::from_secs_f64(self.written as f64 / self.max_bytes_per_sec as f64);
        if due > Instant::now() {
            self.delay = Some(Box::pin(sleep_until(due)));
        }
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for ThrottledWriter<W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        ready!(this.poll_delay(cx));

        let n = ready!(Pin::new(&mut this.inner).poll_write(cx, buf))?;
        this.written += n as u64;
        this.schedule_delay();
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        // The last chunk is not complete until its time slot has passed
        ready!(this.poll_delay(cx));
        Pin::new(&mut this.inner).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_paces_to_rate() {
        let mut sink = Vec::new();
        let started = std::time::Instant::now();
        {
            let mut writer = ThrottledWriter::new(&mut sink, 8192);
            for _ in 0..4 {
                writer.write_all(&[7u8; 1024]).await.unwrap();
            }
            writer.shutdown().await.unwrap();
            assert_eq!(writer.bytes_written(), 4096);
        }
        // 4096 bytes at 8192 B/s
        assert!(started.elapsed() >= Duration::from_millis(450));
        assert_eq!(sink.len(), 4096);
    }

    #[tokio::test]
    async fn test_fast_rate_is_not_delayed() {
        let mut writer = ThrottledWriter::new(Vec::new(), 1 << 30);
        let started = std::time::Instant::now();
        writer.write_all(&[1u8; 4096]).await.unwrap();
        writer.shutdown().await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(200));
        assert_eq!(writer.into_inner().len(), 4096);
    }

    #[tokio::test]
    async fn test_write_error_passes_through() {
        let (client, server) = tokio::io::duplex(64);
        drop(server);
        let mut writer = ThrottledWriter::new(client, 1024);
        assert!(writer.write_all(b"payload").await.is_err());
    }
}
