//! Streaming response body
//!
//! A hyper [`Body`] fed from the read half of an in-process pipe. The
//! file server writes into the other half from a task owned by the body:
//! dropping the body (client gone) aborts that task at once, even while it
//! waits out a throttle delay. Once the pipe drains, the task's result
//! decides whether the body ends cleanly or with an error frame.

use crate::error::ServeError;
use hyper::body::{Body, Bytes, Frame};
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, DuplexStream, ReadBuf};
use tokio::task::JoinHandle;

/// Read buffer per polled frame
const FRAME_SIZE: usize = 16 * 1024;

/// Outcome of the task writing into the pipe
pub type WriterTask = JoinHandle<Result<u64, ServeError>>;

pub struct PipeBody {
    reader: Option<DuplexStream>,
    writer: Option<WriterTask>,
    buf: Box<[u8]>,
}

impl PipeBody {
    /// Body reading `reader` while `writer` fills the other end
    pub fn new(reader: DuplexStream, writer: WriterTask) -> Self {
        Self {
            reader: Some(reader),
            writer: Some(writer),
            buf: vec![0; FRAME_SIZE].into_boxed_slice(),
        }
    }

    pub fn empty() -> Self {
        Self {
            reader: None,
            writer: None,
            buf: Box::default(),
        }
    }

    /// Wait for the writer after the pipe hit EOF
    fn poll_writer(&mut self, cx: &mut Context<'_>) -> Poll<Option<io::Result<Frame<Bytes>>>> {
        let Some(writer) = self.writer.as_mut() else {
            return Poll::Ready(None);
        };
        let outcome = match Pin::new(writer).poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(outcome) => outcome,
        };
        self.writer = None;

        match outcome {
            Ok(Ok(_)) => Poll::Ready(None),
            Ok(Err(ServeError::TransferFailure(e))) => Poll::Ready(Some(Err(e))),
            Ok(Err(e)) => Poll::Ready(Some(Err(io::Error::other(e)))),
            Err(e) => Poll::Ready(Some(Err(io::Error::other(e)))),
        }
    }
}

impl Drop for PipeBody {
    fn drop(&mut self) {
        if let Some(writer) = &self.writer {
            writer.abort();
        }
    }
}

impl Body for PipeBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let Some(reader) = this.reader.as_mut() else {
            return this.poll_writer(cx);
        };

        let mut read_buf = ReadBuf::new(&mut this.buf);
        match Pin::new(reader).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => {
                this.reader = None;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(Ok(())) if read_buf.filled().is_empty() => {
                this.reader = None;
                this.poll_writer(cx)
            }
            Poll::Ready(Ok(())) => {
                let chunk = Bytes::copy_from_slice(read_buf.filled());
                Poll::Ready(Some(Ok(Frame::data(chunk))))
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.reader.is_none() && self.writer.is_none()
    }
}
