// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded stderr tail capture.
//!
//! Every step keeps the last `max` bytes of stderr in memory, decoded
//! with a configurable encoding, so a failed step's diagnostic message
//! can be surfaced without buffering unbounded output.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::io::AsyncWrite;

/// Default cap, in bytes, on the retained stderr tail.
pub const DEFAULT_MAX: usize = 1024;

#[derive(Debug)]
struct Inner {
    buf: Vec<u8>,
    max: usize,
    encoding: &'static encoding_rs::Encoding,
}

impl Inner {
    fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
        if self.buf.len() > self.max {
            let excess = self.buf.len() - self.max;
            self.buf.drain(..excess);
        }
    }

    fn tail(&self) -> String {
        let (text, _, _) = self.encoding.decode(&self.buf);
        text.into_owned()
    }
}

/// Handle to read back the captured tail. Cheap to clone; all clones
/// and the writing [`TailWriter`] share the same buffer.
#[derive(Debug, Clone)]
pub struct TailHandle(Arc<Mutex<Inner>>);

impl TailHandle {
    /// Decode the retained bytes with the configured encoding.
    pub fn tail(&self) -> String {
        self.0.lock().tail()
    }
}

/// Wraps an [`AsyncWrite`] sink, mirroring every successful write into
/// a bounded ring buffer readable via a [`TailHandle`].
pub struct TailWriter<W> {
    inner: W,
    shared: Arc<Mutex<Inner>>,
}

impl<W> TailWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_capacity(inner, DEFAULT_MAX, encoding_rs::UTF_8)
    }

    pub fn with_capacity(inner: W, max: usize, encoding: &'static encoding_rs::Encoding) -> Self {
        Self {
            inner,
            shared: Arc::new(Mutex::new(Inner {
                buf: Vec::new(),
                max,
                encoding,
            })),
        }
    }

    pub fn handle(&self) -> TailHandle {
        TailHandle(Arc::clone(&self.shared))
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for TailWriter<W> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_write(cx, buf) {
            Poll::Ready(Ok(n)) => {
                this.shared.lock().push(&buf[..n]);
                Poll::Ready(Ok(n))
            }
            other => other,
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
