use bytes::{Buf, Bytes, BytesMut};
use std::{
    io,
    pin::Pin,
    task::{Context, Poll, ready},
};
use tokio::io::AsyncWrite;

use super::ResponseSink;
use crate::{bytestr::ByteStr, headers::HeaderMap};

/// [`ResponseSink`] that writes an HTTP/1.1 head followed by the raw body.
///
/// The head is assembled lazily and written at most once: before the first
/// body byte, or at flush/shutdown when there is no body at all. Head
/// mutations after that point are ignored.
pub struct H1Sink<W> {
    io: W,
    status: u16,
    reason: ByteStr,
    headers: HeaderMap,
    head: HeadState,
}

enum HeadState {
    Pending,
    Writing(BytesMut),
    Written,
}

impl<W> H1Sink<W> {
    /// Create new `H1Sink` writing to `io`.
    pub fn new(io: W) -> H1Sink<W> {
        Self {
            io,
            status: 200,
            reason: ByteStr::from_static("OK"),
            headers: HeaderMap::new(),
            head: HeadState::Pending,
        }
    }

    /// Returns a reference to the underlying io.
    pub fn get_ref(&self) -> &W {
        &self.io
    }

    /// Consume self into the underlying io.
    pub fn into_inner(self) -> W {
        self.io
    }

    fn encode_head(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(256);
        buf.extend_from_slice(b"HTTP/1.1 ");
        buf.extend_from_slice(itoa::Buffer::new().format(self.status).as_bytes());
        buf.extend_from_slice(b" ");
        buf.extend_from_slice(self.reason.as_bytes());
        buf.extend_from_slice(b"\r\n");

        for (name, value) in self.headers.iter() {
            buf.extend_from_slice(name.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(value.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }
}

impl<W> H1Sink<W>
where
    W: AsyncWrite + Unpin,
{
    fn poll_write_head(&mut self, cx: &mut Context) -> Poll<io::Result<()>> {
        loop {
            match &mut self.head {
                HeadState::Written => return Poll::Ready(Ok(())),
                HeadState::Pending => {
                    let buf = self.encode_head();
                    self.head = HeadState::Writing(buf);
                }
                HeadState::Writing(buf) => {
                    while buf.has_remaining() {
                        let n = ready!(Pin::new(&mut self.io).poll_write(cx, buf.chunk()))?;
                        if n == 0 {
                            return Poll::Ready(Err(io::ErrorKind::WriteZero.into()));
                        }
                        buf.advance(n);
                    }
                    self.head = HeadState::Written;
                }
            }
        }
    }
}

impl<W> ResponseSink for H1Sink<W>
where
    W: AsyncWrite + Unpin,
{
    fn set_status(&mut self, status: u16) {
        if matches!(self.head, HeadState::Pending) {
            self.status = status;
        }
    }

    fn set_reason(&mut self, reason: &str) {
        if matches!(self.head, HeadState::Pending) {
            self.reason = ByteStr::copy_from(reason);
        }
    }

    fn set_header(&mut self, name: &str, value: &str) {
        if matches!(self.head, HeadState::Pending) {
            self.headers.insert(name, value);
        }
    }

    fn remove_header(&mut self, name: &str) {
        if matches!(self.head, HeadState::Pending) {
            self.headers.remove(name);
        }
    }

    fn poll_write(&mut self, data: &mut Bytes, cx: &mut Context) -> Poll<io::Result<()>> {
        ready!(self.poll_write_head(cx))?;
        while data.has_remaining() {
            let n = ready!(Pin::new(&mut self.io).poll_write(cx, data.chunk()))?;
            if n == 0 {
                return Poll::Ready(Err(io::ErrorKind::WriteZero.into()));
            }
            data.advance(n);
        }
        Poll::Ready(Ok(()))
    }

    fn poll_flush(&mut self, cx: &mut Context) -> Poll<io::Result<()>> {
        ready!(self.poll_write_head(cx))?;
        Pin::new(&mut self.io).poll_flush(cx)
    }

    fn poll_shutdown(&mut self, cx: &mut Context) -> Poll<io::Result<()>> {
        ready!(self.poll_flush(cx))?;
        Pin::new(&mut self.io).poll_shutdown(cx)
    }
}

impl<W> std::fmt::Debug for H1Sink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("H1Sink")
            .field("status", &self.status)
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}
