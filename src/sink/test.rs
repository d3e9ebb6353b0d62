use bytes::Bytes;
use std::{
    io,
    pin::Pin,
    task::{Context, Poll, Waker},
};
use tokio::io::AsyncWrite;

use super::{H1Sink, ResponseSink};

#[derive(Debug, Default)]
struct Buffer {
    data: Vec<u8>,
    shutdown: bool,
}

impl AsyncWrite for Buffer {
    fn poll_write(mut self: Pin<&mut Self>, _: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.shutdown = true;
        Poll::Ready(Ok(()))
    }
}

#[test]
fn head_written_before_body() {
    let mut sink = H1Sink::new(Buffer::default());
    sink.set_status(404);
    sink.set_reason("Not Found");
    sink.set_header("content-type", "text/plain");

    let mut cx = Context::from_waker(Waker::noop());
    let mut chunk = Bytes::from_static(b"nope");
    assert!(sink.poll_write(&mut chunk, &mut cx).is_ready());
    assert!(chunk.is_empty());
    assert!(sink.poll_shutdown(&mut cx).is_ready());

    let buffer = sink.into_inner();
    assert_eq!(
        buffer.data,
        b"HTTP/1.1 404 Not Found\r\ncontent-type: text/plain\r\n\r\nnope"
    );
    assert!(buffer.shutdown);
}

#[test]
fn empty_body_emits_head_on_flush() {
    let mut sink = H1Sink::new(Buffer::default());
    sink.set_status(304);
    sink.set_reason("Not Modified");

    let mut cx = Context::from_waker(Waker::noop());
    assert!(sink.poll_flush(&mut cx).is_ready());

    assert_eq!(sink.into_inner().data, b"HTTP/1.1 304 Not Modified\r\n\r\n");
}

#[test]
fn head_mutation_after_write_is_ignored() {
    let mut sink = H1Sink::new(Buffer::default());

    let mut cx = Context::from_waker(Waker::noop());
    let mut chunk = Bytes::from_static(b"body");
    assert!(sink.poll_write(&mut chunk, &mut cx).is_ready());

    sink.set_status(500);
    sink.set_reason("Broken");
    sink.set_header("x", "y");
    assert!(sink.poll_flush(&mut cx).is_ready());

    assert_eq!(sink.into_inner().data, b"HTTP/1.1 200 OK\r\n\r\nbody");
}
