use bytes::Bytes;
use futures_core::Stream;
use std::{
    io,
    pin::Pin,
    task::{Context, Poll},
};

use super::Source;

/// Adapter that consumes any [`Stream`] of byte chunks as a [`Source`].
#[derive(Debug)]
pub struct StreamSource<S> {
    stream: S,
}

impl<S> StreamSource<S>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
{
    /// Wrap a [`Stream`].
    pub fn new(stream: S) -> StreamSource<S> {
        Self { stream }
    }

    /// Consume self into the inner stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S> Source for StreamSource<S>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
{
    fn poll_data(&mut self, cx: &mut Context) -> Poll<Option<io::Result<Bytes>>> {
        Pin::new(&mut self.stream).poll_next(cx)
    }
}
