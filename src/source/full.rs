use bytes::Bytes;
use std::{
    io,
    task::{Context, Poll},
};

use super::Source;

/// A [`Source`] that consists of a single chunk.
#[derive(Clone, Debug, Default)]
pub struct Full {
    data: Option<Bytes>,
}

impl Full {
    /// Creates a new [`Full`].
    ///
    /// An empty chunk yields an immediately exhausted source.
    #[inline]
    pub fn new(data: impl Into<Bytes>) -> Full {
        let data = data.into();
        Self { data: (!data.is_empty()).then_some(data) }
    }

    /// Creates an exhausted [`Full`].
    #[inline]
    pub const fn empty() -> Full {
        Self { data: None }
    }
}

impl Source for Full {
    fn poll_data(&mut self, _: &mut Context) -> Poll<Option<io::Result<Bytes>>> {
        Poll::Ready(self.data.take().map(Ok))
    }
}
