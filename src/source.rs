//! Response body byte sources.
//!
//! ## Core
//!
//! - [`Source`] the trait that represents a sequential producer of body bytes
//!
//! ## Implementation
//!
//! - [`Full`] single chunk source
//! - [`Channel`] push style source fed from a [`SourceSender`]
//! - [`StreamSource`] adapter over any [`Stream`] of byte chunks
//!
//! [`Stream`]: futures_core::Stream
use bytes::Bytes;
use std::{
    io,
    task::{Context, Poll},
};

mod full;
mod channel;
mod stream;


pub use full::Full;
pub use channel::{Channel, SourceSender, channel};
pub use stream::StreamSource;

/// A sequential producer of response body bytes.
pub trait Source {
    /// Poll the next chunk of body data.
    ///
    /// [`None`] means the source is exhausted. At most one error is produced
    /// over the lifetime of a source.
    fn poll_data(&mut self, cx: &mut Context) -> Poll<Option<io::Result<Bytes>>>;

    /// Read the next chunk of body data.
    fn data(&mut self) -> impl Future<Output = Option<io::Result<Bytes>>>
    where
        Self: Sized,
    {
        std::future::poll_fn(|cx| self.poll_data(cx))
    }
}
