//! Response sinks.
//!
//! A sink is the destination of a finalized response: it carries mutable
//! status code, status message and header fields, and accepts the body bytes
//! streamed into it.
use bytes::Bytes;
use std::{
    io,
    task::{Context, Poll},
};

mod h1;

#[cfg(test)]
mod test;

pub use h1::H1Sink;

/// Destination of a finalized response.
pub trait ResponseSink {
    /// Set the response status code.
    fn set_status(&mut self, status: u16);

    /// Set the response status message.
    fn set_reason(&mut self, reason: &str);

    /// Set a header field, replacing any previous value for the name.
    fn set_header(&mut self, name: &str, value: &str);

    /// Remove a header field.
    fn remove_header(&mut self, name: &str);

    /// Write body data.
    ///
    /// Data is consumed from `data` as it is accepted, ready once the whole
    /// chunk has been taken.
    fn poll_write(&mut self, data: &mut Bytes, cx: &mut Context) -> Poll<io::Result<()>>;

    /// Flush pending data through to the underlying io.
    fn poll_flush(&mut self, cx: &mut Context) -> Poll<io::Result<()>>;

    /// Shut the sink down, flushing pending data first.
    fn poll_shutdown(&mut self, cx: &mut Context) -> Poll<io::Result<()>>;
}
