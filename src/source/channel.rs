use bytes::Bytes;
use std::{
    io,
    task::{Context, Poll},
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use super::Source;

/// Create a push style [`Source`] fed from a [`SourceSender`].
pub fn channel() -> (SourceSender, Channel) {
    let (tx, rx) = unbounded_channel();
    (SourceSender { tx }, Channel { rx })
}

/// Receiver half of [`channel`], consumed as body data.
#[derive(Debug)]
pub struct Channel {
    rx: UnboundedReceiver<io::Result<Bytes>>,
}

/// Producer half of [`channel`].
///
/// Dropping every sender ends the stream.
#[derive(Clone, Debug)]
pub struct SourceSender {
    tx: UnboundedSender<io::Result<Bytes>>,
}

impl SourceSender {
    /// Send a chunk of body data.
    ///
    /// Data sent after the receiving [`Channel`] is dropped is discarded.
    pub fn send(&self, data: impl Into<Bytes>) {
        let _ = self.tx.send(Ok(data.into()));
    }

    /// Terminate the stream with an error.
    ///
    /// A source delivers at most one error, so this consumes the sender.
    pub fn error(self, err: io::Error) {
        let _ = self.tx.send(Err(err));
    }
}

impl Source for Channel {
    fn poll_data(&mut self, cx: &mut Context) -> Poll<Option<io::Result<Bytes>>> {
        self.rx.poll_recv(cx)
    }
}
