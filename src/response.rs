//! Deferred response emission.
use bytes::Bytes;
use std::{
    cell::{Cell, RefCell},
    io,
    task::{Context, Poll, Waker, ready},
};

use crate::{
    bytestr::ByteStr,
    headers::HeaderMap,
    log::{debug, error, trace},
    sink::ResponseSink,
    source::Source,
    status,
};


const UNKNOWN_REASON: &str = "unknown";

/// Wrap a body byte source and hold its data back from the response sink
/// until the status code and headers are finalized.
///
/// The response starts out not ready (unless constructed triggered). A
/// [`pipe`] started before that stays pending; [`trigger`], directly or via
/// the status and header setters, releases it. At that point the finalized
/// status, status message and headers are applied to the sink exactly once,
/// then the source bytes are streamed through.
///
/// All mutators take `&self`: state lives in [`Cell`]s, so a pending pipe
/// future and later setter calls coexist on one logical thread. The type is
/// intentionally not `Sync`.
///
/// [`pipe`]: DeferredResponse::pipe
/// [`trigger`]: DeferredResponse::trigger
pub struct DeferredResponse<S> {
    source: RefCell<Option<S>>,
    head: RefCell<Head>,
    ready: Cell<bool>,
    waiter: Cell<Option<Waker>>,
    on_error: RefCell<Option<ErrorHook>>,
}

type ErrorHook = Box<dyn FnOnce(&io::Error)>;

struct Head {
    status: u16,
    message: Option<ByteStr>,
    headers: HeaderMap,
}

/// Initial state for [`DeferredResponse::with_options`].
#[derive(Debug)]
pub struct Options {
    /// Response status code.
    pub status: u16,
    /// Explicit status message. When absent the standard reason phrase for
    /// the status is used, or `"unknown"` for unregistered codes.
    pub message: Option<ByteStr>,
    /// Initial response headers.
    pub headers: HeaderMap,
    /// Construct already triggered.
    pub trigger: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            status: 200,
            message: None,
            headers: HeaderMap::new(),
            trigger: false,
        }
    }
}

/// Trigger behavior of [`DeferredResponse::set_status`] and
/// [`DeferredResponse::set_headers`].
#[derive(Clone, Copy, Debug)]
pub struct SetOptions {
    /// Trigger readiness after the update. Defaults to `true`.
    pub trigger: bool,
}

impl Default for SetOptions {
    fn default() -> Self {
        Self { trigger: true }
    }
}

/// Options of [`DeferredResponse::pipe`].
#[derive(Clone, Copy, Debug)]
pub struct PipeOptions {
    /// Shut the sink down once the source is exhausted. Defaults to `true`.
    pub shutdown: bool,
}

impl Default for PipeOptions {
    fn default() -> Self {
        Self { shutdown: true }
    }
}

impl<S> DeferredResponse<S> {
    /// Create new `DeferredResponse` with default [`Options`].
    pub fn new(source: S) -> DeferredResponse<S> {
        Self::with_options(source, Options::default())
    }

    /// Create new `DeferredResponse` with initial state.
    pub fn with_options(source: S, opts: Options) -> DeferredResponse<S> {
        Self {
            source: RefCell::new(Some(source)),
            head: RefCell::new(Head {
                status: opts.status,
                message: opts.message,
                headers: opts.headers,
            }),
            ready: Cell::new(opts.trigger),
            waiter: Cell::new(None),
            on_error: RefCell::new(None),
        }
    }

    /// Returns whether the response is ready to be piped.
    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// Set the status code.
    ///
    /// When `reason` is given it becomes the status message, overriding any
    /// prior one. Otherwise, if no message is set yet, one is resolved from
    /// the status in effect before this call, falling back to `"unknown"`.
    ///
    /// Triggers readiness unless `opts.trigger` is `false`.
    pub fn set_status(&self, status: u16, reason: Option<&str>, opts: SetOptions) -> &Self {
        {
            let mut head = self.head.borrow_mut();
            match reason {
                Some(reason) => head.message = Some(ByteStr::copy_from(reason)),
                None => {
                    if head.message.is_none() {
                        let phrase = status::reason(head.status).unwrap_or(UNKNOWN_REASON);
                        head.message = Some(ByteStr::from_static(phrase));
                    }
                }
            }
            head.status = status;
        }
        if opts.trigger {
            self.trigger();
        }
        self
    }

    /// Replace the header mapping wholesale.
    ///
    /// Triggers readiness unless `opts.trigger` is `false`.
    pub fn set_headers(&self, headers: HeaderMap, opts: SetOptions) -> &Self {
        self.head.borrow_mut().headers = headers;
        if opts.trigger {
            self.trigger();
        }
        self
    }

    /// Mark the response ready and wake the pending pipe, if any.
    ///
    /// Readiness is monotonic. Calling again re-fires the wake and nothing
    /// else; a pipe started after the first call never misses it, the flag
    /// is checked before suspending.
    pub fn trigger(&self) {
        self.ready.set(true);
        if let Some(waiter) = self.waiter.take() {
            debug!("response triggered, waking pipe");
            waiter.wake();
        }
    }

    /// Install a listener for the source error.
    ///
    /// At most one error is relayed over the lifetime of the response; the
    /// listener observes it unaltered, before the pipe future resolves to
    /// that same error.
    pub fn on_error(&self, hook: impl FnOnce(&io::Error) + 'static) -> &Self {
        *self.on_error.borrow_mut() = Some(Box::new(hook));
        self
    }

    fn relay_error(&self, err: &io::Error) {
        error!("source error: {err}");
        let hook = self.on_error.borrow_mut().take();
        if let Some(hook) = hook {
            hook(err);
        }
    }

    /// Apply the finalized status, message and headers to the sink.
    fn prepare<W: ResponseSink>(&self, sink: &mut W) {
        let head = self.head.borrow();

        sink.set_status(head.status);
        match &head.message {
            Some(message) => sink.set_reason(message),
            None => sink.set_reason(status::reason(head.status).unwrap_or(UNKNOWN_REASON)),
        }

        // these statuses must not advertise a body
        if status::has_no_body(head.status) {
            sink.remove_header("Content-Type");
            sink.remove_header("Content-Length");
            sink.remove_header("Transfer-Encoding");
        }

        for (name, value) in head.headers.iter() {
            if name.is_empty() {
                continue;
            }
            sink.set_header(name, value);
        }
    }

    /// Pipe the body into `sink`, once ready.
    ///
    /// While the response is not ready the returned future stays pending and
    /// resumes when [`trigger`] runs. At that point the finalized head is
    /// applied to the sink exactly once, then the source is streamed into
    /// it, flushed, and, per [`PipeOptions`], shut down. Resolves to the
    /// sink for further use.
    ///
    /// A single pending pipe is supported; the source error, if any, is
    /// relayed through [`on_error`] and the future output.
    ///
    /// # Panics
    ///
    /// The response is consumed by the first pipe to begin streaming, piping
    /// again panics.
    ///
    /// [`trigger`]: DeferredResponse::trigger
    /// [`on_error`]: DeferredResponse::on_error
    pub fn pipe<W>(&self, sink: W, opts: PipeOptions) -> Pipe<'_, S, W>
    where
        S: Source,
        W: ResponseSink,
    {
        Pipe {
            res: self,
            sink: Some(sink),
            source: None,
            opts,
            phase: Phase::Waiting,
        }
    }
}

impl<S> std::fmt::Debug for DeferredResponse<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let head = self.head.borrow();
        f.debug_struct("DeferredResponse")
            .field("status", &head.status)
            .field("ready", &self.ready.get())
            .finish_non_exhaustive()
    }
}

pin_project_lite::pin_project! {
    /// Future returned by [`DeferredResponse::pipe`].
    #[must_use = "futures do nothing unless polled"]
    pub struct Pipe<'a, S, W> {
        res: &'a DeferredResponse<S>,
        sink: Option<W>,
        source: Option<S>,
        opts: PipeOptions,
        phase: Phase,
    }
}

enum Phase {
    Waiting,
    Read,
    Write { chunk: Bytes },
    Flush,
    Shutdown,
    Done,
}

impl<S, W> Future for Pipe<'_, S, W>
where
    S: Source,
    W: ResponseSink,
{
    type Output = io::Result<W>;

    fn poll(self: std::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let me = self.project();
        loop {
            match &mut *me.phase {
                Phase::Waiting => {
                    if !me.res.ready.get() {
                        me.res.waiter.set(Some(cx.waker().clone()));
                        trace!("response not ready, pipe deferred");
                        return Poll::Pending;
                    }
                    let source = me.res.source.borrow_mut().take().expect("response already piped");
                    me.res.prepare(me.sink.as_mut().expect("poll after complete"));
                    *me.source = Some(source);
                    *me.phase = Phase::Read;
                }
                Phase::Read => {
                    let source = me.source.as_mut().expect("poll after complete");
                    match ready!(source.poll_data(cx)) {
                        Some(Ok(chunk)) => *me.phase = Phase::Write { chunk },
                        Some(Err(err)) => {
                            *me.phase = Phase::Done;
                            me.res.relay_error(&err);
                            return Poll::Ready(Err(err));
                        }
                        None => *me.phase = Phase::Flush,
                    }
                }
                Phase::Write { chunk } => {
                    let sink = me.sink.as_mut().expect("poll after complete");
                    ready!(sink.poll_write(chunk, cx))?;
                    *me.phase = Phase::Read;
                }
                Phase::Flush => {
                    let sink = me.sink.as_mut().expect("poll after complete");
                    ready!(sink.poll_flush(cx))?;
                    if me.opts.shutdown {
                        *me.phase = Phase::Shutdown;
                    } else {
                        *me.phase = Phase::Done;
                        return Poll::Ready(Ok(me.sink.take().expect("poll after complete")));
                    }
                }
                Phase::Shutdown => {
                    let sink = me.sink.as_mut().expect("poll after complete");
                    ready!(sink.poll_shutdown(cx))?;
                    *me.phase = Phase::Done;
                    return Poll::Ready(Ok(me.sink.take().expect("poll after complete")));
                }
                Phase::Done => panic!("poll after complete"),
            }
        }
    }
}

impl<S, W> std::fmt::Debug for Pipe<'_, S, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipe").finish_non_exhaustive()
    }
}
