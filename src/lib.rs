//! Deferred HTTP Response Emission
//!
//! Wrap a body byte source and hold it back from the response sink until the
//! status code and headers are finalized.
#![warn(missing_debug_implementations)]

mod log;
mod bytestr;

pub mod status;
pub mod headers;
pub mod source;
pub mod sink;
pub mod response;

pub use bytestr::ByteStr;
pub use headers::HeaderMap;
pub use response::{DeferredResponse, Options, Pipe, PipeOptions, SetOptions};
