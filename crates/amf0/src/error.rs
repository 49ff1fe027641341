//! AMF0 error type.

use std::io;
use std::num::TryFromIntError;
use std::str::Utf8Error;

use crate::Amf0Marker;

/// Result type.
pub type Result<T> = std::result::Result<T, Amf0Error>;

/// AMF0 error.
///
/// Every variant is fatal for the call that produced it, no partial value is returned.
#[derive(thiserror::Error, Debug)]
pub enum Amf0Error {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Unknown marker.
    #[error("unknown marker: {0:#04x}")]
    UnknownMarker(u8),
    /// This marker cannot be decoded at a value position.
    #[error("this marker cannot be decoded: {0:?}")]
    UnsupportedMarker(Amf0Marker),
    /// The buffer ended before a field or a length-prefixed payload was complete.
    #[error("truncated buffer: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// The number of bytes the field requires.
        needed: usize,
        /// The number of bytes left in the buffer.
        remaining: usize,
    },
    /// A reference that does not resolve: the index is not in the decoder's table, or an encoded
    /// [`Amf0Value::Reference`](crate::Amf0Value::Reference) points past the outermost enclosing composite.
    #[error("dangling reference: {0}")]
    DanglingReference(u16),
    /// A member name that is not valid UTF-8.
    #[error("invalid member name: {0}")]
    InvalidName(#[from] Utf8Error),
    /// Element (name, string or sequence) is too long for its length field.
    #[error("element is too long: {0}")]
    TooLong(#[from] TryFromIntError),
    /// Composite values are nested deeper than the configured limit.
    #[error("nesting too deep: limit is {limit}")]
    NestingTooDeep {
        /// The configured depth limit.
        limit: usize,
    },
    /// The decoded values, reference copies included, exceed the configured node budget.
    #[error("too many nodes: limit is {limit}")]
    TooManyNodes {
        /// The configured node budget.
        limit: usize,
    },
    /// A long string or xml document declares a length above the configured ceiling.
    #[error("string too long: {length} bytes, limit is {limit}")]
    StringTooLong {
        /// The declared length.
        length: u32,
        /// The configured ceiling.
        limit: u32,
    },
    /// The AMF3 bridge failed.
    #[error(transparent)]
    Amf3(Box<dyn std::error::Error + Send + Sync>),
}
