//! A pure-rust implementation of an AMF0 encoder and decoder.
//!
//! This crate decodes AMF0 data into an owned [`Amf0Value`] tree and encodes such a tree back into bytes.
//! Every value marker except the two reserved ones is supported, including references, dates, xml documents
//! and typed objects.
//!
//! # References
//!
//! Objects, typed objects, ECMA arrays and strict arrays share one reference table per
//! [`Amf0Decoder`] / [`Amf0Encoder`].
//! The decoder resolves references to copies of the referenced value, or to [`Amf0Value::Reference`] when
//! the referenced value encloses the reference (circular structures). [`Amf0Value::Reference`] counts the
//! enclosing composites between the reference and its target, so it stays valid when the encoder numbers
//! the table differently.
//! The encoder writes a reference whenever a composite value is equal to one it has already written.
//!
//! Copies made for references count towards [`Amf0Limits`], so a small input cannot expand into a huge
//! or arbitrarily deep tree.
//!
//! # Numbers
//!
//! Infinities and NaNs are represented symbolically by [`Amf0Number`] and always encoded with a canonical
//! bit pattern.
//!
//! # AVM+
//!
//! Values behind the AVM+ marker belong to AMF3, which this crate does not implement. They are handed to an
//! [`Amf3Bridge`], by default [`OpaqueAmf3`] which keeps the rest of the buffer as raw bytes.
//!
//! # Limitations
//!
//! - The reserved movieclip and recordset markers are rejected.
//!
//! # Examples
//!
//! ```rust
//! # fn test() -> Result<(), Box<dyn std::error::Error>> {
//! use amf0_codec::Amf0Value;
//!
//! let value = Amf0Value::object([("app", "live".into()), ("fpad", false.into())]);
//!
//! // Encode a value into bytes
//! let bytes = amf0_codec::encode(&value)?;
//!
//! // Decode it again, the second element holds the bytes that were not consumed
//! let (decoded, rest) = amf0_codec::decode(bytes)?;
//!
//! assert_eq!(decoded, value);
//! assert!(rest.is_empty());
//! # Ok(())
//! # }
//! # test().expect("test failed");
//! ```
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

use bytes::Bytes;

pub mod amf3;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod limits;
pub mod number;
pub mod value;

pub use amf3::{Amf3Bridge, OpaqueAmf3};
pub use decoder::Amf0Decoder;
pub use encoder::Amf0Encoder;
pub use error::{Amf0Error, Result};
pub use limits::Amf0Limits;
pub use number::Amf0Number;
pub use value::{Amf0Array, Amf0Object, Amf0Value};

/// AMF0 marker types.
///
/// Defined by:
/// - AMF 0 spec, 2.1.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, num_derive::FromPrimitive)]
#[repr(u8)]
pub enum Amf0Marker {
    /// number-marker
    Number = 0x00,
    /// boolean-marker
    Boolean = 0x01,
    /// string-marker
    String = 0x02,
    /// object-marker
    Object = 0x03,
    /// movieclip-marker
    ///
    /// reserved, not supported
    MovieClipMarker = 0x04,
    /// null-marker
    Null = 0x05,
    /// undefined-marker
    Undefined = 0x06,
    /// reference-marker
    Reference = 0x07,
    /// ecma-array-marker
    EcmaArray = 0x08,
    /// object-end-marker
    ObjectEnd = 0x09,
    /// strict-array-marker
    StrictArray = 0x0a,
    /// date-marker
    Date = 0x0b,
    /// long-string-marker
    LongString = 0x0c,
    /// unsupported-marker
    Unsupported = 0x0d,
    /// recordset-marker
    ///
    /// reserved, not supported
    Recordset = 0x0e,
    /// xml-document-marker
    XmlDocument = 0x0f,
    /// typed-object-marker
    TypedObject = 0x10,
    /// avmplus-object-marker
    ///
    /// AMF3 marker
    AVMPlusObject = 0x11,
}

/// Decode one value from the start of `buf`.
///
/// Returns the value and the bytes after it.
pub fn decode(buf: impl Into<Bytes>) -> Result<(Amf0Value, Bytes)> {
    decode_with(buf, OpaqueAmf3)
}

/// Decode one value from the start of `buf`, handing AVM+ values to `bridge`.
pub fn decode_with<B>(buf: impl Into<Bytes>, bridge: B) -> Result<(Amf0Value<B::Value>, Bytes)>
where
    B: Amf3Bridge,
    B::Value: Clone,
{
    let mut decoder = Amf0Decoder::with_bridge(buf, bridge);
    let value = decoder.decode_value()?;
    Ok((value, decoder.into_remaining()))
}

/// Decode values until `buf` is exhausted.
///
/// The values share one reference table.
pub fn decode_all(buf: impl Into<Bytes>) -> Result<Vec<Amf0Value>> {
    Amf0Decoder::new(buf).decode_all()
}

/// Encode one value into a new byte vector.
pub fn encode(value: &Amf0Value) -> Result<Vec<u8>> {
    encode_with(value, OpaqueAmf3)
}

/// Encode one value into a new byte vector, handing AVM+ values to `bridge`.
pub fn encode_with<B>(value: &Amf0Value<B::Value>, bridge: B) -> Result<Vec<u8>>
where
    B: Amf3Bridge,
    B::Value: PartialEq,
{
    let mut encoder = Amf0Encoder::with_bridge(Vec::new(), bridge);
    encoder.encode_value(value)?;
    Ok(encoder.into_inner())
}

/// Encode a series of values into a new byte vector.
///
/// The values share one reference table.
pub fn encode_all(values: &[Amf0Value]) -> Result<Vec<u8>> {
    let mut encoder = Amf0Encoder::new(Vec::new());

    for value in values {
        encoder.encode_value(value)?;
    }

    Ok(encoder.into_inner())
}
