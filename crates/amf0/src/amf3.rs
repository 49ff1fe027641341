//! Bridge to the AMF3 format behind the AVM+ marker.
//!
//! AMF0 hands everything after an [`AVMPlusObject`](crate::Amf0Marker::AVMPlusObject) marker to AMF3.
//! This crate does not implement AMF3 itself, the codec is injected through [`Amf3Bridge`].

use bytes::Bytes;

/// An AMF3 codec used for values behind the AVM+ marker.
pub trait Amf3Bridge {
    /// The value produced by the bridge.
    type Value;
    /// The error produced by the bridge.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decode one AMF3 value from the start of `buf`.
    ///
    /// Returns the value and the bytes that were not consumed.
    fn decode_amf3(&self, buf: Bytes) -> Result<(Self::Value, Bytes), Self::Error>;

    /// Encode one AMF3 value.
    fn encode_amf3(&self, value: &Self::Value) -> Result<Bytes, Self::Error>;
}

impl<T: Amf3Bridge + ?Sized> Amf3Bridge for &T {
    type Error = T::Error;
    type Value = T::Value;

    fn decode_amf3(&self, buf: Bytes) -> Result<(Self::Value, Bytes), Self::Error> {
        (**self).decode_amf3(buf)
    }

    fn encode_amf3(&self, value: &Self::Value) -> Result<Bytes, Self::Error> {
        (**self).encode_amf3(value)
    }
}

/// The default bridge.
///
/// Keeps the AMF3 payload as raw bytes. Since AMF3 is not parsed, the payload extends to the end of the buffer,
/// so an AVM+ value is only usable as the last value of a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpaqueAmf3;

impl Amf3Bridge for OpaqueAmf3 {
    type Error = std::convert::Infallible;
    type Value = Bytes;

    fn decode_amf3(&self, buf: Bytes) -> Result<(Self::Value, Bytes), Self::Error> {
        Ok((buf, Bytes::new()))
    }

    fn encode_amf3(&self, value: &Self::Value) -> Result<Bytes, Self::Error> {
        Ok(value.clone())
    }
}
