//! AMF0 decoder

use bytes::{Buf, Bytes};
use bytestring::ByteString;
use num_traits::FromPrimitive;

use crate::{Amf0Array, Amf0Error, Amf0Limits, Amf0Marker, Amf0Number, Amf0Object, Amf0Value, Amf3Bridge, OpaqueAmf3};

/// AMF0 decoder.
///
/// Decodes AMF0 values from a [`Bytes`] buffer. Strings and other payloads are zero-copy slices of that buffer.
///
/// The decoder owns the reference table. Every composite value (object, typed object, ECMA array, strict array)
/// is registered under the next index before its members are decoded, so a reference to an enclosing
/// value is resolvable while it is still being built. Such a reference decodes to [`Amf0Value::Reference`]
/// counting the enclosing composites between it and its target, every other reference decodes to a copy
/// of the finished value.
///
/// A copy counts towards [`Amf0Limits::max_depth`] at the depth it is placed, and towards
/// [`Amf0Limits::max_nodes`] with every value it holds.
///
/// The table lives as long as the decoder, values decoded one after another with the same decoder can
/// reference each other.
#[derive(Debug)]
pub struct Amf0Decoder<B: Amf3Bridge = OpaqueAmf3> {
    buf: Bytes,
    bridge: B,
    limits: Amf0Limits,
    objects: Vec<Option<Entry<B::Value>>>,
    /// Table indices of the composites being decoded, innermost last.
    ancestors: Vec<usize>,
    depth: usize,
    /// Deepest level reached inside the composite being decoded.
    peak: usize,
    /// Values materialized in decoded trees.
    nodes: usize,
    /// Values held by the reference table.
    retained: usize,
}

/// A finished composite in the reference table.
#[derive(Debug)]
struct Entry<A> {
    value: Amf0Value<A>,
    /// Nesting levels, 1 for a composite without composite members.
    height: usize,
    /// Number of values in the tree, the composite included.
    nodes: usize,
}

impl Amf0Decoder<OpaqueAmf3> {
    /// Create a new decoder with the default [`OpaqueAmf3`] bridge.
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self::with_bridge(buf, OpaqueAmf3)
    }
}

impl<B> Amf0Decoder<B>
where
    B: Amf3Bridge,
    B::Value: Clone,
{
    /// Create a new decoder that hands AVM+ values to the given bridge.
    pub fn with_bridge(buf: impl Into<Bytes>, bridge: B) -> Self {
        Self {
            buf: buf.into(),
            bridge,
            limits: Amf0Limits::default(),
            objects: Vec::new(),
            ancestors: Vec::new(),
            depth: 0,
            peak: 0,
            nodes: 0,
            retained: 0,
        }
    }

    /// Replace the limits of this decoder.
    pub fn with_limits(mut self, limits: Amf0Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Check if there are remaining bytes to read.
    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.buf.has_remaining()
    }

    /// The bytes that have not been decoded yet.
    pub fn remaining(&self) -> &Bytes {
        &self.buf
    }

    /// Consume the decoder and return the bytes that have not been decoded yet.
    pub fn into_remaining(self) -> Bytes {
        self.buf
    }

    /// Decode a [`Amf0Value`] from the buffer.
    pub fn decode_value(&mut self) -> Result<Amf0Value<B::Value>, Amf0Error> {
        let marker = self.read_marker()?;
        self.charge(1)?;

        match marker {
            Amf0Marker::Number => self.read_number().map(Amf0Value::Number),
            Amf0Marker::Boolean => Ok(Amf0Value::Boolean(self.read_u8()? != 0)),
            Amf0Marker::String => {
                let len = self.read_u16()? as usize;
                self.read_bytes(len).map(Amf0Value::String)
            }
            Amf0Marker::LongString => self.read_long_payload().map(Amf0Value::String),
            Amf0Marker::XmlDocument => self.read_long_payload().map(Amf0Value::XmlDocument),
            Amf0Marker::Null => Ok(Amf0Value::Null),
            Amf0Marker::Undefined => Ok(Amf0Value::Undefined),
            Amf0Marker::Unsupported => Ok(Amf0Value::Unsupported),
            Amf0Marker::Reference => self.decode_reference(),
            Amf0Marker::Date => {
                let time = self.read_number()?;
                let timezone = self.read_i16()?;
                Ok(Amf0Value::Date { time, timezone })
            }
            Amf0Marker::Object | Amf0Marker::TypedObject | Amf0Marker::EcmaArray | Amf0Marker::StrictArray => {
                self.decode_composite(marker)
            }
            Amf0Marker::AVMPlusObject => {
                let buf = std::mem::take(&mut self.buf);
                let (value, rest) = self
                    .bridge
                    .decode_amf3(buf)
                    .map_err(|err| Amf0Error::Amf3(Box::new(err)))?;
                self.buf = rest;
                Ok(Amf0Value::AvmPlus(value))
            }
            Amf0Marker::MovieClipMarker | Amf0Marker::Recordset | Amf0Marker::ObjectEnd => {
                Err(Amf0Error::UnsupportedMarker(marker))
            }
        }
    }

    /// Decode all values from the buffer until the end.
    pub fn decode_all(&mut self) -> Result<Vec<Amf0Value<B::Value>>, Amf0Error> {
        let mut values = Vec::new();

        while self.buf.has_remaining() {
            let value = self.decode_value()?;
            values.push(value);
        }

        Ok(values)
    }

    fn decode_reference(&mut self) -> Result<Amf0Value<B::Value>, Amf0Error> {
        let index = self.read_u16()?;

        let (height, nodes) = match self.objects.get(index as usize) {
            Some(Some(entry)) => (entry.height, entry.nodes),
            Some(None) => return self.decode_circular_reference(index),
            None => return Err(Amf0Error::DanglingReference(index)),
        };

        // The copy takes the place of the reference, which is already charged
        self.charge(nodes - 1)?;
        let depth = self.depth + height;
        self.limits.check_depth(depth)?;
        self.peak = self.peak.max(depth);

        self.objects
            .get(index as usize)
            .and_then(Option::as_ref)
            .map(|entry| entry.value.clone())
            .ok_or(Amf0Error::DanglingReference(index))
    }

    fn decode_circular_reference(&self, index: u16) -> Result<Amf0Value<B::Value>, Amf0Error> {
        let position = self
            .ancestors
            .iter()
            .rposition(|ancestor| *ancestor == index as usize)
            .ok_or(Amf0Error::DanglingReference(index))?;
        let levels = u16::try_from(self.ancestors.len() - 1 - position)?;

        tracing::trace!(index, levels, "circular amf0 reference");
        Ok(Amf0Value::Reference(levels))
    }

    // --- Objects and arrays ---

    fn decode_composite(&mut self, marker: Amf0Marker) -> Result<Amf0Value<B::Value>, Amf0Error> {
        self.depth += 1;
        let result = self
            .limits
            .check_depth(self.depth)
            .and_then(|()| self.decode_composite_body(marker));
        self.depth -= 1;
        result
    }

    fn decode_composite_body(&mut self, marker: Amf0Marker) -> Result<Amf0Value<B::Value>, Amf0Error> {
        // Placeholder until the members are decoded
        let index = self.objects.len();
        self.objects.push(None);
        self.ancestors.push(index);
        tracing::trace!(index, ?marker, "registered amf0 composite");

        let outer_peak = std::mem::replace(&mut self.peak, self.depth);
        let nodes_before = self.nodes;

        let value = self.decode_composite_value(marker);
        self.ancestors.pop();
        let value = value?;

        let height = self.peak - self.depth + 1;
        self.peak = self.peak.max(outer_peak);

        // The composite itself was charged before its members
        let nodes = self.nodes - nodes_before + 1;
        self.retain(nodes)?;

        self.objects[index] = Some(Entry {
            value: value.clone(),
            height,
            nodes,
        });
        Ok(value)
    }

    fn decode_composite_value(&mut self, marker: Amf0Marker) -> Result<Amf0Value<B::Value>, Amf0Error> {
        Ok(match marker {
            Amf0Marker::TypedObject => {
                let len = self.read_u16()? as usize;
                let class_name = self.read_bytes(len)?;
                let members = self.decode_members()?;
                Amf0Value::TypedObject { class_name, members }
            }
            Amf0Marker::EcmaArray => {
                // The count is only a hint, the object end marker terminates the array
                let _count = self.read_u32()?;
                Amf0Value::EcmaArray(self.decode_members()?)
            }
            Amf0Marker::StrictArray => Amf0Value::StrictArray(self.decode_elements()?),
            _ => Amf0Value::Object(self.decode_members()?),
        })
    }

    fn decode_members(&mut self) -> Result<Amf0Object<B::Value>, Amf0Error> {
        let mut members = Vec::new();

        // Names are not preceded with a marker and are always normal strings
        while let Some(name) = self.decode_member_name()? {
            let value = self.decode_value()?;
            members.push((name, value));
        }

        Ok(members)
    }

    fn decode_member_name(&mut self) -> Result<Option<ByteString>, Amf0Error> {
        let len = self.read_u16()? as usize;

        // The object end marker is preceded by an empty name
        if len == 0 && self.buf.first() == Some(&(Amf0Marker::ObjectEnd as u8)) {
            self.buf.advance(1);
            return Ok(None);
        }

        let name = ByteString::try_from(self.read_bytes(len)?)?;
        Ok(Some(name))
    }

    fn decode_elements(&mut self) -> Result<Amf0Array<B::Value>, Amf0Error> {
        let count = self.read_u32()? as usize;

        // Every element takes at least one byte, do not trust the count beyond that
        let mut elements = Vec::with_capacity(count.min(self.buf.remaining()));

        for _ in 0..count {
            elements.push(self.decode_value()?);
        }

        Ok(elements)
    }

    // --- Budget ---

    fn charge(&mut self, nodes: usize) -> Result<(), Amf0Error> {
        self.nodes = self.nodes.saturating_add(nodes);
        self.limits.check_nodes(self.nodes.saturating_add(self.retained))
    }

    fn retain(&mut self, nodes: usize) -> Result<(), Amf0Error> {
        self.retained = self.retained.saturating_add(nodes);
        self.limits.check_nodes(self.nodes.saturating_add(self.retained))
    }

    // --- Primitives ---

    fn ensure(&self, needed: usize) -> Result<(), Amf0Error> {
        let remaining = self.buf.remaining();

        if remaining < needed {
            Err(Amf0Error::Truncated { needed, remaining })
        } else {
            Ok(())
        }
    }

    fn read_marker(&mut self) -> Result<Amf0Marker, Amf0Error> {
        let marker = self.read_u8()?;
        Amf0Marker::from_u8(marker).ok_or(Amf0Error::UnknownMarker(marker))
    }

    fn read_u8(&mut self) -> Result<u8, Amf0Error> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    fn read_u16(&mut self) -> Result<u16, Amf0Error> {
        self.ensure(2)?;
        Ok(self.buf.get_u16())
    }

    fn read_i16(&mut self) -> Result<i16, Amf0Error> {
        self.ensure(2)?;
        Ok(self.buf.get_i16())
    }

    fn read_u32(&mut self) -> Result<u32, Amf0Error> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    fn read_number(&mut self) -> Result<Amf0Number, Amf0Error> {
        self.ensure(8)?;
        Ok(Amf0Number::from_bits(self.buf.get_u64()))
    }

    fn read_bytes(&mut self, len: usize) -> Result<Bytes, Amf0Error> {
        self.ensure(len)?;
        Ok(self.buf.split_to(len))
    }

    fn read_long_payload(&mut self) -> Result<Bytes, Amf0Error> {
        let len = self.read_u32()?;
        self.limits.check_string_length(len)?;
        self.read_bytes(len as usize)
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use bytes::Bytes;

    use super::Amf0Decoder;
    use crate::{Amf0Error, Amf0Limits, Amf0Marker, Amf0Number, Amf0Value};

    fn decode(bytes: &[u8]) -> Result<Amf0Value, Amf0Error> {
        Amf0Decoder::new(Bytes::copy_from_slice(bytes)).decode_value()
    }

    #[test]
    fn string() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::String as u8,
            0, 3, // length
            b'a', b'b', b'c',
            0xff, // trailing byte
        ];

        let mut decoder = Amf0Decoder::new(Bytes::copy_from_slice(&bytes));
        assert_eq!(decoder.decode_value().unwrap(), Amf0Value::from("abc"));
        assert_eq!(decoder.remaining().as_ref(), &[0xff]);
    }

    #[test]
    fn long_string_and_xml() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::LongString as u8,
            0, 0, 0, 2, // length
            b'h', b'i',
            Amf0Marker::XmlDocument as u8,
            0, 0, 0, 4, // length
            b'<', b'a', b'/', b'>',
        ];

        let values = Amf0Decoder::new(Bytes::copy_from_slice(&bytes)).decode_all().unwrap();
        assert_eq!(
            values,
            vec![
                Amf0Value::from("hi"),
                Amf0Value::XmlDocument(Bytes::from_static(b"<a/>")),
            ]
        );
    }

    #[test]
    fn string_bytes_are_not_validated() {
        let value = decode(&[Amf0Marker::String as u8, 0, 2, 0xc3, 0x28]).unwrap();
        assert_eq!(value, Amf0Value::String(Bytes::from_static(&[0xc3, 0x28])));
    }

    #[test]
    fn boolean() {
        assert_eq!(decode(&[Amf0Marker::Boolean as u8, 0]).unwrap(), Amf0Value::Boolean(false));
        assert_eq!(decode(&[Amf0Marker::Boolean as u8, 0x7f]).unwrap(), Amf0Value::Boolean(true));
    }

    #[test]
    fn markers_without_payload() {
        assert_eq!(decode(&[Amf0Marker::Null as u8]).unwrap(), Amf0Value::Null);
        assert_eq!(decode(&[Amf0Marker::Undefined as u8]).unwrap(), Amf0Value::Undefined);
        assert_eq!(decode(&[Amf0Marker::Unsupported as u8]).unwrap(), Amf0Value::Unsupported);
    }

    #[test]
    fn date() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::Date as u8,
            0x42, 0x78, 0x56, 0xaa, 0x0c, 0x80, 0x00, 0x00, // 2023-01-01T00:00:00Z
            0xff, 0xc4, // -60
        ];

        assert_eq!(
            decode(&bytes).unwrap(),
            Amf0Value::Date {
                time: Amf0Number::Finite(1_672_531_200_000.0),
                timezone: -60,
            }
        );
    }

    #[test]
    fn special_numbers() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::Number as u8, 0xff, 0xf0, 0, 0, 0, 0, 0, 0,
            Amf0Marker::Number as u8, 0x7f, 0xf4, 0, 0, 0, 0, 0, 0,
            Amf0Marker::Number as u8, 0xff, 0xf8, 0, 0, 0, 0, 0, 0,
        ];

        let values = Amf0Decoder::new(Bytes::copy_from_slice(&bytes)).decode_all().unwrap();
        assert_eq!(
            values,
            vec![
                Amf0Value::Number(Amf0Number::NegativeInfinity),
                Amf0Value::Number(Amf0Number::SignalingNaN),
                Amf0Value::Number(Amf0Number::QuietNaN),
            ]
        );
    }

    #[test]
    fn member_order_and_duplicates() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::Object as u8,
            0, 1, b'b',
            Amf0Marker::Boolean as u8, 1,
            0, 1, b'a',
            Amf0Marker::Null as u8,
            0, 1, b'b',
            Amf0Marker::Boolean as u8, 0,
            0, 0, Amf0Marker::ObjectEnd as u8,
        ];

        let value = decode(&bytes).unwrap();
        assert_eq!(
            value,
            Amf0Value::object([("b", true.into()), ("a", Amf0Value::Null), ("b", false.into())])
        );
    }

    #[test]
    fn empty_name_without_terminator_is_a_member() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::Object as u8,
            0, 0, // empty name
            Amf0Marker::Null as u8,
            0, 0, Amf0Marker::ObjectEnd as u8,
        ];

        assert_eq!(decode(&bytes).unwrap(), Amf0Value::object([("", Amf0Value::Null)]));
    }

    #[test]
    fn ecma_array_count_is_ignored() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::EcmaArray as u8,
            0, 0, 0, 5, // declared count
            0, 1, b'x',
            Amf0Marker::Boolean as u8, 1,
            0, 0, Amf0Marker::ObjectEnd as u8,
        ];

        assert_eq!(
            decode(&bytes).unwrap(),
            Amf0Value::EcmaArray(vec![("x".into(), Amf0Value::Boolean(true))])
        );
    }

    #[test]
    fn typed_object() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::TypedObject as u8,
            0, 3, b'F', b'o', b'o',
            0, 1, b'n',
            Amf0Marker::Null as u8,
            0, 0, Amf0Marker::ObjectEnd as u8,
        ];

        assert_eq!(
            decode(&bytes).unwrap(),
            Amf0Value::TypedObject {
                class_name: Bytes::from_static(b"Foo"),
                members: vec![("n".into(), Amf0Value::Null)],
            }
        );
    }

    #[test]
    fn shared_reference() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::StrictArray as u8,
            0, 0, 0, 2,
            Amf0Marker::Object as u8,
            0, 1, b'a',
            Amf0Marker::Boolean as u8, 1,
            0, 0, Amf0Marker::ObjectEnd as u8,
            Amf0Marker::Reference as u8, 0, 1,
        ];

        let object = Amf0Value::object([("a", true.into())]);
        assert_eq!(decode(&bytes).unwrap(), Amf0Value::StrictArray(vec![object.clone(), object]));
    }

    #[test]
    fn keys_are_shared_between_kinds() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::EcmaArray as u8,
            0, 0, 0, 3,
            0, 1, b'a',
            Amf0Marker::StrictArray as u8, 0, 0, 0, 0,
            0, 1, b'b',
            Amf0Marker::Object as u8, 0, 0, Amf0Marker::ObjectEnd as u8,
            0, 1, b'c',
            Amf0Marker::Reference as u8, 0, 2,
            0, 0, Amf0Marker::ObjectEnd as u8,
        ];

        let value = decode(&bytes).unwrap();
        assert_eq!(value.get("c"), Some(&Amf0Value::Object(vec![])));
    }

    #[test]
    fn circular_reference() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::Object as u8,
            0, 4, b's', b'e', b'l', b'f',
            Amf0Marker::Reference as u8, 0, 0,
            0, 0, Amf0Marker::ObjectEnd as u8,
        ];

        let value = decode(&bytes).unwrap();
        assert_eq!(value, Amf0Value::object([("self", Amf0Value::Reference(0))]));
    }

    #[test]
    fn circular_reference_counts_levels() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::StrictArray as u8,
            0, 0, 0, 1,
            Amf0Marker::Object as u8,
            0, 5, b'i', b'n', b'n', b'e', b'r',
            Amf0Marker::Object as u8,
            0, 2, b'u', b'p',
            Amf0Marker::Reference as u8, 0, 1, // the object holding `inner`
            0, 0, Amf0Marker::ObjectEnd as u8,
            0, 0, Amf0Marker::ObjectEnd as u8,
        ];

        let Amf0Value::StrictArray(elements) = decode(&bytes).unwrap() else {
            panic!("expected a strict array");
        };
        let up = elements[0].get("inner").and_then(|inner| inner.get("up"));
        assert_eq!(up, Some(&Amf0Value::Reference(1)));
    }

    #[test]
    fn dangling_reference() {
        let err = decode(&[Amf0Marker::Reference as u8, 0, 3]).unwrap_err();
        assert!(matches!(err, Amf0Error::DanglingReference(3)));
    }

    #[test]
    fn reserved_markers() {
        for marker in [Amf0Marker::MovieClipMarker, Amf0Marker::Recordset, Amf0Marker::ObjectEnd] {
            let err = Amf0Decoder::new(Bytes::copy_from_slice(&[marker as u8])).decode_value().unwrap_err();
            assert!(matches!(err, Amf0Error::UnsupportedMarker(m) if m == marker));
        }

        let err = decode(&[0x12]).unwrap_err();
        assert!(matches!(err, Amf0Error::UnknownMarker(0x12)));
    }

    #[test]
    fn truncated() {
        let err = decode(&[Amf0Marker::String as u8, 0, 5, b'a', b'b']).unwrap_err();
        assert!(matches!(err, Amf0Error::Truncated { needed: 5, remaining: 2 }));

        let err = decode(&[Amf0Marker::Number as u8, 0, 0]).unwrap_err();
        assert!(matches!(err, Amf0Error::Truncated { needed: 8, remaining: 2 }));

        let err = decode(&[]).unwrap_err();
        assert!(matches!(err, Amf0Error::Truncated { needed: 1, remaining: 0 }));

        // missing object end
        let err = decode(&[Amf0Marker::Object as u8, 0, 1, b'a', Amf0Marker::Null as u8]).unwrap_err();
        assert!(matches!(err, Amf0Error::Truncated { needed: 2, remaining: 0 }));
    }

    #[test]
    fn strict_array_count_is_not_trusted() {
        let err = decode(&[Amf0Marker::StrictArray as u8, 0xff, 0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, Amf0Error::Truncated { needed: 1, remaining: 0 }));
    }

    #[test]
    fn invalid_member_name() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::Object as u8,
            0, 1, 0xff,
            Amf0Marker::Null as u8,
            0, 0, Amf0Marker::ObjectEnd as u8,
        ];

        assert!(matches!(decode(&bytes).unwrap_err(), Amf0Error::InvalidName(_)));
    }

    #[test]
    fn nesting_limit() {
        let mut bytes = vec![Amf0Marker::StrictArray as u8, 0, 0, 0, 1].repeat(4);
        bytes.push(Amf0Marker::Null as u8);

        let limits = Amf0Limits::default().with_max_depth(3);
        let err = Amf0Decoder::new(bytes.clone()).with_limits(limits).decode_value().unwrap_err();
        assert!(matches!(err, Amf0Error::NestingTooDeep { limit: 3 }));

        let limits = Amf0Limits::default().with_max_depth(4);
        assert!(Amf0Decoder::new(bytes).with_limits(limits).decode_value().is_ok());
    }

    /// A strict array of `levels + 1` arrays. The first is empty, every other one holds `refs` references
    /// to the array before it.
    fn reference_chain(levels: u16, refs: u32) -> Vec<u8> {
        let mut bytes = vec![Amf0Marker::StrictArray as u8];
        bytes.extend((u32::from(levels) + 1).to_be_bytes());
        bytes.extend([Amf0Marker::StrictArray as u8, 0, 0, 0, 0]);

        for index in 1..=levels {
            bytes.push(Amf0Marker::StrictArray as u8);
            bytes.extend(refs.to_be_bytes());

            for _ in 0..refs {
                bytes.push(Amf0Marker::Reference as u8);
                bytes.extend(index.to_be_bytes());
            }
        }

        bytes
    }

    #[test]
    fn reference_copies_count_towards_nodes() {
        // Every level doubles the size of the decoded tree
        let limits = Amf0Limits::default().with_max_nodes(1000);
        let err = Amf0Decoder::new(reference_chain(40, 2))
            .with_limits(limits)
            .decode_value()
            .unwrap_err();
        assert!(matches!(err, Amf0Error::TooManyNodes { limit: 1000 }));

        let value = Amf0Decoder::new(reference_chain(5, 2))
            .with_limits(limits)
            .decode_value()
            .unwrap();
        let Amf0Value::StrictArray(elements) = value else {
            panic!("expected a strict array");
        };
        assert_eq!(elements.len(), 6);
        assert_eq!(elements[1], Amf0Value::StrictArray(vec![Amf0Value::StrictArray(vec![]); 2]));
    }

    #[test]
    fn reference_copies_count_towards_depth() {
        // Element k is nested k + 1 levels deep on top of the two levels of the wire
        let limits = Amf0Limits::default().with_max_depth(8);
        let err = Amf0Decoder::new(reference_chain(20, 1))
            .with_limits(limits)
            .decode_value()
            .unwrap_err();
        assert!(matches!(err, Amf0Error::NestingTooDeep { limit: 8 }));

        assert!(Amf0Decoder::new(reference_chain(6, 1)).with_limits(limits).decode_value().is_ok());

        let limits = Amf0Limits::default().with_max_depth(7);
        let err = Amf0Decoder::new(reference_chain(6, 1))
            .with_limits(limits)
            .decode_value()
            .unwrap_err();
        assert!(matches!(err, Amf0Error::NestingTooDeep { limit: 7 }));
    }

    #[test]
    fn string_length_limit() {
        let limits = Amf0Limits::default().with_max_string_length(1);
        let err = Amf0Decoder::new(Bytes::from_static(&[Amf0Marker::LongString as u8, 0, 0, 0, 2, b'h', b'i']))
            .with_limits(limits)
            .decode_value()
            .unwrap_err();
        assert!(matches!(err, Amf0Error::StringTooLong { length: 2, limit: 1 }));
    }

    #[test]
    fn avmplus_opaque() {
        let value = decode(&[Amf0Marker::AVMPlusObject as u8, 0x06, 0x03, b'a']).unwrap();
        assert_eq!(value, Amf0Value::AvmPlus(Bytes::from_static(&[0x06, 0x03, b'a'])));
    }

    #[test]
    fn snapshot() {
        #[rustfmt::skip]
        let bytes = [
            Amf0Marker::Object as u8,
            0, 3, b'a', b'p', b'p',
            Amf0Marker::String as u8, 0, 4, b'l', b'i', b'v', b'e',
            0, 4, b'f', b'p', b'a', b'd',
            Amf0Marker::Boolean as u8, 0,
            0, 0, Amf0Marker::ObjectEnd as u8,
        ];

        insta::assert_debug_snapshot!(decode(&bytes).unwrap(), @r#"
        Object(
            [
                (
                    "app",
                    String(
                        b"live",
                    ),
                ),
                (
                    "fpad",
                    Boolean(
                        false,
                    ),
                ),
            ],
        )
        "#);
    }
}
