//! AMF0 encoder

use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use bytestring::ByteString;

use crate::{Amf0Error, Amf0Limits, Amf0Marker, Amf0Number, Amf0Value, Amf3Bridge, OpaqueAmf3};

/// AMF0 encoder.
///
/// Encodes [`Amf0Value`]s into a writer.
///
/// Every composite value that is written inline is recorded in the reference table. A composite that is
/// structurally equal to a finished one already recorded is written as a reference record to the lowest
/// matching index instead of being repeated. The table lives as long as the encoder.
///
/// [`Amf0Value::Reference`] is written as a reference record to the enclosing composite it counts up to,
/// under the index that composite got from this encoder.
#[derive(Debug)]
pub struct Amf0Encoder<'a, W, B: Amf3Bridge = OpaqueAmf3> {
    writer: W,
    bridge: B,
    limits: Amf0Limits,
    objects: Vec<Option<&'a Amf0Value<B::Value>>>,
    /// Table indices of the composites being encoded, innermost last.
    ancestors: Vec<usize>,
    depth: usize,
}

impl<W> Amf0Encoder<'_, W, OpaqueAmf3> {
    /// Create a new encoder with the default [`OpaqueAmf3`] bridge.
    pub fn new(writer: W) -> Self {
        Self::with_bridge(writer, OpaqueAmf3)
    }
}

impl<'a, W, B> Amf0Encoder<'a, W, B>
where
    B: Amf3Bridge,
{
    /// Create a new encoder that hands AVM+ values to the given bridge.
    pub fn with_bridge(writer: W, bridge: B) -> Self {
        Self {
            writer,
            bridge,
            limits: Amf0Limits::default(),
            objects: Vec::new(),
            ancestors: Vec::new(),
            depth: 0,
        }
    }

    /// Replace the limits of this encoder.
    pub fn with_limits(mut self, limits: Amf0Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Consume the encoder and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<'a, W, B> Amf0Encoder<'a, W, B>
where
    W: io::Write,
    B: Amf3Bridge,
    B::Value: PartialEq,
{
    /// Encode any [`Amf0Value`].
    pub fn encode_value(&mut self, value: &'a Amf0Value<B::Value>) -> Result<(), Amf0Error> {
        match value {
            Amf0Value::Number(number) => self.encode_number(*number),
            Amf0Value::Boolean(b) => self.encode_boolean(*b),
            Amf0Value::String(s) => self.encode_string(s),
            Amf0Value::Null => self.encode_null(),
            Amf0Value::Undefined => self.encode_undefined(),
            Amf0Value::Unsupported => self.encode_unsupported(),
            Amf0Value::Date { time, timezone } => self.encode_date(*time, *timezone),
            Amf0Value::XmlDocument(content) => self.encode_xml_document(content),
            Amf0Value::Reference(levels) => {
                let index = self
                    .ancestors
                    .len()
                    .checked_sub(*levels as usize + 1)
                    .map(|position| self.ancestors[position])
                    .ok_or(Amf0Error::DanglingReference(*levels))?;

                self.encode_reference(index.try_into()?)
            }
            Amf0Value::Object(members) => self.encode_composite(value, |this| {
                this.write_marker(Amf0Marker::Object)?;
                this.encode_members(members)
            }),
            Amf0Value::TypedObject { class_name, members } => self.encode_composite(value, |this| {
                this.write_marker(Amf0Marker::TypedObject)?;
                this.encode_name(class_name)?;
                this.encode_members(members)
            }),
            Amf0Value::EcmaArray(members) => self.encode_composite(value, |this| {
                this.write_marker(Amf0Marker::EcmaArray)?;
                this.writer.write_u32::<BigEndian>(members.len().try_into()?)?;
                this.encode_members(members)
            }),
            Amf0Value::StrictArray(elements) => self.encode_composite(value, |this| {
                this.write_marker(Amf0Marker::StrictArray)?;
                this.writer.write_u32::<BigEndian>(elements.len().try_into()?)?;

                for element in elements {
                    this.encode_value(element)?;
                }

                Ok(())
            }),
            Amf0Value::AvmPlus(inner) => {
                let bytes = self
                    .bridge
                    .encode_amf3(inner)
                    .map_err(|err| Amf0Error::Amf3(Box::new(err)))?;
                self.write_marker(Amf0Marker::AVMPlusObject)?;
                self.writer.write_all(&bytes)?;
                Ok(())
            }
        }
    }

    /// Encode an [`Amf0Number`] as a AMF0 number value.
    ///
    /// Non-finite numbers are written with their canonical bit pattern.
    pub fn encode_number(&mut self, value: Amf0Number) -> Result<(), Amf0Error> {
        self.write_marker(Amf0Marker::Number)?;
        self.writer.write_u64::<BigEndian>(value.to_bits())?;
        Ok(())
    }

    /// Encode a [`bool`] as a AMF0 boolean value.
    pub fn encode_boolean(&mut self, value: bool) -> Result<(), Amf0Error> {
        self.write_marker(Amf0Marker::Boolean)?;
        self.writer.write_u8(value as u8)?;
        Ok(())
    }

    /// Encode a byte string as a AMF0 string value.
    ///
    /// This function decides based on the length of the given string whether to use a normal string or a long string.
    pub fn encode_string(&mut self, value: &[u8]) -> Result<(), Amf0Error> {
        let len = value.len();

        if len <= (u16::MAX as usize) {
            // Normal string
            self.write_marker(Amf0Marker::String)?;
            self.writer.write_u16::<BigEndian>(len as u16)?;
        } else {
            // This try_into fails if the length is greater than u32::MAX
            let len: u32 = len.try_into()?;

            self.write_marker(Amf0Marker::LongString)?;
            self.writer.write_u32::<BigEndian>(len)?;
        }

        self.writer.write_all(value)?;
        Ok(())
    }

    /// Encode AMF0 Null value.
    pub fn encode_null(&mut self) -> Result<(), Amf0Error> {
        self.write_marker(Amf0Marker::Null)
    }

    /// Encode AMF0 Undefined value.
    pub fn encode_undefined(&mut self) -> Result<(), Amf0Error> {
        self.write_marker(Amf0Marker::Undefined)
    }

    /// Encode AMF0 Unsupported value.
    pub fn encode_unsupported(&mut self) -> Result<(), Amf0Error> {
        self.write_marker(Amf0Marker::Unsupported)
    }

    /// Encode a AMF0 date value.
    pub fn encode_date(&mut self, time: Amf0Number, timezone: i16) -> Result<(), Amf0Error> {
        self.write_marker(Amf0Marker::Date)?;
        self.writer.write_u64::<BigEndian>(time.to_bits())?;
        self.writer.write_i16::<BigEndian>(timezone)?;
        Ok(())
    }

    /// Encode a AMF0 xml document value.
    pub fn encode_xml_document(&mut self, content: &[u8]) -> Result<(), Amf0Error> {
        self.write_marker(Amf0Marker::XmlDocument)?;
        self.writer.write_u32::<BigEndian>(content.len().try_into()?)?;
        self.writer.write_all(content)?;
        Ok(())
    }

    fn encode_reference(&mut self, index: u16) -> Result<(), Amf0Error> {
        self.write_marker(Amf0Marker::Reference)?;
        self.writer.write_u16::<BigEndian>(index)?;
        Ok(())
    }

    fn find_reference(&self, value: &Amf0Value<B::Value>) -> Option<u16> {
        // Indices past u16::MAX cannot be written in a reference record.
        // Composites still being written are skipped, they enclose the value.
        self.objects
            .iter()
            .take(u16::MAX as usize + 1)
            .position(|seen| *seen == Some(value))
            .map(|index| index as u16)
    }

    fn encode_composite(
        &mut self,
        value: &'a Amf0Value<B::Value>,
        body: impl FnOnce(&mut Self) -> Result<(), Amf0Error>,
    ) -> Result<(), Amf0Error> {
        self.depth += 1;
        let result = self.limits.check_depth(self.depth).and_then(|()| {
            if let Some(index) = self.find_reference(value) {
                tracing::trace!(index, "amf0 back-reference");
                return self.encode_reference(index);
            }

            let index = self.objects.len();
            tracing::trace!(index, "registered amf0 composite");
            self.objects.push(None);
            self.ancestors.push(index);
            let result = body(self);
            self.ancestors.pop();
            self.objects[index] = Some(value);
            result
        });
        self.depth -= 1;
        result
    }

    fn encode_members(&mut self, members: &'a [(ByteString, Amf0Value<B::Value>)]) -> Result<(), Amf0Error> {
        for (name, value) in members {
            self.encode_name(name.as_bytes())?;
            self.encode_value(value)?;
        }

        self.writer.write_u24::<BigEndian>(Amf0Marker::ObjectEnd as u32)?;
        Ok(())
    }

    fn encode_name(&mut self, name: &[u8]) -> Result<(), Amf0Error> {
        self.writer.write_u16::<BigEndian>(name.len().try_into()?)?;
        self.writer.write_all(name)?;
        Ok(())
    }

    fn write_marker(&mut self, marker: Amf0Marker) -> Result<(), Amf0Error> {
        self.writer.write_u8(marker as u8)?;
        Ok(())
    }
}
