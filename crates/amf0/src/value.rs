//! AMF0 value types.

use bytes::Bytes;
use bytestring::ByteString;

use crate::{Amf0Marker, Amf0Number};

/// The members of an AMF0 object, typed object or ECMA array.
///
/// Members keep their wire order and duplicate names are not collapsed.
pub type Amf0Object<A = Bytes> = Vec<(ByteString, Amf0Value<A>)>;

/// The elements of an AMF0 strict array.
pub type Amf0Array<A = Bytes> = Vec<Amf0Value<A>>;

/// Represents any AMF0 value.
///
/// `A` is the value type of the [`Amf3Bridge`](crate::Amf3Bridge) used for [`Amf0Value::AvmPlus`],
/// raw bytes with the default [`OpaqueAmf3`](crate::OpaqueAmf3) bridge.
///
/// Equality is structural and order sensitive. The encoder relies on it to find values it has already written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amf0Value<A = Bytes> {
    /// AMF0 Number.
    Number(Amf0Number),
    /// AMF0 Boolean.
    Boolean(bool),
    /// AMF0 String or Long String, the wire form is chosen from the length.
    String(Bytes),
    /// AMF0 Object.
    Object(Amf0Object<A>),
    /// AMF0 Null.
    Null,
    /// AMF0 Undefined.
    Undefined,
    /// A reference to an enclosing composite value, which was still being decoded when the reference was read.
    ///
    /// The number counts enclosing composites, `0` is the innermost one holding the reference.
    /// Only circular structures decode to this, references to finished values are resolved to a copy.
    Reference(u16),
    /// AMF0 ECMA Array.
    EcmaArray(Amf0Object<A>),
    /// AMF0 Strict Array.
    StrictArray(Amf0Array<A>),
    /// AMF0 Date.
    Date {
        /// Milliseconds since the unix epoch.
        time: Amf0Number,
        /// Timezone offset in minutes.
        timezone: i16,
    },
    /// AMF0 Unsupported.
    Unsupported,
    /// AMF0 XML Document.
    XmlDocument(Bytes),
    /// AMF0 Typed Object.
    TypedObject {
        /// The class name.
        class_name: Bytes,
        /// The members.
        members: Amf0Object<A>,
    },
    /// A value behind the AVM+ marker, produced by the AMF3 bridge.
    AvmPlus(A),
}

impl<A> Amf0Value<A> {
    /// Build an [`Amf0Value::Object`] from name-value pairs.
    pub fn object<K>(members: impl IntoIterator<Item = (K, Amf0Value<A>)>) -> Self
    where
        K: Into<ByteString>,
    {
        Self::Object(members.into_iter().map(|(name, value)| (name.into(), value)).collect())
    }

    /// The marker this value is written with.
    pub fn marker(&self) -> Amf0Marker {
        match self {
            Self::Number(_) => Amf0Marker::Number,
            Self::Boolean(_) => Amf0Marker::Boolean,
            Self::String(s) if s.len() > u16::MAX as usize => Amf0Marker::LongString,
            Self::String(_) => Amf0Marker::String,
            Self::Object(_) => Amf0Marker::Object,
            Self::Null => Amf0Marker::Null,
            Self::Undefined => Amf0Marker::Undefined,
            Self::Reference(_) => Amf0Marker::Reference,
            Self::EcmaArray(_) => Amf0Marker::EcmaArray,
            Self::StrictArray(_) => Amf0Marker::StrictArray,
            Self::Date { .. } => Amf0Marker::Date,
            Self::Unsupported => Amf0Marker::Unsupported,
            Self::XmlDocument(_) => Amf0Marker::XmlDocument,
            Self::TypedObject { .. } => Amf0Marker::TypedObject,
            Self::AvmPlus(_) => Amf0Marker::AVMPlusObject,
        }
    }

    /// Returns `true` for the values that take part in the reference table.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Object(_) | Self::TypedObject { .. } | Self::EcmaArray(_) | Self::StrictArray(_)
        )
    }

    /// The number, if this is a number.
    pub fn as_number(&self) -> Option<Amf0Number> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The string, if this is a string holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => std::str::from_utf8(s).ok(),
            _ => None,
        }
    }

    /// The members of an object, typed object or ECMA array.
    pub fn members(&self) -> Option<&[(ByteString, Amf0Value<A>)]> {
        match self {
            Self::Object(members) | Self::EcmaArray(members) | Self::TypedObject { members, .. } => Some(members.as_slice()),
            _ => None,
        }
    }

    /// The first member with the given name.
    pub fn get(&self, name: &str) -> Option<&Amf0Value<A>> {
        self.members()?
            .iter()
            .find(|(key, _)| &**key == name)
            .map(|(_, value)| value)
    }
}

impl<A> From<Amf0Number> for Amf0Value<A> {
    fn from(value: Amf0Number) -> Self {
        Amf0Value::Number(value)
    }
}

impl<A> From<f64> for Amf0Value<A> {
    fn from(value: f64) -> Self {
        Amf0Value::Number(value.into())
    }
}

impl<A> From<bool> for Amf0Value<A> {
    fn from(value: bool) -> Self {
        Amf0Value::Boolean(value)
    }
}

impl<A> From<Bytes> for Amf0Value<A> {
    fn from(value: Bytes) -> Self {
        Amf0Value::String(value)
    }
}

impl<A> From<String> for Amf0Value<A> {
    fn from(value: String) -> Self {
        Amf0Value::String(Bytes::from(value))
    }
}

impl<A> From<&str> for Amf0Value<A> {
    fn from(value: &str) -> Self {
        Amf0Value::String(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl<A> From<Amf0Array<A>> for Amf0Value<A> {
    fn from(value: Amf0Array<A>) -> Self {
        Amf0Value::StrictArray(value)
    }
}

impl<A> From<Amf0Object<A>> for Amf0Value<A> {
    fn from(value: Amf0Object<A>) -> Self {
        Amf0Value::Object(value)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<A> serde::ser::Serialize for Amf0Value<A>
where
    A: serde::ser::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::{SerializeMap, SerializeSeq};

        match self {
            Amf0Value::Number(v) => serializer.serialize_f64(v.to_f64()),
            Amf0Value::Boolean(v) => serializer.serialize_bool(*v),
            Amf0Value::String(v) | Amf0Value::XmlDocument(v) => match std::str::from_utf8(v) {
                Ok(s) => serializer.serialize_str(s),
                Err(_) => serializer.serialize_bytes(v),
            },
            Amf0Value::Object(members) | Amf0Value::EcmaArray(members) | Amf0Value::TypedObject { members, .. } => {
                let mut map = serializer.serialize_map(Some(members.len()))?;

                for (key, value) in members {
                    map.serialize_entry(&**key, value)?;
                }

                map.end()
            }
            Amf0Value::StrictArray(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;

                for value in elements {
                    seq.serialize_element(value)?;
                }

                seq.end()
            }
            Amf0Value::Date { time, .. } => serializer.serialize_f64(time.to_f64()),
            Amf0Value::Null | Amf0Value::Undefined | Amf0Value::Unsupported | Amf0Value::Reference(_) => {
                serializer.serialize_none()
            }
            Amf0Value::AvmPlus(v) => v.serialize(serializer),
        }
    }
}
