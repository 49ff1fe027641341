//! AMF0 numbers and the non-finite double patterns.

const EXPONENT_MASK: u64 = 0x7ff0_0000_0000_0000;
const MANTISSA_MASK: u64 = 0x000f_ffff_ffff_ffff;
const QUIET_BIT: u64 = 0x0008_0000_0000_0000;
const SIGN_BIT: u64 = 0x8000_0000_0000_0000;

/// An AMF0 number.
///
/// Finite doubles are kept as-is, the four non-finite bit patterns are folded into symbolic values.
/// Equality is bitwise, so `Finite(0.0) != Finite(-0.0)` and the type is [`Eq`] and [`Hash`].
#[derive(Debug, Clone, Copy)]
pub enum Amf0Number {
    /// A finite IEEE-754 double.
    Finite(f64),
    /// Sign 0, exponent all ones, mantissa zero.
    PositiveInfinity,
    /// Sign 1, exponent all ones, mantissa zero.
    NegativeInfinity,
    /// Exponent all ones, leading mantissa bit set.
    QuietNaN,
    /// Exponent all ones, leading mantissa bit clear, mantissa not zero.
    SignalingNaN,
}

impl Amf0Number {
    /// Canonical bit pattern written for [`Amf0Number::PositiveInfinity`].
    pub const POSITIVE_INFINITY_BITS: u64 = EXPONENT_MASK;
    /// Canonical bit pattern written for [`Amf0Number::NegativeInfinity`].
    pub const NEGATIVE_INFINITY_BITS: u64 = SIGN_BIT | EXPONENT_MASK;
    /// Canonical bit pattern written for [`Amf0Number::QuietNaN`].
    pub const QUIET_NAN_BITS: u64 = EXPONENT_MASK | QUIET_BIT;
    /// Canonical bit pattern written for [`Amf0Number::SignalingNaN`].
    ///
    /// The lowest mantissa bit is set, a fully zero mantissa would be infinity.
    pub const SIGNALING_NAN_BITS: u64 = EXPONENT_MASK | 1;

    /// Classify a raw 64-bit pattern.
    pub const fn from_bits(bits: u64) -> Self {
        if bits & EXPONENT_MASK != EXPONENT_MASK {
            return Self::Finite(f64::from_bits(bits));
        }

        let mantissa = bits & MANTISSA_MASK;

        if mantissa == 0 {
            if bits & SIGN_BIT == 0 {
                Self::PositiveInfinity
            } else {
                Self::NegativeInfinity
            }
        } else if mantissa & QUIET_BIT != 0 {
            Self::QuietNaN
        } else {
            Self::SignalingNaN
        }
    }

    /// The bit pattern this number is written as.
    ///
    /// Non-finite values always map to their canonical pattern, whatever pattern they were decoded from.
    pub const fn to_bits(self) -> u64 {
        match self {
            Self::Finite(value) => value.to_bits(),
            Self::PositiveInfinity => Self::POSITIVE_INFINITY_BITS,
            Self::NegativeInfinity => Self::NEGATIVE_INFINITY_BITS,
            Self::QuietNaN => Self::QUIET_NAN_BITS,
            Self::SignalingNaN => Self::SIGNALING_NAN_BITS,
        }
    }

    /// Convert to a plain [`f64`].
    pub const fn to_f64(self) -> f64 {
        match self {
            Self::Finite(value) => value,
            Self::PositiveInfinity => f64::INFINITY,
            Self::NegativeInfinity => f64::NEG_INFINITY,
            special => f64::from_bits(special.to_bits()),
        }
    }

    /// Returns `true` for [`Amf0Number::Finite`].
    pub const fn is_finite(&self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// Returns `true` for either NaN.
    pub const fn is_nan(&self) -> bool {
        matches!(self, Self::QuietNaN | Self::SignalingNaN)
    }
}

impl PartialEq for Amf0Number {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Eq for Amf0Number {}

impl std::hash::Hash for Amf0Number {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl From<f64> for Amf0Number {
    fn from(value: f64) -> Self {
        Self::from_bits(value.to_bits())
    }
}

impl From<Amf0Number> for f64 {
    fn from(value: Amf0Number) -> Self {
        value.to_f64()
    }
}
