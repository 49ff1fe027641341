//! Decoder and encoder limits.

/// Hardening limits applied by [`Amf0Decoder`](crate::Amf0Decoder) and [`Amf0Encoder`](crate::Amf0Encoder).
///
/// The wire format itself places no bound on nesting or on the length of long strings,
/// these limits exist so that adversarial input cannot exhaust the stack or memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Amf0Limits {
    /// Maximum number of nested composite values (objects and arrays).
    pub max_depth: usize,
    /// Maximum declared length of a long string or xml document, `None` for no ceiling.
    pub max_string_length: Option<u32>,
    /// Maximum number of values a decoder materializes, copies made for references and kept in the
    /// reference table included.
    pub max_nodes: usize,
}

impl Amf0Limits {
    /// The default nesting limit.
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// The default node budget.
    pub const DEFAULT_MAX_NODES: usize = 1 << 20;

    /// Limits that never trip.
    ///
    /// Only use this for trusted input, deep nesting will overflow the stack.
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_string_length: None,
            max_nodes: usize::MAX,
        }
    }

    /// Set the maximum nesting depth.
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the maximum declared length of long strings and xml documents.
    pub const fn with_max_string_length(mut self, max_string_length: u32) -> Self {
        self.max_string_length = Some(max_string_length);
        self
    }

    /// Set the maximum number of values a decoder materializes.
    pub const fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<(), crate::Amf0Error> {
        if depth > self.max_depth {
            tracing::debug!(depth, limit = self.max_depth, "amf0 nesting limit reached");
            return Err(crate::Amf0Error::NestingTooDeep { limit: self.max_depth });
        }

        Ok(())
    }

    pub(crate) fn check_nodes(&self, nodes: usize) -> Result<(), crate::Amf0Error> {
        if nodes > self.max_nodes {
            tracing::debug!(nodes, limit = self.max_nodes, "amf0 node budget exhausted");
            return Err(crate::Amf0Error::TooManyNodes { limit: self.max_nodes });
        }

        Ok(())
    }

    pub(crate) fn check_string_length(&self, length: u32) -> Result<(), crate::Amf0Error> {
        match self.max_string_length {
            Some(limit) if length > limit => Err(crate::Amf0Error::StringTooLong { length, limit }),
            _ => Ok(()),
        }
    }
}

impl Default for Amf0Limits {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_string_length: None,
            max_nodes: Self::DEFAULT_MAX_NODES,
        }
    }
}
