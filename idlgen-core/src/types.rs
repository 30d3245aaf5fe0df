//! Wire type tags and decoded field values.
//!
//! Every encoded field starts with a one byte [`FieldType`] tag followed by a
//! big-endian `i16` field id. A struct ends with a single [`FieldType::Stop`]
//! byte.

/// Type tag carried in front of every encoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum FieldType {
    /// End of the current struct.
    #[default]
    Stop = 0,
    /// Boolean, one byte.
    Bool = 2,
    /// Signed 8-bit integer.
    Byte = 3,
    /// IEEE-754 double, eight bytes.
    Double = 4,
    /// Signed 16-bit integer.
    I16 = 6,
    /// Signed 32-bit integer. Enums travel as this type.
    I32 = 8,
    /// Signed 64-bit integer.
    I64 = 10,
    /// Length-prefixed byte string.
    String = 11,
    /// Nested struct terminated by its own stop marker.
    Struct = 12,
    /// Key type, value type, count, then pairs.
    Map = 13,
    /// Element type, count, then elements.
    Set = 14,
    /// Element type, count, then elements.
    List = 15,
}

impl FieldType {
    /// Maps a raw tag byte to a type, returning `None` for unknown tags.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Stop),
            2 => Some(Self::Bool),
            3 => Some(Self::Byte),
            4 => Some(Self::Double),
            6 => Some(Self::I16),
            8 => Some(Self::I32),
            10 => Some(Self::I64),
            11 => Some(Self::String),
            12 => Some(Self::Struct),
            13 => Some(Self::Map),
            14 => Some(Self::Set),
            15 => Some(Self::List),
            _ => None,
        }
    }

    /// Returns the raw tag byte.
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Returns the fixed payload size, or `None` for variable-length kinds.
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Self::Stop => Some(0),
            Self::Bool | Self::Byte => Some(1),
            Self::I16 => Some(2),
            Self::I32 => Some(4),
            Self::I64 | Self::Double => Some(8),
            Self::String | Self::Struct | Self::Map | Self::Set | Self::List => None,
        }
    }

    /// Returns true for struct and container kinds.
    #[must_use]
    pub const fn is_compound(self) -> bool {
        matches!(self, Self::Struct | Self::Map | Self::Set | Self::List)
    }

    /// Returns the name used in generated code and diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stop => "Stop",
            Self::Bool => "Bool",
            Self::Byte => "Byte",
            Self::Double => "Double",
            Self::I16 => "I16",
            Self::I32 => "I32",
            Self::I64 => "I64",
            Self::String => "String",
            Self::Struct => "Struct",
            Self::Map => "Map",
            Self::Set => "Set",
            Self::List => "List",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of the field most recently parsed by a [`Reader`](crate::Reader).
///
/// Scalar payloads are fully decoded. Struct payloads are left on the wire
/// for the nested decode (or [`Reader::skip_field`](crate::Reader::skip_field));
/// container payloads carry their already-consumed header.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FieldValue<'a> {
    /// No payload (stop marker).
    #[default]
    None,
    /// Boolean payload.
    Bool(bool),
    /// 8-bit payload.
    Byte(i8),
    /// 16-bit payload.
    I16(i16),
    /// 32-bit payload.
    I32(i32),
    /// 64-bit payload.
    I64(i64),
    /// Double payload.
    Double(f64),
    /// String payload, borrowed from the input buffer.
    Bytes(&'a [u8]),
    /// Nested struct, still on the wire.
    Struct,
    /// List or set header.
    Elements {
        /// Element type.
        element: FieldType,
        /// Number of elements.
        count: i32,
    },
    /// Map header.
    Pairs {
        /// Key type.
        key: FieldType,
        /// Value type.
        value: FieldType,
        /// Number of pairs.
        count: i32,
    },
}

impl<'a> FieldValue<'a> {
    /// Returns the boolean payload, or `false`.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// Returns the 8-bit payload, or `0`.
    #[must_use]
    pub fn as_i8(&self) -> i8 {
        match *self {
            Self::Byte(v) => v,
            _ => 0,
        }
    }

    /// Returns the 16-bit payload, or `0`.
    #[must_use]
    pub fn as_i16(&self) -> i16 {
        match *self {
            Self::I16(v) => v,
            _ => 0,
        }
    }

    /// Returns the 32-bit payload, or `0`.
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        match *self {
            Self::I32(v) => v,
            _ => 0,
        }
    }

    /// Returns the 64-bit payload, or `0`.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        match *self {
            Self::I64(v) => v,
            _ => 0,
        }
    }

    /// Returns the double payload, or `0.0`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Double(v) => v,
            _ => 0.0,
        }
    }

    /// Returns the raw string payload.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the string payload if it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// A parsed field header together with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Field<'a> {
    /// Field id, the wire tag matched by generated readers.
    pub id: i16,
    /// Wire type of the payload.
    pub field_type: FieldType,
    /// Decoded payload.
    pub value: FieldValue<'a>,
}

impl Field<'_> {
    /// Returns true if this is the stop marker ending a struct.
    #[must_use]
    pub fn is_stop(&self) -> bool {
        self.field_type == FieldType::Stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_mapping() {
        for tag in 0u8..=20 {
            if let Some(ty) = FieldType::from_tag(tag) {
                assert_eq!(ty.tag(), tag);
            }
        }
        assert_eq!(FieldType::from_tag(1), None);
        assert_eq!(FieldType::from_tag(16), None);
        assert_eq!(FieldType::from_tag(11), Some(FieldType::String));
    }

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(FieldType::Bool.fixed_size(), Some(1));
        assert_eq!(FieldType::I16.fixed_size(), Some(2));
        assert_eq!(FieldType::I32.fixed_size(), Some(4));
        assert_eq!(FieldType::I64.fixed_size(), Some(8));
        assert_eq!(FieldType::String.fixed_size(), None);
        assert!(FieldType::List.is_compound());
        assert!(!FieldType::String.is_compound());
    }

    #[test]
    fn test_value_accessors_fall_back() {
        let v = FieldValue::I32(42);
        assert_eq!(v.as_i32(), 42);
        assert_eq!(v.as_i64(), 0);
        assert!(!v.as_bool());
        assert_eq!(v.as_str(), None);

        let s = FieldValue::Bytes(b"abc");
        assert_eq!(s.as_str(), Some("abc"));
        assert_eq!(FieldValue::Bytes(&[0xff, 0xfe]).as_str(), None);
    }
}
