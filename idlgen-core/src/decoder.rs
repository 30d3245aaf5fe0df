//! Tagged field reader.
//!
//! [`Reader`] walks an encoded buffer one field header at a time. Generated
//! decode routines drive it with a loop of the form:
//!
//! ```ignore
//! while read_result && reader.parse_next_field() {
//!     let field = reader.parsed_field();
//!     if field.is_stop() {
//!         break;
//!     }
//!     match field.id { /* one arm per declared id */ }
//! }
//! ```

use crate::codec::WireStruct;
use crate::error::WireError;
use crate::types::{Field, FieldType, FieldValue};

/// Maximum nesting of structs and containers accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Cursor over an encoded message.
///
/// Errors are sticky: after the first failure every call returns `false`
/// and [`Reader::error`] reports the cause.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    current: Field<'a>,
    depth: usize,
    max_depth: usize,
    error: Option<WireError>,
}

impl<'a> Reader<'a> {
    /// Creates a reader over the given buffer.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            current: Field::default(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            error: None,
        }
    }

    /// Overrides the nesting limit.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Current byte offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns true once any read has failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the first recorded error.
    #[must_use]
    pub fn error(&self) -> Option<&WireError> {
        self.error.as_ref()
    }

    /// Records a failure raised by decode logic layered on this reader.
    pub fn reject(&mut self) {
        self.fail(WireError::Rejected);
    }

    /// Advances to the next field header or stop marker.
    ///
    /// Scalar and string payloads are consumed here. For a struct only the
    /// header is consumed; for lists, sets and maps the container header is
    /// consumed as well and reported through [`FieldValue`].
    ///
    /// Returns `false` on malformed or truncated input, including input that
    /// ends before a stop marker.
    pub fn parse_next_field(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        let Some(tag) = self.read_u8() else {
            return false;
        };
        let Some(field_type) = self.decode_type(tag) else {
            return false;
        };
        if field_type == FieldType::Stop {
            self.current = Field::default();
            return true;
        }
        let Some(id) = self.read_i16() else {
            return false;
        };
        let Some(value) = self.read_value_head(field_type) else {
            return false;
        };
        self.current = Field {
            id,
            field_type,
            value,
        };
        true
    }

    /// Returns the field most recently produced by [`Reader::parse_next_field`].
    #[must_use]
    pub fn parsed_field(&self) -> Field<'a> {
        self.current
    }

    /// Decodes a nested struct whose header was just parsed.
    ///
    /// Tracks nesting depth so hostile input cannot recurse without bound.
    pub fn read_struct<T: WireStruct>(&mut self, target: &mut T) -> bool {
        if !self.enter() {
            return false;
        }
        let ok = target.read(self);
        self.depth -= 1;
        ok && self.error.is_none()
    }

    /// Discards whatever part of `field` is still on the wire.
    ///
    /// Scalars are already consumed, so this only does work for struct and
    /// container fields.
    pub fn skip_field(&mut self, field: Field<'a>) -> bool {
        if self.error.is_some() {
            return false;
        }
        match field.value {
            FieldValue::Struct => self.skip_struct(),
            FieldValue::Elements { element, count } => self.skip_elements(element, count),
            FieldValue::Pairs { key, value, count } => self.skip_pairs(key, value, count),
            _ => true,
        }
    }

    fn skip_struct(&mut self) -> bool {
        if !self.enter() {
            return false;
        }
        loop {
            let Some(tag) = self.read_u8() else {
                return false;
            };
            let Some(field_type) = self.decode_type(tag) else {
                return false;
            };
            if field_type == FieldType::Stop {
                return self.leave();
            }
            if self.read_i16().is_none() || !self.skip_value(field_type) {
                return false;
            }
        }
    }

    fn skip_elements(&mut self, element: FieldType, count: i32) -> bool {
        self.enter() && (0..count).all(|_| self.skip_value(element)) && self.leave()
    }

    fn skip_pairs(&mut self, key: FieldType, value: FieldType, count: i32) -> bool {
        self.enter()
            && (0..count).all(|_| self.skip_value(key) && self.skip_value(value))
            && self.leave()
    }

    fn skip_value(&mut self, field_type: FieldType) -> bool {
        match field_type {
            FieldType::Stop => true,
            FieldType::Struct => self.skip_struct(),
            FieldType::String => {
                let Some(len) = self.read_len() else {
                    return false;
                };
                self.take(len).is_some()
            }
            FieldType::List | FieldType::Set => match self.read_elements_head() {
                Some(FieldValue::Elements { element, count }) => {
                    self.skip_elements(element, count)
                }
                _ => false,
            },
            FieldType::Map => match self.read_pairs_head() {
                Some(FieldValue::Pairs { key, value, count }) => {
                    self.skip_pairs(key, value, count)
                }
                _ => false,
            },
            scalar => match scalar.fixed_size() {
                Some(size) => self.take(size).is_some(),
                None => false,
            },
        }
    }

    fn read_value_head(&mut self, field_type: FieldType) -> Option<FieldValue<'a>> {
        match field_type {
            FieldType::Stop => Some(FieldValue::None),
            FieldType::Bool => self.read_u8().map(|b| FieldValue::Bool(b != 0)),
            FieldType::Byte => self.read_u8().map(|b| FieldValue::Byte(b as i8)),
            FieldType::I16 => self.read_i16().map(FieldValue::I16),
            FieldType::I32 => self.read_i32().map(FieldValue::I32),
            FieldType::I64 => self.read_i64().map(FieldValue::I64),
            FieldType::Double => self
                .read_i64()
                .map(|bits| FieldValue::Double(f64::from_bits(bits as u64))),
            FieldType::String => {
                let len = self.read_len()?;
                self.take(len).map(FieldValue::Bytes)
            }
            FieldType::Struct => Some(FieldValue::Struct),
            FieldType::List | FieldType::Set => self.read_elements_head(),
            FieldType::Map => self.read_pairs_head(),
        }
    }

    fn read_elements_head(&mut self) -> Option<FieldValue<'a>> {
        let element = self.read_element_type()?;
        let count = self.read_count()?;
        Some(FieldValue::Elements { element, count })
    }

    fn read_pairs_head(&mut self) -> Option<FieldValue<'a>> {
        let key = self.read_element_type()?;
        let value = self.read_element_type()?;
        let count = self.read_count()?;
        Some(FieldValue::Pairs { key, value, count })
    }

    fn read_element_type(&mut self) -> Option<FieldType> {
        let tag = self.read_u8()?;
        let element = self.decode_type(tag)?;
        if element == FieldType::Stop {
            self.fail(WireError::StopElement {
                offset: self.pos - 1,
            });
            return None;
        }
        Some(element)
    }

    fn decode_type(&mut self, tag: u8) -> Option<FieldType> {
        let decoded = FieldType::from_tag(tag);
        if decoded.is_none() {
            self.fail(WireError::UnknownType {
                tag,
                offset: self.pos - 1,
            });
        }
        decoded
    }

    fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            self.fail(WireError::DepthLimitExceeded {
                limit: self.max_depth,
            });
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) -> bool {
        self.depth -= 1;
        true
    }

    fn fail(&mut self, error: WireError) {
        if self.error.is_none() {
            tracing::trace!(%error, offset = self.pos, "wire read failed");
            self.error = Some(error);
        }
    }

    pub(crate) fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.error.is_some() {
            return None;
        }
        if self.remaining() < len {
            self.fail(WireError::UnexpectedEof {
                offset: self.pos,
                required: len,
                available: self.remaining(),
            });
            return None;
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Some(bytes)
    }

    pub(crate) fn read_u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    pub(crate) fn read_i16(&mut self) -> Option<i16> {
        self.take(2).map(|b| i16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn read_i32(&mut self) -> Option<i32> {
        self.take(4).map(|b| i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn read_i64(&mut self) -> Option<i64> {
        self.take(8).map(|b| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(b);
            i64::from_be_bytes(raw)
        })
    }

    fn read_count(&mut self) -> Option<i32> {
        let offset = self.pos;
        let count = self.read_i32()?;
        if count < 0 {
            self.fail(WireError::NegativeLength {
                length: count,
                offset,
            });
            return None;
        }
        Some(count)
    }

    pub(crate) fn read_len(&mut self) -> Option<usize> {
        self.read_count().map(|len| len as usize)
    }
}
