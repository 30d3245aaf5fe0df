//! Tagged field writer.
//!
//! [`Writer`] appends field headers and payloads to a growable buffer.
//! Generated encode routines call one `add_*` method per present field,
//! bracket nested structs with [`Writer::open_struct`] / [`Writer::close_struct`],
//! and finish with [`Writer::add_stop`].

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::WireError;
use crate::types::FieldType;

/// Default initial capacity of a writer buffer.
pub const DEFAULT_CAPACITY: usize = 256;

/// Append-only encoder for one message.
///
/// Errors are sticky: once a write fails nothing more is appended and
/// [`Writer::has_errors`] returns true.
#[derive(Debug)]
pub struct Writer {
    buf: BytesMut,
    depth: usize,
    max_size: Option<usize>,
    error: Option<WireError>,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates an unbounded writer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an unbounded writer with the given initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            depth: 0,
            max_size: None,
            error: None,
        }
    }

    /// Creates a writer that fails once the output would exceed `max_size` bytes.
    #[must_use]
    pub fn with_limit(max_size: usize) -> Self {
        let mut writer = Self::with_capacity(DEFAULT_CAPACITY.min(max_size));
        writer.max_size = Some(max_size);
        writer
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the encoded bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of structs opened and not yet closed.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true once any write has failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the first recorded error.
    #[must_use]
    pub fn error(&self) -> Option<&WireError> {
        self.error.as_ref()
    }

    /// Consumes the writer and returns the encoded message.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Writes a boolean field.
    pub fn add_bool(&mut self, id: i16, value: bool) {
        if self.field_header(FieldType::Bool, id, 1) {
            self.buf.put_u8(u8::from(value));
        }
    }

    /// Writes an 8-bit field.
    pub fn add_byte(&mut self, id: i16, value: i8) {
        if self.field_header(FieldType::Byte, id, 1) {
            self.buf.put_i8(value);
        }
    }

    /// Writes a 16-bit field.
    pub fn add_i16(&mut self, id: i16, value: i16) {
        if self.field_header(FieldType::I16, id, 2) {
            self.buf.put_i16(value);
        }
    }

    /// Writes a 32-bit field.
    pub fn add_i32(&mut self, id: i16, value: i32) {
        if self.field_header(FieldType::I32, id, 4) {
            self.buf.put_i32(value);
        }
    }

    /// Writes a 64-bit field.
    pub fn add_i64(&mut self, id: i16, value: i64) {
        if self.field_header(FieldType::I64, id, 8) {
            self.buf.put_i64(value);
        }
    }

    /// Writes a double field.
    pub fn add_double(&mut self, id: i16, value: f64) {
        if self.field_header(FieldType::Double, id, 8) {
            self.buf.put_u64(value.to_bits());
        }
    }

    /// Writes a length-prefixed string field.
    pub fn add_string(&mut self, id: i16, value: &str) {
        let bytes = value.as_bytes();
        let Ok(len) = i32::try_from(bytes.len()) else {
            self.fail(WireError::ValueTooLong {
                length: bytes.len(),
            });
            return;
        };
        if self.field_header(FieldType::String, id, 4 + bytes.len()) {
            self.buf.put_i32(len);
            self.buf.put_slice(bytes);
        }
    }

    /// Writes the header of a nested struct field.
    ///
    /// The nested encode appends its own fields and stop marker; the caller
    /// then balances this call with [`Writer::close_struct`].
    pub fn open_struct(&mut self, id: i16) {
        if self.field_header(FieldType::Struct, id, 0) {
            self.depth += 1;
        }
    }

    /// Closes the innermost struct opened with [`Writer::open_struct`].
    pub fn close_struct(&mut self) {
        if self.error.is_some() {
            return;
        }
        if self.depth == 0 {
            self.fail(WireError::UnbalancedStruct);
            return;
        }
        self.depth -= 1;
    }

    /// Appends the stop marker ending the current struct.
    pub fn add_stop(&mut self) {
        if self.reserve(1) {
            self.buf.put_u8(FieldType::Stop.tag());
        }
    }

    /// Appends already encoded bytes verbatim.
    ///
    /// Transports use this to place a message body behind its envelope.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        if self.reserve(bytes.len()) {
            self.buf.put_slice(bytes);
        }
    }

    pub(crate) fn put_raw_string(&mut self, value: &str) {
        let bytes = value.as_bytes();
        let Ok(len) = i32::try_from(bytes.len()) else {
            self.fail(WireError::ValueTooLong {
                length: bytes.len(),
            });
            return;
        };
        if self.reserve(4 + bytes.len()) {
            self.buf.put_i32(len);
            self.buf.put_slice(bytes);
        }
    }

    pub(crate) fn put_raw_u8(&mut self, value: u8) {
        if self.reserve(1) {
            self.buf.put_u8(value);
        }
    }

    pub(crate) fn put_raw_i32(&mut self, value: i32) {
        if self.reserve(4) {
            self.buf.put_i32(value);
        }
    }

    fn field_header(&mut self, field_type: FieldType, id: i16, payload: usize) -> bool {
        if !self.reserve(3 + payload) {
            return false;
        }
        self.buf.put_u8(field_type.tag());
        self.buf.put_i16(id);
        true
    }

    fn reserve(&mut self, additional: usize) -> bool {
        if self.error.is_some() {
            return false;
        }
        let size = self.buf.len() + additional;
        if let Some(limit) = self.max_size
            && size > limit
        {
            self.fail(WireError::MessageTooLarge { size, limit });
            return false;
        }
        true
    }

    fn fail(&mut self, error: WireError) {
        if self.error.is_none() {
            tracing::trace!(%error, len = self.buf.len(), "wire write failed");
            self.error = Some(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_layout() {
        let mut writer = Writer::new();
        writer.add_i32(1, 42);
        writer.add_stop();
        assert_eq!(writer.as_bytes(), &[8, 0, 1, 0, 0, 0, 42, 0]);
    }

    #[test]
    fn test_string_layout() {
        let mut writer = Writer::new();
        writer.add_string(2, "x");
        assert_eq!(writer.as_bytes(), &[11, 0, 2, 0, 0, 0, 1, b'x']);
    }

    #[test]
    fn test_negative_ids_and_values() {
        let mut writer = Writer::new();
        writer.add_i16(-1, -2);
        assert_eq!(writer.as_bytes(), &[6, 0xff, 0xff, 0xff, 0xfe]);
    }

    #[test]
    fn test_struct_balancing() {
        let mut writer = Writer::new();
        writer.open_struct(3);
        assert_eq!(writer.depth(), 1);
        writer.add_stop();
        writer.close_struct();
        assert_eq!(writer.depth(), 0);
        assert!(!writer.has_errors());

        writer.close_struct();
        assert_eq!(writer.error(), Some(&WireError::UnbalancedStruct));
    }

    #[test]
    fn test_size_limit_is_sticky() {
        let mut writer = Writer::with_limit(8);
        writer.add_i32(1, 1);
        assert!(!writer.has_errors());
        writer.add_i32(2, 2);
        assert!(matches!(
            writer.error(),
            Some(WireError::MessageTooLarge { size: 14, limit: 8 })
        ));
        let len = writer.len();
        writer.add_stop();
        assert_eq!(writer.len(), len);
    }

    #[test]
    fn test_put_bytes_appends_verbatim() {
        let mut body = Writer::new();
        body.add_i32(1, 7);
        body.add_stop();

        let mut frame = Writer::new();
        frame.put_bytes(&[0xAB]);
        frame.put_bytes(body.as_bytes());
        assert_eq!(frame.as_bytes(), &[0xAB, 8, 0, 1, 0, 0, 0, 7, 0]);
    }
}
