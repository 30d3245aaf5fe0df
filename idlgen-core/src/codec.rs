//! The [`WireStruct`] trait implemented by every generated struct.

use bytes::Bytes;

use crate::decoder::Reader;
use crate::encoder::Writer;
use crate::error::{Result, WireError};

/// A struct that can be decoded from and encoded to the tagged wire format.
///
/// Both methods report success as a boolean, matching the sticky-error model
/// of [`Reader`] and [`Writer`]; callers must check the result.
pub trait WireStruct {
    /// Decodes fields until the stop marker, overwriting present fields.
    ///
    /// Returns `false` on a type mismatch, a missing required field or a
    /// reader error.
    fn read(&mut self, reader: &mut Reader<'_>) -> bool;

    /// Encodes present fields in ascending id order followed by a stop marker.
    ///
    /// Returns `false` if the writer recorded an error.
    fn write(&self, writer: &mut Writer) -> bool;
}

/// Encodes a value into a standalone buffer.
///
/// # Errors
/// Returns the writer's error if encoding failed.
pub fn encode_to_bytes<T: WireStruct + ?Sized>(value: &T) -> Result<Bytes> {
    let mut writer = Writer::new();
    if value.write(&mut writer) {
        Ok(writer.into_bytes())
    } else {
        Err(writer.error().cloned().unwrap_or(WireError::Rejected))
    }
}

/// Decodes a value from a buffer holding exactly one encoded struct.
///
/// # Errors
/// Returns the reader's error, or [`WireError::Rejected`] when the bytes were
/// well formed but the generated decode refused them.
pub fn decode_from_slice<T: WireStruct + Default>(bytes: &[u8]) -> Result<T> {
    let mut reader = Reader::new(bytes);
    let mut value = T::default();
    if value.read(&mut reader) {
        Ok(value)
    } else {
        Err(reader.error().cloned().unwrap_or(WireError::Rejected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    #[derive(Debug, Default, PartialEq)]
    struct Point {
        x: i32,
        label: Option<String>,
    }

    impl WireStruct for Point {
        fn read(&mut self, reader: &mut Reader<'_>) -> bool {
            let mut ok = true;
            let mut x_present = false;
            while ok && reader.parse_next_field() {
                let field = reader.parsed_field();
                if field.is_stop() {
                    break;
                }
                match (field.id, field.field_type) {
                    (1, FieldType::I32) => {
                        self.x = field.value.as_i32();
                        x_present = true;
                    }
                    (2, FieldType::String) => {
                        self.label = field.value.as_str().map(str::to_owned);
                    }
                    _ => ok = reader.skip_field(field),
                }
            }
            ok && x_present && !reader.has_errors()
        }

        fn write(&self, writer: &mut Writer) -> bool {
            writer.add_i32(1, self.x);
            if let Some(label) = &self.label {
                writer.add_string(2, label);
            }
            writer.add_stop();
            !writer.has_errors()
        }
    }

    #[test]
    fn test_encode_decode() {
        let point = Point {
            x: 3,
            label: Some("p".to_string()),
        };
        let bytes = encode_to_bytes(&point).unwrap();
        let decoded: Point = decode_from_slice(&bytes).unwrap();
        assert_eq!(decoded, point);
    }

    #[test]
    fn test_decode_rejected() {
        let err = decode_from_slice::<Point>(&[0]).unwrap_err();
        assert_eq!(err, WireError::Rejected);
    }

    #[test]
    fn test_decode_wire_error() {
        let err = decode_from_slice::<Point>(&[8, 0]).unwrap_err();
        assert!(matches!(err, WireError::UnexpectedEof { .. }));
    }
}
