//! Application exceptions reported to client callbacks.

use std::fmt;

use idlgen_core::{FieldType, Reader, WireStruct, Writer};
use thiserror::Error;

/// Category of an [`ApplicationException`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ExceptionKind {
    /// Unclassified failure.
    #[default]
    Unknown = 0,
    /// No action registered under the requested name.
    UnknownMethod = 1,
    /// Message kind not valid in this position.
    InvalidMessageType = 2,
    /// Reply names a different action than the call.
    WrongMethodName = 3,
    /// Reply matches no outstanding call.
    BadSequenceId = 4,
    /// Reply carried no decodable result.
    MissingResult = 5,
    /// Failure inside the peer.
    InternalError = 6,
    /// Malformed message.
    ProtocolError = 7,
    /// Transport refused or dropped the call.
    Unavailable = 8,
}

impl ExceptionKind {
    /// Maps a wire value to a kind, falling back to `Unknown`.
    #[must_use]
    pub const fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::UnknownMethod,
            2 => Self::InvalidMessageType,
            3 => Self::WrongMethodName,
            4 => Self::BadSequenceId,
            5 => Self::MissingResult,
            6 => Self::InternalError,
            7 => Self::ProtocolError,
            8 => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::UnknownMethod => "unknown method",
            Self::InvalidMessageType => "invalid message type",
            Self::WrongMethodName => "wrong method name",
            Self::BadSequenceId => "bad sequence id",
            Self::MissingResult => "missing result",
            Self::InternalError => "internal error",
            Self::ProtocolError => "protocol error",
            Self::Unavailable => "unavailable",
        };
        f.write_str(name)
    }
}

/// Failure delivered to a client callback instead of a result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{kind}: {message}")]
pub struct ApplicationException {
    /// Failure category.
    pub kind: ExceptionKind,
    /// Human readable reason.
    pub message: String,
}

impl ApplicationException {
    /// Creates an exception.
    #[must_use]
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The transport refused to start the call.
    #[must_use]
    pub fn unavailable(action: &str) -> Self {
        Self::new(
            ExceptionKind::Unavailable,
            format!("{action}: transport unavailable"),
        )
    }

    /// A message could not be encoded or decoded.
    #[must_use]
    pub fn protocol_error(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::ProtocolError, message)
    }

    /// The reply carried no result.
    #[must_use]
    pub fn missing_result(action: &str) -> Self {
        Self::new(
            ExceptionKind::MissingResult,
            format!("{action} failed: unknown result"),
        )
    }

    /// No action is registered under `action`.
    #[must_use]
    pub fn unknown_method(action: &str) -> Self {
        Self::new(
            ExceptionKind::UnknownMethod,
            format!("unknown action '{action}'"),
        )
    }
}

impl WireStruct for ApplicationException {
    fn read(&mut self, reader: &mut Reader<'_>) -> bool {
        let mut read_result = true;
        while read_result && reader.parse_next_field() {
            let field = reader.parsed_field();
            if field.is_stop() {
                break;
            }
            match (field.id, field.field_type) {
                (1, FieldType::String) => match field.value.as_str() {
                    Some(value) => self.message = value.to_owned(),
                    None => read_result = false,
                },
                (2, FieldType::I32) => self.kind = ExceptionKind::from_i32(field.value.as_i32()),
                _ => {
                    if !reader.skip_field(field) {
                        read_result = false;
                    }
                }
            }
        }
        read_result && !reader.has_errors()
    }

    fn write(&self, writer: &mut Writer) -> bool {
        writer.add_string(1, &self.message);
        writer.add_i32(2, self.kind as i32);
        writer.add_stop();
        !writer.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlgen_core::{decode_from_slice, encode_to_bytes};

    #[test]
    fn test_kind_values() {
        assert_eq!(ExceptionKind::Unavailable as i32, 8);
        assert_eq!(ExceptionKind::from_i32(5), ExceptionKind::MissingResult);
        assert_eq!(ExceptionKind::from_i32(99), ExceptionKind::Unknown);
    }

    #[test]
    fn test_constructors() {
        let e = ApplicationException::missing_result("add");
        assert_eq!(e.kind, ExceptionKind::MissingResult);
        assert_eq!(e.to_string(), "missing result: add failed: unknown result");
        assert_eq!(
            ApplicationException::unavailable("ping").kind,
            ExceptionKind::Unavailable
        );
    }

    #[test]
    fn test_wire_form() {
        let e = ApplicationException::unknown_method("nope");
        let bytes = encode_to_bytes(&e).unwrap();
        let decoded: ApplicationException = decode_from_slice(&bytes).unwrap();
        assert_eq!(decoded, e);
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let mut writer = Writer::new();
        writer.add_i64(9, 1);
        writer.add_i32(2, 6);
        writer.add_stop();
        let bytes = writer.into_bytes();
        let decoded: ApplicationException = decode_from_slice(&bytes).unwrap();
        assert_eq!(decoded.kind, ExceptionKind::InternalError);
        assert!(decoded.message.is_empty());
    }
}
