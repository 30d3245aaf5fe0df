//! Message envelope.
//!
//! Every RPC frame starts with a [`MessageHeader`] naming the action, the
//! message kind and a sequence number, followed by one encoded struct.
//!
//! # Wire Format
//! ```text
//! +0: nameLength      (i32, big-endian)
//! +4: name            (nameLength bytes, UTF-8)
//! +n: kind            (u8)
//! +n+1: sequence      (i32, big-endian)
//! ```

use crate::decoder::Reader;
use crate::encoder::Writer;
use crate::error::{Result, WireError};

/// Kind of an RPC message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    /// Request expecting a reply.
    Call = 1,
    /// Successful reply.
    Reply = 2,
    /// Reply carrying an application exception.
    Exception = 3,
    /// Request with no reply.
    Oneway = 4,
}

impl MessageKind {
    /// Maps a raw byte to a kind.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Call),
            2 => Some(Self::Reply),
            3 => Some(Self::Exception),
            4 => Some(Self::Oneway),
            _ => None,
        }
    }

    /// Returns true for kinds sent by the calling side.
    #[must_use]
    pub const fn is_request(self) -> bool {
        matches!(self, Self::Call | Self::Oneway)
    }
}

/// Envelope preceding every RPC frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    /// Action name.
    pub name: String,
    /// Message kind.
    pub kind: MessageKind,
    /// Sequence number chosen by the caller and echoed in the reply.
    pub sequence_number: i32,
}

impl MessageHeader {
    /// Creates a new message header.
    ///
    /// # Arguments
    /// * `name` - Action name
    /// * `kind` - Message kind
    /// * `sequence_number` - Caller-assigned sequence number
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MessageKind, sequence_number: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            sequence_number,
        }
    }

    /// Appends the header to a writer.
    pub fn encode(&self, writer: &mut Writer) {
        writer.put_raw_string(&self.name);
        writer.put_raw_u8(self.kind as u8);
        writer.put_raw_i32(self.sequence_number);
    }

    /// Reads a header from the front of a frame, leaving the reader at the body.
    ///
    /// # Errors
    /// Returns an error if the frame is truncated, the name is not UTF-8 or
    /// the kind byte is unknown.
    pub fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let name = reader
            .read_len()
            .and_then(|len| reader.take(len))
            .ok_or_else(|| truncated(reader))?;
        let name = std::str::from_utf8(name).map_err(|_| WireError::InvalidHeader {
            message: "action name is not valid UTF-8".to_string(),
        })?;
        let kind = reader.read_u8().ok_or_else(|| truncated(reader))?;
        let kind = MessageKind::from_u8(kind).ok_or_else(|| WireError::InvalidHeader {
            message: format!("unknown message kind {kind}"),
        })?;
        let sequence_number = reader.read_i32().ok_or_else(|| truncated(reader))?;
        Ok(Self::new(name, kind, sequence_number))
    }
}

fn truncated(reader: &Reader<'_>) -> WireError {
    reader.error().cloned().unwrap_or(WireError::InvalidHeader {
        message: "truncated header".to_string(),
    })
}
