//! Error types for wire encoding and decoding.

use thiserror::Error;

/// Error recorded by a [`Reader`](crate::Reader) or [`Writer`](crate::Writer).
///
/// Both sides keep the first error they hit and refuse further work, so
/// generated code only has to check once at the end of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// Input ended before the requested number of bytes could be read.
    #[error("unexpected end of input: required {required} bytes at offset {offset}, available {available}")]
    UnexpectedEof {
        /// Offset at which the read was attempted.
        offset: usize,
        /// Required byte count.
        required: usize,
        /// Remaining byte count.
        available: usize,
    },

    /// Unknown type tag encountered in a field header.
    #[error("unknown type tag {tag:#04x} at offset {offset}")]
    UnknownType {
        /// The raw tag byte.
        tag: u8,
        /// Offset of the tag byte.
        offset: usize,
    },

    /// A container head named STOP as its element, key or value type.
    #[error("stop tag used as container element type at offset {offset}")]
    StopElement {
        /// Offset of the element type byte.
        offset: usize,
    },

    /// A length or element count was negative.
    #[error("negative length {length} at offset {offset}")]
    NegativeLength {
        /// The decoded length.
        length: i32,
        /// Offset of the length prefix.
        offset: usize,
    },

    /// Nested structs or containers exceeded the allowed depth.
    #[error("nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded {
        /// Maximum nesting depth.
        limit: usize,
    },

    /// Encoded output would exceed the writer's size limit.
    #[error("message too large: {size} bytes exceeds limit of {limit}")]
    MessageTooLarge {
        /// Size the message would reach.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A value is too long to carry a 32-bit length prefix.
    #[error("value too long: {length} bytes")]
    ValueTooLong {
        /// Length of the value.
        length: usize,
    },

    /// `close_struct` was called without a matching `open_struct`.
    #[error("close_struct without matching open_struct")]
    UnbalancedStruct,

    /// The message envelope could not be decoded.
    #[error("invalid message header: {message}")]
    InvalidHeader {
        /// Description of the problem.
        message: String,
    },

    /// A decode completed without error on the wire but the value was rejected.
    #[error("decode rejected")]
    Rejected,
}

/// Result type alias for wire operations.
pub type Result<T> = std::result::Result<T, WireError>;
