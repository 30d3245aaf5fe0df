//! # idlgen Core
//!
//! Runtime primitives for code generated by `idlgen-codegen`.
//!
//! This crate provides:
//! - Wire type tags and parsed field values
//! - A sticky-error [`Reader`] walking tagged fields up to a stop marker
//! - A sticky-error [`Writer`] appending tagged fields
//! - The [`WireStruct`] trait implemented by every generated struct
//! - The RPC [`MessageHeader`] envelope

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod types;

pub use codec::{WireStruct, decode_from_slice, encode_to_bytes};
pub use decoder::Reader;
pub use encoder::Writer;
pub use error::{Result, WireError};
pub use header::{MessageHeader, MessageKind};
pub use types::{Field, FieldType, FieldValue};
