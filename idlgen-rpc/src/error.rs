//! Error types for RPC transports.

use idlgen_core::WireError;
use thiserror::Error;

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum RpcError {
    /// A frame envelope could not be decoded.
    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    /// The dispatcher was closed.
    #[error("dispatcher closed")]
    Closed,
}
