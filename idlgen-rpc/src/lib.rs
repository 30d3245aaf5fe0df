//! # idlgen RPC
//!
//! Runtime contracts for generated service code.
//!
//! This crate provides:
//! - The [`Dispatcher`] transport contract used by generated actions
//! - Server [`Action`] and client [`ClientAction`] traits
//! - An [`ActionRegistry`] mapping action names to factories
//! - [`ApplicationException`] reported to client callbacks
//! - An in-process [`LoopbackDispatcher`] for tests and embedding

pub mod action;
pub mod error;
pub mod exception;
pub mod loopback;
pub mod pending;
pub mod registry;

pub use action::{Action, ActionParameters, ClientAction, Dispatcher};
pub use error::RpcError;
pub use exception::{ApplicationException, ExceptionKind};
pub use loopback::{DispatcherConfig, LoopbackDispatcher};
pub use pending::PendingCalls;
pub use registry::ActionRegistry;
