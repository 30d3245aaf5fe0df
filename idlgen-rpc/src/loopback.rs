//! In-process dispatcher connecting generated clients to registered actions.
//!
//! Frames are queued in memory and delivered by [`LoopbackDispatcher::pump`],
//! so a test drives both sides of a call deterministically on one thread.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};

use bytes::Bytes;
use idlgen_core::{MessageHeader, MessageKind, Reader, WireStruct, Writer};
use parking_lot::Mutex;

use crate::action::{ActionParameters, ClientAction, Dispatcher};
use crate::error::RpcError;
use crate::exception::ApplicationException;
use crate::pending::PendingCalls;
use crate::registry::ActionRegistry;

/// Default maximum size of one frame.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Loopback dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Maximum size of an encoded frame, header included.
    pub max_message_size: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl DispatcherConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum frame size.
    #[must_use]
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }
}

/// One queued frame.
#[derive(Debug)]
struct Frame {
    correlation_id: u64,
    bytes: Bytes,
}

/// Dispatcher delivering frames to itself.
///
/// Requests are routed to actions created from the registry, replies and
/// exceptions to the pending client action with the same sequence number.
/// Responses to oneway requests are discarded.
pub struct LoopbackDispatcher {
    registry: ActionRegistry,
    config: DispatcherConfig,
    outbox: Mutex<VecDeque<Frame>>,
    oneway: Mutex<HashSet<u64>>,
    pending: PendingCalls,
    next_sequence: AtomicI32,
    next_correlation: AtomicU64,
    closed: AtomicBool,
}

impl LoopbackDispatcher {
    /// Creates a dispatcher serving the actions in `registry`.
    #[must_use]
    pub fn new(registry: ActionRegistry) -> Self {
        Self::with_config(registry, DispatcherConfig::default())
    }

    /// Creates a dispatcher with an explicit configuration.
    #[must_use]
    pub fn with_config(registry: ActionRegistry, config: DispatcherConfig) -> Self {
        Self {
            registry,
            config,
            outbox: Mutex::new(VecDeque::new()),
            oneway: Mutex::new(HashSet::new()),
            pending: PendingCalls::new(),
            next_sequence: AtomicI32::new(1),
            next_correlation: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Number of frames waiting for delivery.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.outbox.lock().len()
    }

    /// Number of calls waiting for a reply.
    #[must_use]
    pub fn pending_calls(&self) -> usize {
        self.pending.len()
    }

    /// Returns true once [`LoopbackDispatcher::close`] was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Closes the dispatcher.
    ///
    /// Queued frames are discarded and every outstanding call fails with an
    /// `Unavailable` exception.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let dropped = std::mem::take(&mut *self.outbox.lock());
        tracing::debug!(dropped = dropped.len(), "closing loopback dispatcher");
        for (sequence_number, action) in self.pending.drain() {
            tracing::debug!(sequence_number, action = action.name(), "failing pending call");
            let exception = ApplicationException::unavailable(action.name());
            action.call_failed(exception);
        }
    }

    /// Delivers queued frames until the queue is empty, including frames
    /// queued by the deliveries themselves.
    ///
    /// Malformed frames are logged and dropped.
    ///
    /// # Returns
    /// Number of frames processed.
    ///
    /// # Errors
    /// Returns `RpcError::Closed` if the dispatcher is closed.
    pub fn pump(&self) -> Result<usize, RpcError> {
        let mut delivered = 0;
        loop {
            if self.is_closed() {
                return Err(RpcError::Closed);
            }
            let Some(frame) = self.outbox.lock().pop_front() else {
                return Ok(delivered);
            };
            if let Err(error) = self.deliver(&frame.bytes, frame.correlation_id) {
                tracing::trace!(%error, correlation_id = frame.correlation_id, "dropping frame");
            }
            delivered += 1;
        }
    }

    /// Routes one encoded frame.
    ///
    /// # Arguments
    /// * `bytes` - Header followed by the message body
    /// * `correlation_id` - Transport token echoed in any reply
    ///
    /// # Errors
    /// Returns `RpcError::Wire` if the header cannot be decoded.
    pub fn deliver(&self, bytes: &[u8], correlation_id: u64) -> Result<(), RpcError> {
        let mut reader = Reader::new(bytes);
        let header = MessageHeader::decode(&mut reader)?;
        let mut parameters = ActionParameters {
            reader,
            sequence_number: header.sequence_number,
            correlation_id,
        };
        match header.kind {
            MessageKind::Call => self.route_request(&header, &mut parameters),
            MessageKind::Oneway => {
                self.oneway.lock().insert(correlation_id);
                self.route_request(&header, &mut parameters);
                self.oneway.lock().remove(&correlation_id);
            }
            MessageKind::Reply => match self.pending.take(header.sequence_number) {
                Some(action) => action.call_answered(&mut parameters),
                None => tracing::warn!(
                    action = %header.name,
                    sequence_number = header.sequence_number,
                    "reply matches no pending call"
                ),
            },
            MessageKind::Exception => match self.pending.take(header.sequence_number) {
                Some(action) => {
                    let mut exception = ApplicationException::default();
                    if !exception.read(&mut parameters.reader) {
                        exception = ApplicationException::protocol_error(format!(
                            "{}: malformed exception reply",
                            header.name
                        ));
                    }
                    action.call_failed(exception);
                }
                None => tracing::warn!(
                    action = %header.name,
                    sequence_number = header.sequence_number,
                    "exception matches no pending call"
                ),
            },
        }
        Ok(())
    }

    fn route_request(&self, header: &MessageHeader, parameters: &mut ActionParameters<'_>) {
        let Some(mut action) = self.registry.create(&header.name) else {
            tracing::warn!(
                action = %header.name,
                sequence_number = header.sequence_number,
                "no action registered"
            );
            if header.kind == MessageKind::Call {
                let exception = ApplicationException::unknown_method(&header.name);
                self.reply_with_exception(
                    &header.name,
                    &exception,
                    parameters.sequence_number,
                    parameters.correlation_id,
                );
            }
            return;
        };
        tracing::debug!(
            action = %header.name,
            sequence_number = header.sequence_number,
            "executing action"
        );
        action.execute(parameters, self);
    }

    /// Sends `exception` as the reply to a request.
    ///
    /// An exception too large for the frame limit is resent with its kind
    /// only, so the caller still learns that the call failed.
    fn reply_with_exception(
        &self,
        action: &str,
        exception: &ApplicationException,
        sequence_number: i32,
        correlation_id: u64,
    ) {
        let Some(mut writer) = self.begin_response(action, MessageKind::Exception, sequence_number)
        else {
            return;
        };
        if exception.write(&mut writer) {
            self.finish_response(writer, correlation_id);
            return;
        }
        tracing::warn!(
            action,
            sequence_number,
            error = ?writer.error(),
            "exception reply too large, sending kind only"
        );

        let Some(mut writer) = self.begin_response(action, MessageKind::Exception, sequence_number)
        else {
            return;
        };
        if ApplicationException::new(exception.kind, String::new()).write(&mut writer) {
            self.finish_response(writer, correlation_id);
        } else {
            tracing::warn!(
                action,
                sequence_number,
                error = ?writer.error(),
                "exception reply cannot be encoded"
            );
        }
    }

    fn push(&self, correlation_id: u64, bytes: Bytes) {
        if self.is_closed() {
            tracing::debug!(correlation_id, "dropping frame sent after close");
            return;
        }
        self.outbox.lock().push_back(Frame {
            correlation_id,
            bytes,
        });
    }
}

impl Dispatcher for LoopbackDispatcher {
    fn begin_outgoing_message(&self, action: &str) -> Option<Writer> {
        if self.is_closed() {
            tracing::debug!(action, "refusing call on closed dispatcher");
            return None;
        }
        Some(Writer::with_limit(self.config.max_message_size))
    }

    fn finish_outgoing_message(
        &self,
        action: &str,
        writer: Writer,
        client_action: Option<Box<dyn ClientAction>>,
    ) {
        let sequence_number = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let kind = if client_action.is_some() {
            MessageKind::Call
        } else {
            MessageKind::Oneway
        };

        let mut frame = Writer::with_limit(self.config.max_message_size);
        MessageHeader::new(action, kind, sequence_number).encode(&mut frame);
        frame.put_bytes(writer.as_bytes());
        if writer.has_errors() || frame.has_errors() || self.is_closed() {
            tracing::debug!(action, sequence_number, "outgoing message not sent");
            if let Some(client_action) = client_action {
                let exception = if self.is_closed() {
                    ApplicationException::unavailable(action)
                } else {
                    ApplicationException::protocol_error(format!(
                        "{action}: message exceeds {} bytes",
                        self.config.max_message_size
                    ))
                };
                client_action.call_failed(exception);
            }
            return;
        }

        if let Some(client_action) = client_action {
            self.pending.insert(sequence_number, client_action);
        }
        let correlation_id = self.next_correlation.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(action, sequence_number, correlation_id, ?kind, "queued request");
        self.push(correlation_id, frame.into_bytes());
    }

    fn begin_response(
        &self,
        action: &str,
        kind: MessageKind,
        sequence_number: i32,
    ) -> Option<Writer> {
        if self.is_closed() {
            return None;
        }
        let mut writer = Writer::with_limit(self.config.max_message_size);
        MessageHeader::new(action, kind, sequence_number).encode(&mut writer);
        Some(writer)
    }

    fn finish_response(&self, writer: Writer, correlation_id: u64) {
        if writer.has_errors() {
            tracing::warn!(correlation_id, error = ?writer.error(), "dropping response");
            return;
        }
        if self.oneway.lock().contains(&correlation_id) {
            tracing::debug!(correlation_id, "dropping response to oneway request");
            return;
        }
        self.push(correlation_id, writer.into_bytes());
    }

    fn send_exception(
        &self,
        action: &str,
        message: &str,
        sequence_number: i32,
        correlation_id: u64,
    ) {
        let exception = ApplicationException::protocol_error(format!("{action}: {message}"));
        self.reply_with_exception(action, &exception, sequence_number, correlation_id);
    }
}

impl std::fmt::Debug for LoopbackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackDispatcher")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("queued", &self.queued())
            .field("pending", &self.pending)
            .field("closed", &self.is_closed())
            .finish()
    }
}
