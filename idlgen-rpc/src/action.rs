//! Action and dispatcher traits.

use idlgen_core::{MessageKind, Reader, Writer};

use crate::exception::ApplicationException;

/// Decoding context handed to an action for one incoming message.
#[derive(Debug)]
pub struct ActionParameters<'a> {
    /// Reader positioned at the message body.
    pub reader: Reader<'a>,
    /// Sequence number from the message header, echoed in the reply.
    pub sequence_number: i32,
    /// Transport token identifying where a reply must go.
    pub correlation_id: u64,
}

/// Transport seen by generated actions.
///
/// Every `begin_*` method may refuse by returning `None`, for example once
/// the transport is closed.
pub trait Dispatcher: Send + Sync {
    /// Starts an outgoing request body for `action`.
    fn begin_outgoing_message(&self, action: &str) -> Option<Writer>;

    /// Sends a request started with [`Dispatcher::begin_outgoing_message`].
    ///
    /// With a client action the message is a call and the action receives
    /// the reply. Without one the message is one-way.
    ///
    /// # Arguments
    /// * `action` - Action name
    /// * `writer` - Encoded request body
    /// * `client_action` - Pending completion, `None` for one-way calls
    fn finish_outgoing_message(
        &self,
        action: &str,
        writer: Writer,
        client_action: Option<Box<dyn ClientAction>>,
    );

    /// Starts a response to the request with `sequence_number`.
    fn begin_response(
        &self,
        action: &str,
        kind: MessageKind,
        sequence_number: i32,
    ) -> Option<Writer>;

    /// Sends a response started with [`Dispatcher::begin_response`].
    fn finish_response(&self, writer: Writer, correlation_id: u64);

    /// Replies to a request with an application exception.
    ///
    /// # Arguments
    /// * `action` - Action name
    /// * `message` - Human readable reason
    /// * `sequence_number` - Sequence number of the failed request
    /// * `correlation_id` - Transport token of the failed request
    fn send_exception(
        &self,
        action: &str,
        message: &str,
        sequence_number: i32,
        correlation_id: u64,
    );
}

/// Server side of one function, created per incoming request.
pub trait Action: Send {
    /// Action name the action is registered under.
    fn name(&self) -> &'static str;

    /// Decodes the arguments, calls the handler and sends the reply.
    fn execute(&mut self, parameters: &mut ActionParameters<'_>, dispatcher: &dyn Dispatcher);
}

/// Client side of one outstanding call.
///
/// Completion consumes the action, so exactly one of the two methods runs.
pub trait ClientAction: Send {
    /// Action name of the call.
    fn name(&self) -> &'static str;

    /// Called with the reply body.
    fn call_answered(self: Box<Self>, parameters: &mut ActionParameters<'_>);

    /// Called when the call failed before a reply could be decoded.
    fn call_failed(self: Box<Self>, exception: ApplicationException);
}
