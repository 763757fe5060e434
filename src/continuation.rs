//! The continuation protocol for long-running operations.
//!
//! An `IN_PROGRESS` event carries a callback context and a delay hint. The
//! orchestrator waits out the delay and re-invokes the provider, passing the
//! context verbatim as the next invocation's callback context. This module
//! implements that threading rule; it enforces no bound on the number of
//! cycles, which is orchestrator policy.

use std::time::Duration;

use crate::encoding::{self, CallbackContext};
use crate::error::RequestError;
use crate::event::ProgressEvent;
use crate::request::{InvocationRequest, Session};

/// The resumable part of an `IN_PROGRESS` progress event.
#[derive(Debug, Clone, PartialEq)]
pub struct Continuation {
    /// The state to hand to the next invocation.
    pub callback_context: CallbackContext,
    /// How long the orchestrator should wait before re-invoking.
    pub delay: Duration,
}

impl Continuation {
    /// Extract the continuation from an event, if it has one.
    ///
    /// Terminal events yield `None`: there is nothing to resume.
    pub fn of<M>(event: &ProgressEvent<M>) -> Option<Self> {
        match event {
            ProgressEvent::InProgress {
                callback_context,
                callback_delay_seconds,
                ..
            } => Some(Self {
                callback_context: callback_context.clone(),
                delay: Duration::from_secs(*callback_delay_seconds),
            }),
            ProgressEvent::Success { .. } | ProgressEvent::Failed { .. } => None,
        }
    }
}

/// Build the follow-up invocation request for an `IN_PROGRESS` outcome.
///
/// The new request targets the same logical resource with the same request
/// context and property bodies; only the callback context and the session
/// change. Each invocation gets its own freshly authenticated `session`,
/// supplied by the host. Terminal events yield `Ok(None)`.
///
/// The callback context is passed through a wire-format round trip before it
/// lands on the next request, so a context that would not survive the hop to
/// the orchestrator is rejected here with a `Marshaling` error instead of
/// resurfacing later as silent state loss.
pub fn next_request<M>(
    prior: &InvocationRequest,
    event: &ProgressEvent<M>,
    session: Session,
) -> Result<Option<InvocationRequest>, RequestError> {
    let continuation = match Continuation::of(event) {
        Some(c) => c,
        None => return Ok(None),
    };

    let bytes = encoding::encode(&continuation.callback_context)?;
    let mut callback_context = CallbackContext::new();
    encoding::decode_into(&bytes, &mut callback_context)?;

    Ok(Some(InvocationRequest::new(
        prior.logical_resource_id(),
        callback_context,
        prior.request_context().clone(),
        session,
        prior.previous_properties_body.clone(),
        prior.current_properties_body.clone(),
        prior.type_configuration_body.clone(),
    )))
}
