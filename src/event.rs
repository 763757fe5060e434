//! Progress events: the outcome of one handler invocation.
//!
//! A handler invocation produces exactly one [`ProgressEvent`], which is
//! terminal data: it is serialized outward to the orchestrator or consumed
//! by the continuation protocol, never mutated.

use serde::{Deserialize, Serialize};

use crate::encoding::CallbackContext;
use crate::error::{ErrorCode, HandlerError, RequestError};

/// The lifecycle states of a single invocation.
///
/// `Pending` is the implicit initial state before the handler has produced
/// an event; an invocation always moves from it to exactly one of the other
/// three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    /// No event produced yet.
    Pending,
    /// The operation needs a follow-up invocation to continue.
    InProgress,
    /// Terminal: the operation completed.
    Success,
    /// Terminal: the operation failed.
    Failed,
}

/// The outcome of one handler invocation for a resource of model type `M`.
///
/// This is a closed sum type so handler and host code must account for all
/// three outcomes. Serialization follows the orchestrator contract:
/// `{status, resourceModel?, resourceModels?, nextToken?, errorCode?,
/// message?, callbackContext?, callbackDelaySeconds?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ProgressEvent<M> {
    /// The operation completed. `resource_model` is the resulting resource
    /// state, conventionally absent for DELETE; `resource_models` and
    /// `next_token` carry LIST results and their pagination continuation.
    #[serde(rename = "SUCCESS", rename_all = "camelCase")]
    Success {
        /// The resulting resource state, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resource_model: Option<M>,
        /// Resource states returned by LIST.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        resource_models: Vec<M>,
        /// Pagination token for the next LIST invocation, if more results
        /// remain.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_token: Option<String>,
    },

    /// The operation failed with a classified, non-retryable error.
    #[serde(rename = "FAILED", rename_all = "camelCase")]
    Failed {
        /// The error classification tag.
        error_code: ErrorCode,
        /// Human-readable failure message.
        message: String,
    },

    /// The operation is still running. The orchestrator re-invokes the
    /// handler after the delay, passing `callback_context` verbatim as the
    /// next invocation's callback context.
    #[serde(rename = "IN_PROGRESS", rename_all = "camelCase")]
    InProgress {
        /// State the handler needs to resume; the request carries no other
        /// memory between invocations.
        #[serde(default)]
        callback_context: CallbackContext,
        /// How long the orchestrator should wait before re-invoking.
        callback_delay_seconds: u64,
        /// Optional partial resource state for intermediate reporting.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resource_model: Option<M>,
    },
}

impl<M> ProgressEvent<M> {
    /// A success event carrying the resulting resource state.
    pub fn success(model: M) -> Self {
        Self::Success {
            resource_model: Some(model),
            resource_models: Vec::new(),
            next_token: None,
        }
    }

    /// A success event with no resulting state (the DELETE convention).
    pub fn success_no_model() -> Self {
        Self::Success {
            resource_model: None,
            resource_models: Vec::new(),
            next_token: None,
        }
    }

    /// A LIST success carrying a page of models and, if more remain, the
    /// token the orchestrator threads into the next LIST invocation.
    pub fn success_list(models: Vec<M>, next_token: Option<String>) -> Self {
        Self::Success {
            resource_model: None,
            resource_models: models,
            next_token,
        }
    }

    /// A failure event with the given classification and message.
    pub fn failed(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Failed {
            error_code,
            message: message.into(),
        }
    }

    /// An in-progress event. The callback context must contain everything
    /// the handler needs to resume (for example a provider-assigned
    /// identifier); an empty context means the next invocation starts with
    /// no memory of this one.
    ///
    /// The delay is taken in whole seconds, the unit the orchestrator
    /// schedules with; `0` asks for an immediate re-invocation.
    pub fn in_progress(
        callback_context: CallbackContext,
        delay_seconds: u64,
        resource_model: Option<M>,
    ) -> Self {
        Self::InProgress {
            callback_context,
            callback_delay_seconds: delay_seconds,
            resource_model,
        }
    }

    /// The status tag of this event.
    pub fn status(&self) -> OperationStatus {
        match self {
            Self::Success { .. } => OperationStatus::Success,
            Self::Failed { .. } => OperationStatus::Failed,
            Self::InProgress { .. } => OperationStatus::InProgress,
        }
    }

    /// Whether this event ends the operation (no further invocations).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress { .. })
    }
}

impl<M> From<HandlerError> for ProgressEvent<M> {
    fn from(err: HandlerError) -> Self {
        Self::Failed {
            error_code: err.code(),
            message: err.message().to_string(),
        }
    }
}

impl<M> From<RequestError> for ProgressEvent<M> {
    fn from(err: RequestError) -> Self {
        Self::Failed {
            error_code: err.code(),
            message: err.to_string(),
        }
    }
}
