//! Error types for the resource provider SDK.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error-kind tags surfaced to the orchestrator on a `FAILED` progress event.
///
/// `BodyEmpty` and `Marshaling` are produced by the SDK itself when a
/// property body cannot be decoded; the remaining codes are reported by
/// operation handlers to classify provisioning failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A required property body was absent from the invocation.
    BodyEmpty,
    /// A present property body failed structural decode into the requested model.
    Marshaling,
    /// The resource does not exist.
    NotFound,
    /// The resource already exists (create conflict).
    AlreadyExists,
    /// The invocation or declared properties are invalid.
    InvalidRequest,
    /// The session is not authorized for the attempted call.
    AccessDenied,
    /// The cloud API throttled the request.
    Throttling,
    /// A service quota would be exceeded.
    ServiceLimitExceeded,
    /// The resource did not reach a stable state in time.
    NotStabilized,
    /// The resource is being modified by another process.
    ResourceConflict,
    /// A network error occurred while calling the cloud API.
    NetworkFailure,
    /// The downstream service reported an internal error.
    ServiceInternalError,
    /// An unexpected error inside the handler.
    InternalFailure,
}

impl ErrorCode {
    /// The tag string used on the wire, e.g. `"BodyEmpty"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BodyEmpty => "BodyEmpty",
            Self::Marshaling => "Marshaling",
            Self::NotFound => "NotFound",
            Self::AlreadyExists => "AlreadyExists",
            Self::InvalidRequest => "InvalidRequest",
            Self::AccessDenied => "AccessDenied",
            Self::Throttling => "Throttling",
            Self::ServiceLimitExceeded => "ServiceLimitExceeded",
            Self::NotStabilized => "NotStabilized",
            Self::ResourceConflict => "ResourceConflict",
            Self::NetworkFailure => "NetworkFailure",
            Self::ServiceInternalError => "ServiceInternalError",
            Self::InternalFailure => "InternalFailure",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while decoding property bodies from an invocation request.
///
/// Both variants are non-retryable: they indicate a malformed invocation or a
/// mismatch between the declared and actual model shape, and must be surfaced
/// as a `FAILED` progress event rather than silently retried.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A required body was absent. The payload names which body.
    #[error("{0} body is empty")]
    BodyEmpty(&'static str),

    /// A present body could not be decoded into the requested model.
    /// The original decode failure is preserved as the source.
    #[error("unable to convert type: {0}")]
    Marshaling(#[from] serde_json::Error),
}

impl RequestError {
    /// The wire tag for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::BodyEmpty(_) => ErrorCode::BodyEmpty,
            Self::Marshaling(_) => ErrorCode::Marshaling,
        }
    }
}

/// A classified failure reported by an operation handler.
///
/// The dispatcher converts this into a `FAILED` progress event carrying the
/// code and message. The optional source is kept for diagnostics only and
/// does not cross the orchestrator boundary.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct HandlerError {
    code: ErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HandlerError {
    /// Create a handler error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a handler error wrapping an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Shorthand for [`ErrorCode::AlreadyExists`].
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyExists, message)
    }

    /// Shorthand for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Shorthand for [`ErrorCode::NotStabilized`].
    pub fn not_stabilized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotStabilized, message)
    }

    /// Shorthand for [`ErrorCode::ServiceInternalError`].
    pub fn service_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceInternalError, message)
    }

    /// The error classification.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<RequestError> for HandlerError {
    fn from(err: RequestError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
