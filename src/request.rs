//! Invocation request and context types.
//!
//! One [`InvocationRequest`] is constructed per invocation from the
//! orchestrator-supplied primitives and is immutable afterwards. The three
//! property bodies are stored as raw bytes and decoded lazily through the
//! [`crate::encoding`] codec, so re-decoding is always safe and side-effect
//! free on the request itself.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::encoding::{self, CallbackContext};
use crate::error::RequestError;

/// Information about the current invocation of the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    /// The ID of the stack the resource belongs to.
    pub stack_id: String,
    /// The region of the requester.
    pub region: String,
    /// The account ID of the requester.
    pub account_id: String,
    /// Tags associated with the stack.
    pub stack_tags: HashMap<String, String>,
    /// System tags associated with the request.
    pub system_tags: HashMap<String, String>,
    /// Pagination token carried on LIST invocations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// An authenticated handle to the cloud provider.
///
/// Establishing the session is the host's responsibility; the SDK treats the
/// credentials as opaque. A session is valid for the lifetime of a single
/// invocation and is never shared across invocations.
#[derive(Debug, Clone, Default)]
pub struct Session {
    region: String,
    credentials: serde_json::Value,
}

impl Session {
    /// Create a session for the given region with opaque credentials.
    pub fn new(region: impl Into<String>, credentials: serde_json::Value) -> Self {
        Self {
            region: region.into(),
            credentials,
        }
    }

    /// The region this session is authenticated against.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The opaque provider credentials.
    pub fn credentials(&self) -> &serde_json::Value {
        &self.credentials
    }
}

/// The request passed to operation handlers, carrying the declared resource
/// states and invocation context.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    logical_resource_id: String,
    callback_context: CallbackContext,
    request_context: RequestContext,
    session: Session,
    pub(crate) previous_properties_body: Vec<u8>,
    pub(crate) current_properties_body: Vec<u8>,
    pub(crate) type_configuration_body: Vec<u8>,
}

impl InvocationRequest {
    /// Construct a request from orchestrator-supplied primitives.
    ///
    /// The callback context is the mapping attached to the previous
    /// `IN_PROGRESS` outcome for this resource, or empty on the first
    /// invocation. The property bodies are stored as-is and decoded on
    /// demand.
    pub fn new(
        logical_resource_id: impl Into<String>,
        callback_context: CallbackContext,
        request_context: RequestContext,
        session: Session,
        previous_properties_body: Vec<u8>,
        current_properties_body: Vec<u8>,
        type_configuration_body: Vec<u8>,
    ) -> Self {
        Self {
            logical_resource_id: logical_resource_id.into(),
            callback_context,
            request_context,
            session,
            previous_properties_body,
            current_properties_body,
            type_configuration_body,
        }
    }

    /// The logical ID of the resource within its stack, stable across
    /// retries of the same resource.
    pub fn logical_resource_id(&self) -> &str {
        &self.logical_resource_id
    }

    /// State carried over from the previous `IN_PROGRESS` outcome.
    pub fn callback_context(&self) -> &CallbackContext {
        &self.callback_context
    }

    /// Context for the current invocation.
    pub fn request_context(&self) -> &RequestContext {
        &self.request_context
    }

    /// The authenticated session for this invocation.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Decode the previous declared properties into `target`.
    ///
    /// An empty body succeeds and leaves the target untouched: CREATE
    /// legitimately has no prior state.
    pub fn decode_previous<T: DeserializeOwned>(&self, target: &mut T) -> Result<(), RequestError> {
        if self.previous_properties_body.is_empty() {
            return Ok(());
        }
        encoding::decode_into(&self.previous_properties_body, target)
    }

    /// Decode the current declared properties into `target`.
    ///
    /// Fails with [`crate::ErrorCode::BodyEmpty`] if the body is absent.
    pub fn decode_current<T: DeserializeOwned>(&self, target: &mut T) -> Result<(), RequestError> {
        if self.current_properties_body.is_empty() {
            return Err(RequestError::BodyEmpty("resource properties"));
        }
        encoding::decode_into(&self.current_properties_body, target)
    }

    /// Decode the provider-level type configuration into `target`.
    ///
    /// Fails with [`crate::ErrorCode::BodyEmpty`] if the body is absent;
    /// configuration is expected whenever it is requested.
    pub fn decode_type_configuration<T: DeserializeOwned>(
        &self,
        target: &mut T,
    ) -> Result<(), RequestError> {
        if self.type_configuration_body.is_empty() {
            return Err(RequestError::BodyEmpty("type configuration"));
        }
        encoding::decode_into(&self.type_configuration_body, target)
    }
}
