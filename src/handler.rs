//! Operation handlers and the invocation dispatcher.
//!
//! A provider implements [`ResourceHandler`] for its resource model and the
//! host routes each invocation through [`dispatch`]: one invocation in, one
//! [`ProgressEvent`] out. Handler errors never escape the dispatcher; they
//! are converted into `FAILED` events for the orchestrator.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::error::HandlerError;
use crate::event::ProgressEvent;
use crate::request::InvocationRequest;

/// The operation an invocation asks the provider to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Provision a new resource.
    Create,
    /// Apply the current declared properties to an existing resource.
    Update,
    /// Remove the resource.
    Delete,
    /// Fetch the live state of the resource.
    Read,
    /// Enumerate resources of this type, one page per invocation.
    List,
}

impl Action {
    /// The tag string used on the wire, e.g. `"CREATE"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Read => "READ",
            Self::List => "LIST",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized action tag.
#[derive(Debug, Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(String);

impl std::str::FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "READ" => Ok(Self::Read),
            "LIST" => Ok(Self::List),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Trait that resource provider implementations must implement.
///
/// Each method handles one invocation for the resource model `Model` and
/// yields a [`ProgressEvent`]. Returning `Err` is equivalent to returning a
/// `FAILED` event; the dispatcher performs the conversion so `?` works on
/// request decoding and cloud API calls.
///
/// # Example
///
/// ```ignore
/// use resource_provider_sdk::{
///     Action, HandlerError, InvocationRequest, ProgressEvent, ResourceHandler,
/// };
///
/// struct BucketHandler;
///
/// #[async_trait::async_trait]
/// impl ResourceHandler for BucketHandler {
///     type Model = BucketModel;
///
///     async fn create(
///         &self,
///         request: &InvocationRequest,
///     ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
///         let mut model = BucketModel::default();
///         request.decode_current(&mut model)?;
///         // ... call the cloud API with request.session() ...
///         Ok(ProgressEvent::success(model))
///     }
///
///     // ... update, delete ...
/// }
/// ```
#[async_trait::async_trait]
pub trait ResourceHandler: Send + Sync + 'static {
    /// The strongly-typed resource model the property bodies decode into.
    type Model: Serialize + DeserializeOwned + Send + Sync;

    /// Handle a CREATE invocation.
    async fn create(
        &self,
        request: &InvocationRequest,
    ) -> Result<ProgressEvent<Self::Model>, HandlerError>;

    /// Handle an UPDATE invocation.
    async fn update(
        &self,
        request: &InvocationRequest,
    ) -> Result<ProgressEvent<Self::Model>, HandlerError>;

    /// Handle a DELETE invocation. Success conventionally carries no model.
    async fn delete(
        &self,
        request: &InvocationRequest,
    ) -> Result<ProgressEvent<Self::Model>, HandlerError>;

    /// Handle a READ invocation.
    async fn read(
        &self,
        request: &InvocationRequest,
    ) -> Result<ProgressEvent<Self::Model>, HandlerError> {
        let _ = request;
        Err(HandlerError::invalid_request(
            "READ is not supported by this resource type",
        ))
    }

    /// Handle a LIST invocation. Pagination state arrives via
    /// `request.request_context().next_token` and leaves via
    /// [`ProgressEvent::success_list`].
    async fn list(
        &self,
        request: &InvocationRequest,
    ) -> Result<ProgressEvent<Self::Model>, HandlerError> {
        let _ = request;
        Err(HandlerError::invalid_request(
            "LIST is not supported by this resource type",
        ))
    }
}

/// Route one invocation to the handler for `action` and return its outcome.
///
/// This is the single entry point the host calls per invocation. A handler
/// error is logged and surfaced as a `FAILED` event rather than propagated.
#[instrument(skip(handler, request), fields(logical_resource_id = %request.logical_resource_id()))]
pub async fn dispatch<H: ResourceHandler>(
    handler: &H,
    action: Action,
    request: &InvocationRequest,
) -> ProgressEvent<H::Model> {
    info!(action = %action, "Invoking handler");

    let result = match action {
        Action::Create => handler.create(request).await,
        Action::Update => handler.update(request).await,
        Action::Delete => handler.delete(request).await,
        Action::Read => handler.read(request).await,
        Action::List => handler.list(request).await,
    };

    match result {
        Ok(event) => {
            info!(action = %action, status = ?event.status(), "Handler completed");
            event
        }
        Err(e) => {
            error!(action = %action, error = %e, "Handler failed");
            e.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CallbackContext;
    use crate::error::ErrorCode;
    use crate::request::{RequestContext, Session};

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct BucketModel {
        #[serde(rename = "Name")]
        name: String,
    }

    struct BucketHandler;

    #[async_trait::async_trait]
    impl ResourceHandler for BucketHandler {
        type Model = BucketModel;

        async fn create(
            &self,
            request: &InvocationRequest,
        ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
            let mut model = BucketModel::default();
            request.decode_current(&mut model)?;
            Ok(ProgressEvent::success(model))
        }

        async fn update(
            &self,
            request: &InvocationRequest,
        ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
            let mut model = BucketModel::default();
            request.decode_current(&mut model)?;
            Ok(ProgressEvent::success(model))
        }

        async fn delete(
            &self,
            _request: &InvocationRequest,
        ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
            Ok(ProgressEvent::success_no_model())
        }
    }

    fn request_with_current(body: &[u8]) -> InvocationRequest {
        InvocationRequest::new(
            "MyBucket",
            CallbackContext::new(),
            RequestContext::default(),
            Session::default(),
            Vec::new(),
            body.to_vec(),
            Vec::new(),
        )
    }

    #[test]
    fn test_action_tags() {
        assert_eq!(Action::Create.as_str(), "CREATE");
        assert_eq!("LIST".parse::<Action>().unwrap(), Action::List);
        assert!("DESTROY".parse::<Action>().is_err());
        assert_eq!(
            serde_json::to_value(Action::Delete).unwrap(),
            serde_json::json!("DELETE")
        );
    }

    #[tokio::test]
    async fn test_dispatch_create_success() {
        let request = request_with_current(br#"{"Name":"bucket1"}"#);
        let event = dispatch(&BucketHandler, Action::Create, &request).await;
        assert_eq!(
            event,
            ProgressEvent::success(BucketModel {
                name: "bucket1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_dispatch_converts_handler_error_to_failed() {
        // Empty current body makes decode_current fail inside the handler;
        // the dispatcher must emit FAILED, not propagate.
        let request = request_with_current(b"");
        let event = dispatch(&BucketHandler, Action::Create, &request).await;
        match event {
            ProgressEvent::Failed {
                error_code,
                message,
            } => {
                assert_eq!(error_code, ErrorCode::BodyEmpty);
                assert!(message.contains("resource properties"));
            }
            other => panic!("expected FAILED event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_delete_success_has_no_model() {
        let request = request_with_current(b"");
        let event = dispatch(&BucketHandler, Action::Delete, &request).await;
        assert_eq!(event, ProgressEvent::success_no_model());
    }

    #[tokio::test]
    async fn test_unimplemented_read_and_list_fail() {
        let request = request_with_current(br#"{"Name":"bucket1"}"#);

        for action in [Action::Read, Action::List] {
            let event = dispatch(&BucketHandler, action, &request).await;
            match event {
                ProgressEvent::Failed { error_code, .. } => {
                    assert_eq!(error_code, ErrorCode::InvalidRequest);
                }
                other => panic!("expected FAILED event, got {:?}", other),
            }
        }
    }
}
