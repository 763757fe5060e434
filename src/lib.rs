//! Resource Provider SDK
//!
//! This crate implements the invocation lifecycle for custom resource
//! providers driven by a stack orchestration service. The orchestrator
//! issues discrete CREATE/UPDATE/DELETE/READ/LIST invocations for a managed
//! resource; the provider answers each with exactly one progress event:
//! success with a resulting resource state, failure with an error
//! classification, or in-progress with an opaque continuation the
//! orchestrator threads into the next invocation.
//!
//! # Overview
//!
//! The SDK provides:
//!
//! - **[`InvocationRequest`]**: the immutable per-invocation value carrying
//!   the previous/current declared properties as raw bodies, decoded on
//!   demand into caller-defined models
//! - **[`ProgressEvent`]**: the closed three-variant outcome of one handler
//!   invocation, with the orchestrator wire shape
//! - **[`ResourceHandler`] trait**: the operations a provider implements,
//!   routed by [`dispatch`]
//! - **Continuation protocol**: [`continuation::next_request`] threads an
//!   `IN_PROGRESS` callback context into the follow-up request
//! - **Error types**: the [`ErrorCode`] taxonomy crossing the orchestrator
//!   boundary
//! - **Logging**: integration with `tracing` for structured logging
//! - **Testing**: an in-process orchestrator simulator in [`testing`]
//!
//! # Quick Start
//!
//! ```ignore
//! use resource_provider_sdk::{
//!     dispatch, Action, HandlerError, InvocationRequest, ProgressEvent,
//!     ResourceHandler,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct BucketModel {
//!     #[serde(rename = "Name")]
//!     name: String,
//! }
//!
//! struct BucketHandler;
//!
//! #[async_trait::async_trait]
//! impl ResourceHandler for BucketHandler {
//!     type Model = BucketModel;
//!
//!     async fn create(
//!         &self,
//!         request: &InvocationRequest,
//!     ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
//!         let mut model = BucketModel::default();
//!         request.decode_current(&mut model)?;
//!         // ... call the cloud API with request.session() ...
//!         Ok(ProgressEvent::success(model))
//!     }
//!
//!     async fn update(
//!         &self,
//!         request: &InvocationRequest,
//!     ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
//!         let mut model = BucketModel::default();
//!         request.decode_current(&mut model)?;
//!         Ok(ProgressEvent::success(model))
//!     }
//!
//!     async fn delete(
//!         &self,
//!         _request: &InvocationRequest,
//!     ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
//!         Ok(ProgressEvent::success_no_model())
//!     }
//! }
//!
//! # async fn host(request: InvocationRequest) {
//! let event = dispatch(&BucketHandler, Action::Create, &request).await;
//! // serialize `event` back to the orchestrator
//! # }
//! ```
//!
//! # Long-Running Operations
//!
//! A handler waiting on a slow cloud operation returns
//! [`ProgressEvent::in_progress`] with a callback context holding everything
//! it needs to resume (typically the provider-assigned identifier) and a
//! delay hint. The orchestrator waits out the delay and re-invokes; the
//! context arrives verbatim on the next request's
//! [`InvocationRequest::callback_context`]. The request carries no other
//! memory between invocations.
//!
//! # Scope
//!
//! Establishing the authenticated session, transporting the invocation
//! event, and the concrete cloud SDK calls a provider makes are the host's
//! and the provider's business. This crate defines the envelope and control
//! protocol around them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod continuation;
pub mod encoding;
pub mod error;
pub mod event;
pub mod handler;
pub mod logging;
pub mod request;
pub mod testing;

// Re-export main types at crate root
pub use continuation::{next_request, Continuation};
pub use encoding::CallbackContext;
pub use error::{ErrorCode, HandlerError, RequestError};
pub use event::{OperationStatus, ProgressEvent};
pub use handler::{dispatch, Action, ResourceHandler, UnknownAction};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use request::{InvocationRequest, RequestContext, Session};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
