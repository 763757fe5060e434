//! Testing utilities for provider implementations.
//!
//! This module provides a request builder and an in-process orchestrator
//! simulator so `ResourceHandler` implementations can be exercised through
//! complete invocation cycles without a control plane.
//!
//! # Example
//!
//! ```ignore
//! use resource_provider_sdk::testing::{Orchestrator, RequestBuilder};
//! use resource_provider_sdk::Action;
//!
//! #[tokio::test]
//! async fn test_create_stabilizes() {
//!     let request = RequestBuilder::new("MyBucket")
//!         .with_current_body(br#"{"Name":"bucket1"}"#.to_vec())
//!         .build();
//!
//!     let report = Orchestrator::new(MyHandler::new())
//!         .run(Action::Create, request)
//!         .await
//!         .unwrap();
//!
//!     assert!(report.final_event.is_terminal());
//! }
//! ```

use std::time::Duration;

use serde::Serialize;

use crate::continuation::{next_request, Continuation};
use crate::encoding::{self, CallbackContext};
use crate::error::{ErrorCode, RequestError};
use crate::event::ProgressEvent;
use crate::handler::{dispatch, Action, ResourceHandler};
use crate::request::{InvocationRequest, RequestContext, Session};

/// Builder for assembling invocation requests in tests.
///
/// All parts default to empty; set only what the scenario needs.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    logical_resource_id: String,
    callback_context: CallbackContext,
    request_context: RequestContext,
    session: Session,
    previous_body: Vec<u8>,
    current_body: Vec<u8>,
    type_configuration_body: Vec<u8>,
}

impl RequestBuilder {
    /// Start a request for the given logical resource ID.
    pub fn new(logical_resource_id: impl Into<String>) -> Self {
        Self {
            logical_resource_id: logical_resource_id.into(),
            ..Default::default()
        }
    }

    /// Set the callback context (resuming a prior `IN_PROGRESS` outcome).
    pub fn with_callback_context(mut self, callback_context: CallbackContext) -> Self {
        self.callback_context = callback_context;
        self
    }

    /// Set the request context.
    pub fn with_request_context(mut self, request_context: RequestContext) -> Self {
        self.request_context = request_context;
        self
    }

    /// Set the session handle.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Set the raw previous-properties body.
    pub fn with_previous_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.previous_body = body.into();
        self
    }

    /// Set the raw current-properties body.
    pub fn with_current_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.current_body = body.into();
        self
    }

    /// Set the raw type-configuration body.
    pub fn with_type_configuration_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.type_configuration_body = body.into();
        self
    }

    /// Encode a model as the current-properties body.
    ///
    /// # Panics
    ///
    /// Panics if the model does not serialize.
    pub fn with_current_model<T: Serialize>(self, model: &T) -> Self {
        let body = encoding::encode(model).expect("model must serialize");
        self.with_current_body(body)
    }

    /// Encode a model as the previous-properties body.
    ///
    /// # Panics
    ///
    /// Panics if the model does not serialize.
    pub fn with_previous_model<T: Serialize>(self, model: &T) -> Self {
        let body = encoding::encode(model).expect("model must serialize");
        self.with_previous_body(body)
    }

    /// Build the immutable invocation request.
    pub fn build(self) -> InvocationRequest {
        InvocationRequest::new(
            self.logical_resource_id,
            self.callback_context,
            self.request_context,
            self.session,
            self.previous_body,
            self.current_body,
            self.type_configuration_body,
        )
    }
}

/// What a simulated orchestrator run observed.
#[derive(Debug)]
pub struct RunReport<M> {
    /// The last event the handler produced. Terminal unless the invocation
    /// budget ran out first.
    pub final_event: ProgressEvent<M>,
    /// How many times the handler was invoked.
    pub invocations: usize,
    /// The delay hint attached to each `IN_PROGRESS` event, in order.
    pub delays: Vec<Duration>,
}

/// An in-process orchestrator simulator.
///
/// Drives a handler through dispatch → continuation cycles until a terminal
/// event or the invocation budget is exhausted. Delay hints are recorded in
/// the report rather than slept on, and each cycle gets a fresh session
/// handle, mirroring the real control plane's sequencing without the clock.
pub struct Orchestrator<H: ResourceHandler> {
    handler: H,
    max_invocations: usize,
}

impl<H: ResourceHandler> Orchestrator<H> {
    /// Create a simulator around the given handler with a budget of 16
    /// invocations per run.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            max_invocations: 16,
        }
    }

    /// Set the invocation budget for a run.
    pub fn with_max_invocations(mut self, max_invocations: usize) -> Self {
        self.max_invocations = max_invocations;
        self
    }

    /// Get a reference to the underlying handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Run one logical operation to completion.
    ///
    /// Invokes the handler, and while it reports `IN_PROGRESS`, threads the
    /// callback context into the next request and invokes again, up to the
    /// budget. The returned report carries the last event either way;
    /// callers assert on [`ProgressEvent::is_terminal`] when the budget
    /// matters.
    pub async fn run(
        &self,
        action: Action,
        request: InvocationRequest,
    ) -> Result<RunReport<H::Model>, RequestError> {
        let mut request = request;
        let mut invocations = 0;
        let mut delays = Vec::new();

        loop {
            invocations += 1;
            let event = dispatch(&self.handler, action, &request).await;

            if let Some(continuation) = Continuation::of(&event) {
                delays.push(continuation.delay);
            }

            let session = Session::new(
                request.session().region(),
                request.session().credentials().clone(),
            );
            match next_request(&request, &event, session)? {
                Some(next) if invocations < self.max_invocations => request = next,
                _ => {
                    return Ok(RunReport {
                        final_event: event,
                        invocations,
                        delays,
                    })
                }
            }
        }
    }
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that an event is `SUCCESS` and return its resulting model, if any.
///
/// # Panics
///
/// Panics if the event is not a success.
pub fn assert_success<M: std::fmt::Debug>(event: ProgressEvent<M>) -> Option<M> {
    match event {
        ProgressEvent::Success { resource_model, .. } => resource_model,
        other => panic!("expected SUCCESS event, got {:?}", other),
    }
}

/// Assert that an event is `FAILED` with the given error code and return its
/// message.
///
/// # Panics
///
/// Panics if the event is not a failure or carries a different code.
pub fn assert_failed_with<M: std::fmt::Debug>(event: ProgressEvent<M>, code: ErrorCode) -> String {
    match event {
        ProgressEvent::Failed {
            error_code,
            message,
        } => {
            assert_eq!(
                error_code, code,
                "expected FAILED with {}, got {} ({})",
                code, error_code, message
            );
            message
        }
        other => panic!("expected FAILED event, got {:?}", other),
    }
}

/// Assert that an event is `IN_PROGRESS` and return its continuation.
///
/// # Panics
///
/// Panics if the event is terminal.
pub fn assert_in_progress<M: std::fmt::Debug>(event: &ProgressEvent<M>) -> Continuation {
    match Continuation::of(event) {
        Some(continuation) => continuation,
        None => panic!("expected IN_PROGRESS event, got {:?}", event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct BucketModel {
        #[serde(rename = "Name")]
        name: String,
    }

    /// Succeeds on the invocation after the callback context reports two
    /// completed polls; state lives entirely in the callback context.
    struct StabilizingHandler;

    impl StabilizingHandler {
        fn step(
            &self,
            request: &InvocationRequest,
        ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
            let mut model = BucketModel::default();
            request.decode_current(&mut model)?;

            let polls = request
                .callback_context()
                .get("polls")
                .and_then(|v| v.as_u64())
                .unwrap_or(0);

            if polls < 2 {
                let mut ctx = CallbackContext::new();
                ctx.insert("resourceId".to_string(), json!("b-123"));
                ctx.insert("polls".to_string(), json!(polls + 1));
                return Ok(ProgressEvent::in_progress(ctx, 30, None));
            }

            Ok(ProgressEvent::success(model))
        }
    }

    #[async_trait::async_trait]
    impl ResourceHandler for StabilizingHandler {
        type Model = BucketModel;

        async fn create(
            &self,
            request: &InvocationRequest,
        ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
            self.step(request)
        }

        async fn update(
            &self,
            request: &InvocationRequest,
        ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
            self.step(request)
        }

        async fn delete(
            &self,
            _request: &InvocationRequest,
        ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
            Ok(ProgressEvent::success_no_model())
        }

        async fn list(
            &self,
            request: &InvocationRequest,
        ) -> Result<ProgressEvent<BucketModel>, HandlerError> {
            // One page per invocation, driven by the orchestrator's token.
            match request.request_context().next_token.as_deref() {
                None => Ok(ProgressEvent::success_list(
                    vec![BucketModel {
                        name: "a".to_string(),
                    }],
                    Some("page-2".to_string()),
                )),
                Some("page-2") => Ok(ProgressEvent::success_list(
                    vec![BucketModel {
                        name: "b".to_string(),
                    }],
                    None,
                )),
                Some(other) => Err(HandlerError::invalid_request(format!(
                    "unknown page token: {}",
                    other
                ))),
            }
        }
    }

    fn create_request() -> InvocationRequest {
        RequestBuilder::new("MyBucket")
            .with_current_model(&BucketModel {
                name: "bucket1".to_string(),
            })
            .with_session(Session::new("us-east-1", json!({"token": "t"})))
            .build()
    }

    #[tokio::test]
    async fn test_stabilization_terminates_after_three_invocations() {
        let report = Orchestrator::new(StabilizingHandler)
            .run(Action::Create, create_request())
            .await
            .unwrap();

        assert_eq!(report.invocations, 3);
        assert_eq!(
            report.delays,
            vec![Duration::from_secs(30), Duration::from_secs(30)]
        );
        let model = assert_success(report.final_event).unwrap();
        assert_eq!(model.name, "bucket1");
    }

    #[tokio::test]
    async fn test_invocation_budget_stops_the_loop() {
        let report = Orchestrator::new(StabilizingHandler)
            .with_max_invocations(2)
            .run(Action::Create, create_request())
            .await
            .unwrap();

        assert_eq!(report.invocations, 2);
        assert!(!report.final_event.is_terminal());
        let continuation = assert_in_progress(&report.final_event);
        assert_eq!(continuation.callback_context["polls"], json!(2));
    }

    #[tokio::test]
    async fn test_failed_event_ends_the_run() {
        // Empty current body fails decode on the first invocation.
        let request = RequestBuilder::new("MyBucket").build();
        let report = Orchestrator::new(StabilizingHandler)
            .run(Action::Create, request)
            .await
            .unwrap();

        assert_eq!(report.invocations, 1);
        let message = assert_failed_with(report.final_event, ErrorCode::BodyEmpty);
        assert!(message.contains("resource properties"));
    }

    #[tokio::test]
    async fn test_list_pagination_round() {
        let orchestrator = Orchestrator::new(StabilizingHandler);

        let first = orchestrator
            .run(Action::List, RequestBuilder::new("MyBucket").build())
            .await
            .unwrap();
        let next_token = match &first.final_event {
            ProgressEvent::Success { next_token, .. } => next_token.clone(),
            other => panic!("expected SUCCESS event, got {:?}", other),
        };
        assert_eq!(next_token.as_deref(), Some("page-2"));

        // The orchestrator re-drives LIST with the token; no delay timer.
        let second_request = RequestBuilder::new("MyBucket")
            .with_request_context(RequestContext {
                next_token,
                ..Default::default()
            })
            .build();
        let second = orchestrator
            .run(Action::List, second_request)
            .await
            .unwrap();
        match second.final_event {
            ProgressEvent::Success {
                resource_models,
                next_token,
                ..
            } => {
                assert_eq!(resource_models.len(), 1);
                assert!(next_token.is_none());
            }
            other => panic!("expected SUCCESS event, got {:?}", other),
        }
    }

    #[test]
    fn test_request_builder_defaults() {
        let request = RequestBuilder::new("MyBucket").build();
        assert_eq!(request.logical_resource_id(), "MyBucket");
        assert!(request.callback_context().is_empty());

        let mut model = BucketModel::default();
        // Empty previous body is a no-op by design.
        request.decode_previous(&mut model).unwrap();
        assert_eq!(model, BucketModel::default());
    }
}
