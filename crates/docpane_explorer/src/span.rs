//! Operation span guard.

use docpane_error::DocpaneError;
use docpane_interface::{Action, FailureDetails, Instrumentation, SpanContext, SpanToken};

/// An open instrumentation span that is closed exactly once.
///
/// Closing consumes the guard. A guard dropped without being closed reports a
/// failure so the sink never sees a dangling start.
pub struct OperationSpan<'a> {
    instrumentation: &'a dyn Instrumentation,
    action: Action,
    context: &'a SpanContext,
    token: SpanToken,
    closed: bool,
}

impl<'a> OperationSpan<'a> {
    /// Opens a span.
    pub fn start(
        instrumentation: &'a dyn Instrumentation,
        action: Action,
        context: &'a SpanContext,
    ) -> Self {
        let token = instrumentation.span_start(action, context);
        Self {
            instrumentation,
            action,
            context,
            token,
            closed: false,
        }
    }

    /// Action tag of this span.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Closes the span as successful.
    pub fn succeed(mut self) {
        self.closed = true;
        self.instrumentation
            .span_success(self.action, self.context, self.token);
    }

    /// Closes the span as failed with the error's message and stack.
    pub fn fail(mut self, error: &DocpaneError) {
        self.closed = true;
        self.instrumentation.span_failure(
            self.action,
            self.context,
            self.token,
            &FailureDetails::from(error),
        );
    }
}

impl Drop for OperationSpan<'_> {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!(action = %self.action, "Span dropped without being closed");
            self.instrumentation.span_failure(
                self.action,
                self.context,
                self.token,
                &FailureDetails::new("Operation abandoned", None),
            );
        }
    }
}
