//! Instrumentation sink that writes span events to `tracing`.

use docpane_interface::{Action, FailureDetails, Instrumentation, SpanContext, SpanToken};

/// Logs span start, success and failure as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInstrumentation;

impl Instrumentation for TracingInstrumentation {
    fn span_start(&self, action: Action, context: &SpanContext) -> SpanToken {
        let token = SpanToken::now();
        tracing::info!(
            action = %action,
            database = %context.database_name(),
            collection = %context.collection_name(),
            tab = %context.tab_title(),
            area = %context.area(),
            start = token.millis(),
            "Operation started"
        );
        token
    }

    fn span_success(&self, action: Action, context: &SpanContext, token: SpanToken) {
        tracing::info!(
            action = %action,
            database = %context.database_name(),
            collection = %context.collection_name(),
            tab = %context.tab_title(),
            elapsed_ms = token.elapsed_ms(),
            "Operation succeeded"
        );
    }

    fn span_failure(
        &self,
        action: Action,
        context: &SpanContext,
        token: SpanToken,
        failure: &FailureDetails,
    ) {
        tracing::error!(
            action = %action,
            database = %context.database_name(),
            collection = %context.collection_name(),
            tab = %context.tab_title(),
            elapsed_ms = token.elapsed_ms(),
            error = %failure.message(),
            stack = failure.stack().as_deref().unwrap_or(""),
            "Operation failed"
        );
    }
}
