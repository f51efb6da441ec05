//! Recording collaborators for explorer tests.

#![allow(dead_code)]

use docpane_core::{ContainerHandle, Dialect, PartitionKeyDefinition};
use docpane_explorer::{BrowsingTab, Collaborators, InMemoryBackend, TabSettings};
use docpane_interface::{Action, Confirm, FailureDetails, Instrumentation, Notify, SpanContext, SpanToken};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded span event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanEvent {
    Start(Action),
    Success(Action),
    Failure(Action, String),
}

/// Instrumentation that records every event.
#[derive(Default)]
pub struct RecordingInstrumentation {
    events: Mutex<Vec<SpanEvent>>,
}

impl RecordingInstrumentation {
    pub fn events(&self) -> Vec<SpanEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Instrumentation for RecordingInstrumentation {
    fn span_start(&self, action: Action, _context: &SpanContext) -> SpanToken {
        self.events.lock().unwrap().push(SpanEvent::Start(action));
        SpanToken::now()
    }

    fn span_success(&self, action: Action, _context: &SpanContext, _token: SpanToken) {
        self.events.lock().unwrap().push(SpanEvent::Success(action));
    }

    fn span_failure(
        &self,
        action: Action,
        _context: &SpanContext,
        _token: SpanToken,
        failure: &FailureDetails,
    ) {
        self.events
            .lock()
            .unwrap()
            .push(SpanEvent::Failure(action, failure.message().clone()));
    }
}

/// Confirmation prompt with a fixed answer that counts prompts.
pub struct ScriptedConfirm {
    answer: AtomicBool,
    prompts: Mutex<Vec<String>>,
    count: AtomicUsize,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
            prompts: Mutex::new(Vec::new()),
            count: AtomicUsize::new(0),
        }
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(message.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}

/// Notification sink that records messages.
#[derive(Default)]
pub struct RecordingNotify {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotify {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notify for RecordingNotify {
    fn notify_error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// A tab over an in-memory backend with recording collaborators.
pub struct TestHarness {
    pub tab: BrowsingTab,
    pub backend: Arc<InMemoryBackend>,
    pub instrumentation: Arc<RecordingInstrumentation>,
    pub confirm: Arc<ScriptedConfirm>,
    pub notify: Arc<RecordingNotify>,
}

impl TestHarness {
    pub fn new(
        dialect: Dialect,
        partition_key: Option<&str>,
        page_size: usize,
        documents: Vec<Value>,
    ) -> Self {
        let mut container = ContainerHandle::new("store", "products", dialect);
        if let Some(path) = partition_key {
            container = container.with_partition_key(PartitionKeyDefinition::single(path));
        }
        let backend = Arc::new(
            InMemoryBackend::new(dialect)
                .with_page_size(page_size)
                .with_documents(documents),
        );
        let instrumentation = Arc::new(RecordingInstrumentation::default());
        let confirm = Arc::new(ScriptedConfirm::answering(true));
        let notify = Arc::new(RecordingNotify::default());
        let collaborators = Collaborators::new(
            instrumentation.clone(),
            confirm.clone(),
            notify.clone(),
        );
        let tab = BrowsingTab::new(
            container,
            backend.clone(),
            collaborators,
            &TabSettings::default(),
        );
        Self {
            tab,
            backend,
            instrumentation,
            confirm,
            notify,
        }
    }
}
