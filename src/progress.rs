use std::{
    collections::HashMap,
    io::{self, Write},
    sync::{Arc, Mutex},
};

use crate::ui;

/// Identifier for a step displayed to the user.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StepId(String);

impl StepId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Terminal status of a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Cached,
    Failed,
}

/// Indicates how a logger wants command output to be delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputPolicy {
    /// Pipe child stdout/stderr directly to the parent terminal (no capture).
    Inherit,
    /// Capture output so it can be formatted.
    Capture,
}

/// Sink abstraction for progress reporting.
pub trait ProgressLogger: Send + Sync {
    fn register_step(&self, id: &StepId, label: &str);
    fn start(&self, id: &StepId);
    fn finish(&self, id: &StepId, status: StepStatus);
    fn append_output(&self, id: &StepId, line: String);
    fn append_output_chunk(&self, id: &StepId, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(chunk).into_owned();
        self.append_output(id, text);
    }
    fn flush_output(&self, _id: &StepId) {}
    fn output_policy(&self) -> OutputPolicy {
        OutputPolicy::Capture
    }
}

/// Guard that ensures a step ends with a terminal status.
pub struct StepGuard {
    sink: Arc<dyn ProgressLogger>,
    id: StepId,
    finished: bool,
}

impl StepGuard {
    pub fn new(sink: Arc<dyn ProgressLogger>, id: StepId) -> Self {
        Self {
            sink,
            id,
            finished: false,
        }
    }

    pub fn done(mut self) {
        self.finish_with(StepStatus::Done);
    }

    pub fn cached(mut self) {
        self.finish_with(StepStatus::Cached);
    }

    fn finish_with(&mut self, status: StepStatus) {
        if self.finished {
            return;
        }
        self.sink.finish(&self.id, status);
        self.finished = true;
    }
}

impl Drop for StepGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.sink.finish(&self.id, StepStatus::Failed);
        }
    }
}

/// Progress sink for plain, sequential output.
#[derive(Default)]
pub struct PlainProgressLogger {
    labels: Mutex<HashMap<StepId, String>>,
}

impl ProgressLogger for PlainProgressLogger {
    fn register_step(&self, id: &StepId, label: &str) {
        self.labels
            .lock()
            .unwrap()
            .insert(id.clone(), label.to_string());
    }

    fn start(&self, id: &StepId) {
        if let Some(label) = self.labels.lock().unwrap().get(id) {
            ui::step(label);
        }
    }

    fn finish(&self, _id: &StepId, status: StepStatus) {
        match status {
            StepStatus::Cached => ui::detail("cached"),
            StepStatus::Failed => ui::detail("failed"),
            StepStatus::Done => {}
        }
        ui::blank_line();
    }

    fn append_output(&self, _id: &StepId, line: String) {
        eprintln!("{line}");
    }

    fn append_output_chunk(&self, _id: &StepId, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        let mut stderr = io::stderr();
        let _ = stderr.write_all(chunk);
        let _ = stderr.flush();
    }

    fn output_policy(&self) -> OutputPolicy {
        OutputPolicy::Inherit
    }
}
