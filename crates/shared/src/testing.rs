//! Test support: a deterministic mock of the generation capability, so
//! stage and pipeline tests run without any inference or network path.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::GenerationError;
use crate::generation::{Generator, TaskSpec};

/// One recorded `generate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub task: &'static str,
    pub input: String,
}

/// Mock generator with scripted per-call results and call recording.
///
/// Scripted results are consumed in call order. Once the script is
/// exhausted (or was never set), every call succeeds with
/// `"<task name>:<input>"`, which makes cross-contamination between
/// tasks visible in assertions.
#[derive(Default)]
pub struct MockGenerator {
    script: Mutex<Vec<Result<String, GenerationError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue results to return, in call order
    pub fn with_script(results: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            script: Mutex::new(results),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, task: &TaskSpec, input: &str) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(RecordedCall {
            task: task.name,
            input: input.to_string(),
        });

        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            Ok(format!("{}:{}", task.name, input))
        } else {
            script.remove(0)
        }
    }
}
