use thiserror::Error;

use crate::models::ArtifactKind;

/// Adapter-level failures. The pipeline driver absorbs these into an
/// empty document after logging; they never abort the process.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request for {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("no transcript available for video {video_id}")]
    TranscriptUnavailable { video_id: String },

    #[error("could not read {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Failures from the external generation capability
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(String),

    #[error("generation API error: {0}")]
    Api(String),

    #[error("malformed generation output: {0}")]
    MalformedResponse(String),
}

/// Fatal-tier failures, surfaced to the caller. A run either produces a
/// complete record or terminates with one of these.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no content could be loaded from {locator}")]
    EmptyInput { locator: String },

    #[error("summarization produced no output: all {total} chunks failed")]
    EmptySummary { total: usize },

    #[error("generating the {task} artifact failed")]
    Repurposing {
        task: ArtifactKind,
        #[source]
        source: GenerationError,
    },

    #[error("failed to persist run record: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("run cancelled before any summary was produced")]
    Cancelled,
}
