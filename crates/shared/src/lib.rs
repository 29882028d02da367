// Public modules
pub mod chunker;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod repurposer;
pub mod source;
pub mod summarizer;
pub mod testing;

// Re-export commonly used types
pub use chunker::{chunk_text, DEFAULT_CHUNK_WIDTH};
pub use config::{Config, PipelineConfig};
pub use error::{GenerationError, PipelineError, SourceError};
pub use generation::{ClaudeGenerator, Generator, TaskSpec};
pub use models::{
    Artifact, ArtifactKind, Chunk, ChunkResult, ChunkStatus, Document, RunRecord, SourceKind,
};
pub use pipeline::{Pipeline, RunOutcome};
pub use report::ReportGenerator;
pub use repurposer::{RepurposeFailurePolicy, Repurposer};
pub use source::{Source, SourceFetcher};
pub use summarizer::{MapReduceOutcome, Summarizer};
