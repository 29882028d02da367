use chrono::{DateTime, Local};
use std::fmt;

/// Which kind of source a document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Blog,
    Transcript,
    TextFile,
    Pdf,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Blog => "blog",
            SourceKind::Transcript => "transcript",
            SourceKind::TextFile => "textfile",
            SourceKind::Pdf => "pdf",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "blog" => Some(SourceKind::Blog),
            "transcript" => Some(SourceKind::Transcript),
            "textfile" => Some(SourceKind::TextFile),
            "pdf" => Some(SourceKind::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source normalized to plain text. Empty text is valid; the pipeline
/// halts at its empty-input gate rather than treating it as an error.
#[derive(Debug, Clone)]
pub struct Document {
    pub kind: SourceKind,
    pub locator: String,
    pub text: String,
}

impl Document {
    pub fn new(kind: SourceKind, locator: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            locator: locator.into(),
            text: text.into(),
        }
    }

    pub fn empty(kind: SourceKind, locator: impl Into<String>) -> Self {
        Self::new(kind, locator, "")
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A whitespace-aligned segment of a document, processed independently
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
pub enum ChunkStatus {
    Summarized(String),
    Failed(String),
}

/// Per-chunk summarization outcome; failed chunks are dropped from the
/// reduction, never retried.
#[derive(Debug, Clone)]
pub struct ChunkResult {
    pub index: usize,
    pub status: ChunkStatus,
}

impl ChunkResult {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, ChunkStatus::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Summary,
    ProfessionalPost,
    MicroThread,
    ShortScript,
}

impl ArtifactKind {
    /// Literal section header used in the persisted record
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Summary => "Combined Summary",
            ArtifactKind::ProfessionalPost => "Professional Post",
            ArtifactKind::MicroThread => "Micro Thread",
            ArtifactKind::ShortScript => "Short Script",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One generated output, produced exactly once per run
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub text: String,
}

/// The complete output of one pipeline invocation, immutable once built.
/// Artifacts are held in canonical order: Combined Summary, Professional
/// Post, Micro Thread, Short Script.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub kind: SourceKind,
    pub locator: String,
    pub timestamp: DateTime<Local>,
    pub artifacts: Vec<Artifact>,
    pub complete: bool,
}

impl RunRecord {
    pub fn new(
        kind: SourceKind,
        locator: impl Into<String>,
        timestamp: DateTime<Local>,
        artifacts: Vec<Artifact>,
    ) -> Self {
        Self {
            kind,
            locator: locator.into(),
            timestamp,
            artifacts,
            complete: true,
        }
    }

    /// A record cut short by cancellation, carrying whatever artifacts
    /// were produced before the run stopped.
    pub fn partial(
        kind: SourceKind,
        locator: impl Into<String>,
        timestamp: DateTime<Local>,
        artifacts: Vec<Artifact>,
    ) -> Self {
        Self {
            complete: false,
            ..Self::new(kind, locator, timestamp, artifacts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_slug_round_trip() {
        for kind in [
            SourceKind::Blog,
            SourceKind::Transcript,
            SourceKind::TextFile,
            SourceKind::Pdf,
        ] {
            assert_eq!(SourceKind::from_slug(kind.as_str()), Some(kind));
        }
        assert_eq!(SourceKind::from_slug("rss"), None);
    }

    #[test]
    fn test_empty_document_gate() {
        assert!(Document::empty(SourceKind::Blog, "https://example.com").is_empty());
        assert!(Document::new(SourceKind::TextFile, "notes.txt", "  \n\t ").is_empty());
        assert!(!Document::new(SourceKind::TextFile, "notes.txt", "hello").is_empty());
    }
}
