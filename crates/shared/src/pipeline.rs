use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::chunker;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::generation::Generator;
use crate::models::{Artifact, ArtifactKind, Document, RunRecord};
use crate::report::ReportGenerator;
use crate::repurposer::Repurposer;
use crate::source::{Source, SourceFetcher};
use crate::summarizer::Summarizer;

/// What one invocation produced
#[derive(Debug)]
pub struct RunOutcome {
    pub record: RunRecord,
    pub path: PathBuf,
    pub chunk_total: usize,
    pub chunk_failures: usize,
}

/// One-directional driver: source adapter, chunker, summarization,
/// repurposing, output sink. Runs one invocation to completion; each run
/// owns its own data.
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: SourceFetcher,
    generator: Arc<dyn Generator>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, generator: Arc<dyn Generator>) -> Result<Self> {
        let fetcher = SourceFetcher::new(config.fetch_timeout)?;
        Ok(Self {
            config,
            fetcher,
            generator,
        })
    }

    pub async fn run(&self, source: &Source) -> std::result::Result<RunOutcome, PipelineError> {
        self.run_with_cancel(source, CancellationToken::new()).await
    }

    pub async fn run_with_cancel(
        &self,
        source: &Source,
        cancel: CancellationToken,
    ) -> std::result::Result<RunOutcome, PipelineError> {
        let document = self.load_document(source).await;
        if document.is_empty() {
            return Err(PipelineError::EmptyInput {
                locator: source.locator(),
            });
        }

        let chunks = chunker::chunk_text(&document.text, self.config.chunk_width);
        info!("split {} into {} chunks", source.locator(), chunks.len());

        let outcome = Summarizer::new()
            .summarize(self.generator.as_ref(), &chunks, &cancel)
            .await;

        if outcome.summary.is_empty() {
            if outcome.cancelled {
                return Err(PipelineError::Cancelled);
            }
            return Err(PipelineError::EmptySummary {
                total: chunks.len(),
            });
        }

        let timestamp = Local::now();

        // Cancellation between stages still persists the summary, in a
        // record clearly marked incomplete.
        if outcome.cancelled || cancel.is_cancelled() {
            let record = RunRecord::partial(
                document.kind,
                document.locator.clone(),
                timestamp,
                vec![Artifact {
                    kind: ArtifactKind::Summary,
                    text: outcome.summary.clone(),
                }],
            );
            let path = ReportGenerator::save(&record, &self.config.output_dir)?;
            return Ok(RunOutcome {
                record,
                path,
                chunk_total: chunks.len(),
                chunk_failures: outcome.failed(),
            });
        }

        let mut artifacts = vec![Artifact {
            kind: ArtifactKind::Summary,
            text: outcome.summary.clone(),
        }];
        artifacts.extend(
            Repurposer::new(self.config.failure_policy)
                .repurpose(self.generator.as_ref(), &outcome.summary)
                .await?,
        );

        let record = RunRecord::new(document.kind, document.locator.clone(), timestamp, artifacts);
        let path = ReportGenerator::save(&record, &self.config.output_dir)?;

        Ok(RunOutcome {
            record,
            path,
            chunk_total: chunks.len(),
            chunk_failures: outcome.failed(),
        })
    }

    /// Load the source, absorbing adapter failures into an empty
    /// document. A single unreachable source never aborts the process;
    /// the halt condition downstream is empty text.
    async fn load_document(&self, source: &Source) -> Document {
        match source.load(&self.fetcher).await {
            Ok(document) => document,
            Err(e) => {
                warn!("source unavailable, continuing with empty document: {}", e);
                Document::empty(source.kind(), source.locator())
            }
        }
    }
}
