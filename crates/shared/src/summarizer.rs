use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::generation::{Generator, TaskSpec};
use crate::models::{Chunk, ChunkResult, ChunkStatus};

/// Outcome of the map-reduce pass: one result per processed chunk plus
/// the reduced summary. The summary is empty iff no chunk succeeded.
#[derive(Debug)]
pub struct MapReduceOutcome {
    pub results: Vec<ChunkResult>,
    pub summary: String,
    pub cancelled: bool,
}

impl MapReduceOutcome {
    pub fn succeeded(&self) -> usize {
        self.results.len() - self.failed()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }
}

pub struct Summarizer {
    task: TaskSpec,
}

impl Summarizer {
    pub fn new() -> Self {
        Self {
            task: TaskSpec::summarize(),
        }
    }

    /// Map each chunk through the generation capability, strictly
    /// sequentially and in index order, then concatenate the survivors.
    /// A chunk failure is logged with its index and excluded from the
    /// reduction; processing continues with the next chunk. The
    /// cancellation token is checked between iterations.
    pub async fn summarize(
        &self,
        generator: &dyn Generator,
        chunks: &[Chunk],
        cancel: &CancellationToken,
    ) -> MapReduceOutcome {
        let mut results = Vec::with_capacity(chunks.len());
        let mut cancelled = false;

        for chunk in chunks {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            match generator.generate(&self.task, &chunk.text).await {
                Ok(text) => results.push(ChunkResult {
                    index: chunk.index,
                    status: ChunkStatus::Summarized(text),
                }),
                Err(e) => {
                    warn!("skipping chunk {}: {}", chunk.index, e);
                    results.push(ChunkResult {
                        index: chunk.index,
                        status: ChunkStatus::Failed(e.to_string()),
                    });
                }
            }
        }

        let summary = reduce(&results);
        MapReduceOutcome {
            results,
            summary,
            cancelled,
        }
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered newline-join of the successful chunk summaries
fn reduce(results: &[ChunkResult]) -> String {
    results
        .iter()
        .filter_map(|result| match &result.status {
            ChunkStatus::Summarized(text) => Some(text.as_str()),
            ChunkStatus::Failed(_) => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::chunk_text;
    use crate::testing::MockGenerator;

    fn chunks(text: &str, width: usize) -> Vec<Chunk> {
        chunk_text(text, width)
    }

    #[tokio::test]
    async fn test_survivor_excludes_failed_chunk() {
        // "AAA BBB CCC" at width 7 splits into ["AAA BBB", "CCC"];
        // the second chunk fails and must leave no separator artifact.
        let generator = MockGenerator::with_script(vec![
            Ok("summary1".to_string()),
            Err(crate::error::GenerationError::Api("boom".to_string())),
        ]);

        let outcome = Summarizer::new()
            .summarize(&generator, &chunks("AAA BBB CCC", 7), &CancellationToken::new())
            .await;

        assert_eq!(outcome.summary, "summary1");
        assert_eq!(outcome.succeeded(), 1);
        assert_eq!(outcome.failed(), 1);
        assert!(!outcome.cancelled);
    }

    #[tokio::test]
    async fn test_all_chunks_failing_yields_empty_summary() {
        let generator = MockGenerator::with_script(vec![
            Err(crate::error::GenerationError::Request("down".to_string())),
            Err(crate::error::GenerationError::Request("down".to_string())),
        ]);

        let outcome = Summarizer::new()
            .summarize(&generator, &chunks("AAA BBB CCC", 7), &CancellationToken::new())
            .await;

        assert!(outcome.summary.is_empty());
        assert_eq!(outcome.failed(), 2);
    }

    #[tokio::test]
    async fn test_reduction_preserves_chunk_order() {
        let generator = MockGenerator::with_script(vec![
            Ok("first".to_string()),
            Ok("second".to_string()),
            Ok("third".to_string()),
        ]);

        let outcome = Summarizer::new()
            .summarize(&generator, &chunks("a b c", 1), &CancellationToken::new())
            .await;

        assert_eq!(outcome.summary, "first\nsecond\nthird");

        // Strictly sequential dispatch: chunk inputs arrive in index order.
        let inputs: Vec<String> = generator.calls().into_iter().map(|c| c.input).collect();
        assert_eq!(inputs, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_before_first_chunk() {
        let generator = MockGenerator::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = Summarizer::new()
            .summarize(&generator, &chunks("a b c", 1), &cancel)
            .await;

        assert!(outcome.cancelled);
        assert!(outcome.summary.is_empty());
        assert_eq!(generator.call_count(), 0);
    }
}
