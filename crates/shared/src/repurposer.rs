use futures::join;
use tracing::warn;

use crate::error::PipelineError;
use crate::generation::{Generator, TaskSpec};
use crate::models::{Artifact, ArtifactKind};

/// What to do when one of the three rewrite tasks fails. The baseline
/// behavior aborts the whole run; the lenient option mirrors the
/// summarization stage and drops the failed artifact instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepurposeFailurePolicy {
    #[default]
    Abort,
    Skip,
}

pub struct Repurposer {
    policy: RepurposeFailurePolicy,
}

impl Repurposer {
    pub fn new(policy: RepurposeFailurePolicy) -> Self {
        Self { policy }
    }

    /// Run the three rewrite tasks over the summary. The tasks share no
    /// data beyond the summary, so they are dispatched concurrently;
    /// artifacts are assembled in canonical order regardless of which
    /// task finishes first, and under the abort policy the surfaced
    /// failure is the first one in canonical order.
    pub async fn repurpose(
        &self,
        generator: &dyn Generator,
        summary: &str,
    ) -> Result<Vec<Artifact>, PipelineError> {
        let post_task = TaskSpec::professional_post();
        let thread_task = TaskSpec::micro_thread();
        let script_task = TaskSpec::short_script();

        let (post, thread, script) = join!(
            generator.generate(&post_task, summary),
            generator.generate(&thread_task, summary),
            generator.generate(&script_task, summary),
        );

        let outputs = [
            (ArtifactKind::ProfessionalPost, post),
            (ArtifactKind::MicroThread, thread),
            (ArtifactKind::ShortScript, script),
        ];

        let mut artifacts = Vec::with_capacity(outputs.len());
        for (kind, output) in outputs {
            match output {
                Ok(text) => artifacts.push(Artifact { kind, text }),
                Err(source) => match self.policy {
                    RepurposeFailurePolicy::Abort => {
                        return Err(PipelineError::Repurposing { task: kind, source });
                    }
                    RepurposeFailurePolicy::Skip => {
                        warn!("omitting {} artifact: {}", kind, source);
                    }
                },
            }
        }

        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::testing::MockGenerator;

    #[tokio::test]
    async fn test_artifacts_in_canonical_order_each_derived_from_summary() {
        let generator = MockGenerator::new();

        let artifacts = Repurposer::new(RepurposeFailurePolicy::Abort)
            .repurpose(&generator, "S")
            .await
            .unwrap();

        assert_eq!(
            artifacts.iter().map(|a| a.kind).collect::<Vec<_>>(),
            vec![
                ArtifactKind::ProfessionalPost,
                ArtifactKind::MicroThread,
                ArtifactKind::ShortScript,
            ],
        );

        // The default mock echoes task name and input, so each artifact
        // proves independent derivation from "S" with no cross-feed.
        assert_eq!(artifacts[0].text, "professional post:S");
        assert_eq!(artifacts[1].text, "micro thread:S");
        assert_eq!(artifacts[2].text, "short script:S");

        for call in generator.calls() {
            assert_eq!(call.input, "S");
        }
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_abort_policy_surfaces_first_canonical_failure() {
        let generator = MockGenerator::with_script(vec![
            Ok("post".to_string()),
            Err(GenerationError::Api("thread failed".to_string())),
            Ok("script".to_string()),
        ]);

        let error = Repurposer::new(RepurposeFailurePolicy::Abort)
            .repurpose(&generator, "S")
            .await
            .unwrap_err();

        match error {
            PipelineError::Repurposing { task, .. } => {
                assert_eq!(task, ArtifactKind::MicroThread);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_skip_policy_omits_only_failed_artifact() {
        let generator = MockGenerator::with_script(vec![
            Ok("post".to_string()),
            Err(GenerationError::Api("thread failed".to_string())),
            Ok("script".to_string()),
        ]);

        let artifacts = Repurposer::new(RepurposeFailurePolicy::Skip)
            .repurpose(&generator, "S")
            .await
            .unwrap();

        assert_eq!(
            artifacts.iter().map(|a| a.kind).collect::<Vec<_>>(),
            vec![ArtifactKind::ProfessionalPost, ArtifactKind::ShortScript],
        );
    }
}
