use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::models::RunRecord;

pub struct ReportGenerator;

impl ReportGenerator {
    /// Render a run record into the fixed plain-text layout: a header
    /// naming the source, then one literal-headed section per artifact in
    /// canonical order, text verbatim. Downstream parsers match the
    /// section headers exactly.
    pub fn render(record: &RunRecord) -> String {
        let mut out = String::new();

        out.push_str(&format!("Source Type: {}\n", record.kind));
        out.push_str(&format!("Source: {}\n", record.locator));
        if !record.complete {
            out.push_str("Status: incomplete (cancelled before all artifacts were generated)\n");
        }

        for artifact in &record.artifacts {
            out.push('\n');
            out.push_str(&format!("=== {} ===\n", artifact.kind.label()));
            out.push_str(&artifact.text);
            out.push('\n');
        }

        out
    }

    /// Write the record under `output_dir`, deriving the filename from the
    /// record's capture-time timestamp at second resolution. A collision
    /// within the same second overwrites.
    pub fn save(record: &RunRecord, output_dir: &Path) -> Result<PathBuf, PipelineError> {
        let filename = format!("repurpose_{}.txt", record.timestamp.format("%Y%m%d_%H%M%S"));

        fs::create_dir_all(output_dir)?;
        let filepath = output_dir.join(filename);
        fs::write(&filepath, Self::render(record))?;

        Ok(filepath)
    }
}
