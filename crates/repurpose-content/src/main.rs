use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    ArtifactKind, ClaudeGenerator, Config, Pipeline, PipelineConfig, PipelineError,
    RepurposeFailurePolicy, Source, SourceKind,
};
use std::io::{self as stdio, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "repurpose-content")]
#[command(about = "Summarize a blog, video transcript, text file, or PDF and repurpose it into new formats")]
struct Args {
    /// Source kind (blog, transcript, textfile, pdf)
    #[arg(short, long)]
    source: Option<String>,

    /// Locator for the source: URL, video ID, or file path
    #[arg(short, long)]
    locator: Option<String>,

    /// Maximum chunk width in characters
    #[arg(long, default_value_t = shared::DEFAULT_CHUNK_WIDTH)]
    chunk_width: usize,

    /// Directory for run records (defaults to <documents>/repurposed)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Keep going when a repurposing task fails, omitting that artifact
    #[arg(long)]
    keep_partial: bool,
}

fn prompt_source_selection() -> Result<(SourceKind, String)> {
    println!("Choose input type:");
    println!("  1) Blog URL");
    println!("  2) YouTube video ID");
    println!("  3) Text file");
    println!("  4) PDF file");
    print!("\nEnter your choice (1-4): ");
    stdio::stdout().flush()?;

    let mut input = String::new();
    stdio::stdin().read_line(&mut input)?;

    let kind = match input.trim() {
        "1" => SourceKind::Blog,
        "2" => SourceKind::Transcript,
        "3" => SourceKind::TextFile,
        "4" => SourceKind::Pdf,
        _ => anyhow::bail!("Invalid selection. Please choose 1, 2, 3, or 4."),
    };

    let label = match kind {
        SourceKind::Blog => "Enter blog URL: ",
        SourceKind::Transcript => "Enter YouTube video ID: ",
        SourceKind::TextFile => "Enter text file path: ",
        SourceKind::Pdf => "Enter PDF file path: ",
    };
    print!("{label}");
    stdio::stdout().flush()?;

    let mut locator = String::new();
    stdio::stdin().read_line(&mut locator)?;
    let locator = locator.trim().to_string();
    if locator.is_empty() {
        anyhow::bail!("No locator given.");
    }

    Ok((kind, locator))
}

fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let (kind, locator) = match (args.source, args.locator) {
        (Some(slug), Some(locator)) => {
            let kind = SourceKind::from_slug(&slug).ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid source: {}. Use 'blog', 'transcript', 'textfile', or 'pdf'",
                    slug
                )
            })?;
            (kind, locator)
        }
        _ => prompt_source_selection()?,
    };
    let source = Source::new(kind, locator);

    let mut pipeline_config = PipelineConfig {
        chunk_width: args.chunk_width,
        ..PipelineConfig::default()
    };
    if let Some(dir) = args.output_dir {
        pipeline_config.output_dir = dir;
    }
    if args.keep_partial {
        pipeline_config.failure_policy = RepurposeFailurePolicy::Skip;
    }

    let generator = Arc::new(ClaudeGenerator::new(config.anthropic_api_key)?);
    let pipeline = Pipeline::new(pipeline_config, generator)?;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n⚠ Cancelling after the current step...");
            signal_token.cancel();
        }
    });

    println!("\n📥 Loading {} source: {}", kind, source.locator());
    println!("🤖 Summarizing and repurposing with Claude AI...");
    println!("  (This may take a minute...)");

    let outcome = match pipeline.run_with_cancel(&source, cancel).await {
        Ok(outcome) => outcome,
        Err(PipelineError::EmptyInput { locator }) => {
            anyhow::bail!("No content found to process from {}", locator)
        }
        Err(PipelineError::EmptySummary { total }) => {
            anyhow::bail!("Summarization failed for all {} chunks; nothing to repurpose", total)
        }
        Err(PipelineError::Cancelled) => {
            anyhow::bail!("Run cancelled before any summary was produced; nothing written")
        }
        Err(e) => return Err(e).context("Run failed"),
    };

    println!(
        "✓ Summarized {}/{} chunks",
        outcome.chunk_total - outcome.chunk_failures,
        outcome.chunk_total
    );
    if outcome.chunk_failures > 0 {
        println!("⚠ Skipped {} chunks that failed to summarize", outcome.chunk_failures);
    }
    if !outcome.record.complete {
        println!("⚠ Run was cancelled; wrote a partial record marked incomplete");
    }

    println!("\n✅ Output saved successfully: {}", outcome.path.display());

    if let Some(summary) = outcome
        .record
        .artifacts
        .iter()
        .find(|a| a.kind == ArtifactKind::Summary)
    {
        println!("\n✨ Summary preview:\n{}...", preview(&summary.text, 500));
    }

    Ok(())
}
