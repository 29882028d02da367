use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::SourceError;
use crate::models::{Document, SourceKind};

/// A locator tagged with the kind of source it points at
#[derive(Debug, Clone)]
pub enum Source {
    Blog { url: String },
    Transcript { video_id: String },
    TextFile { path: PathBuf },
    Pdf { path: PathBuf },
}

impl Source {
    pub fn new(kind: SourceKind, locator: impl Into<String>) -> Self {
        let locator = locator.into();
        match kind {
            SourceKind::Blog => Source::Blog { url: locator },
            SourceKind::Transcript => Source::Transcript { video_id: locator },
            SourceKind::TextFile => Source::TextFile {
                path: PathBuf::from(locator),
            },
            SourceKind::Pdf => Source::Pdf {
                path: PathBuf::from(locator),
            },
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Blog { .. } => SourceKind::Blog,
            Source::Transcript { .. } => SourceKind::Transcript,
            Source::TextFile { .. } => SourceKind::TextFile,
            Source::Pdf { .. } => SourceKind::Pdf,
        }
    }

    pub fn locator(&self) -> String {
        match self {
            Source::Blog { url } => url.clone(),
            Source::Transcript { video_id } => video_id.clone(),
            Source::TextFile { path } | Source::Pdf { path } => path.display().to_string(),
        }
    }

    /// Normalize this source into a plain-text document. Errors carry the
    /// cause for logging; the pipeline driver decides to treat them as an
    /// empty document rather than aborting.
    pub async fn load(&self, fetcher: &SourceFetcher) -> std::result::Result<Document, SourceError> {
        match self {
            Source::Blog { url } => fetcher.load_blog(url).await,
            Source::Transcript { video_id } => fetcher.load_transcript(video_id).await,
            Source::TextFile { path } => load_text_file(path).await,
            Source::Pdf { path } => load_pdf(path).await,
        }
    }
}

pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; RepurposeContent/1.0)")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn load_blog(&self, url: &str) -> std::result::Result<Document, SourceError> {
        let parsed = Url::parse(url).map_err(|e| SourceError::Network {
            url: url.to_string(),
            reason: format!("invalid URL: {e}"),
        })?;

        let response =
            self.client
                .get(parsed)
                .send()
                .await
                .map_err(|e| SourceError::Network {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Network {
                url: url.to_string(),
                reason: format!("HTTP status {status}"),
            });
        }

        let html = response.text().await.map_err(|e| SourceError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        // No paragraphs is an empty document, not an error.
        Ok(Document::new(
            SourceKind::Blog,
            url,
            extract_paragraphs(&html),
        ))
    }

    async fn load_transcript(&self, video_id: &str) -> std::result::Result<Document, SourceError> {
        let url = format!(
            "https://www.youtube.com/api/timedtext?v={}&lang=en&fmt=json3",
            urlencoding::encode(video_id)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Network {
                url,
                reason: format!("HTTP status {status}"),
            });
        }

        let body = response.text().await.map_err(|e| SourceError::Network {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        // The endpoint answers 200 with an empty body when the video has
        // no caption track.
        let text = captions_to_text(&body).ok_or_else(|| SourceError::TranscriptUnavailable {
            video_id: video_id.to_string(),
        })?;

        Ok(Document::new(SourceKind::Transcript, video_id, text))
    }
}

/// Extract visible paragraph text from an HTML page, joined with newlines
fn extract_paragraphs(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p").unwrap();

    document
        .select(&selector)
        .map(|p| {
            p.text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Deserialize)]
struct CaptionTrack {
    #[serde(default)]
    events: Vec<CaptionEvent>,
}

#[derive(Deserialize)]
struct CaptionEvent {
    #[serde(default)]
    segs: Option<Vec<CaptionSegment>>,
}

#[derive(Deserialize)]
struct CaptionSegment {
    #[serde(default)]
    utf8: String,
}

/// Concatenate caption text with single spaces, discarding timing
/// metadata. Returns None when the track is missing or carries no text.
fn captions_to_text(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let track: CaptionTrack = serde_json::from_str(body).ok()?;

    let text = track
        .events
        .iter()
        .filter_map(|event| event.segs.as_ref())
        .flatten()
        .flat_map(|segment| segment.utf8.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

async fn load_text_file(path: &Path) -> std::result::Result<Document, SourceError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let text = String::from_utf8(bytes).map_err(|_| SourceError::Io {
        path: path.display().to_string(),
        reason: "file is not valid UTF-8".to_string(),
    })?;

    Ok(Document::new(
        SourceKind::TextFile,
        path.display().to_string(),
        text,
    ))
}

async fn load_pdf(path: &Path) -> std::result::Result<Document, SourceError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let pages =
        pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| SourceError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    // Pages with no extractable text are skipped
    let text = pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Document::new(
        SourceKind::Pdf,
        path.display().to_string(),
        text,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_construction_maps_locators() {
        let source = Source::new(SourceKind::Blog, "https://example.com/post");
        assert_eq!(source.kind(), SourceKind::Blog);
        assert_eq!(source.locator(), "https://example.com/post");

        let source = Source::new(SourceKind::Pdf, "paper.pdf");
        assert_eq!(source.kind(), SourceKind::Pdf);
        assert_eq!(source.locator(), "paper.pdf");
    }

    #[test]
    fn test_extract_paragraphs_joins_with_newlines() {
        let html = r#"
            <html><body>
            <script>var ignored = true;</script>
            <p>First <b>paragraph</b> here.</p>
            <div><p>Second
                paragraph.</p></div>
            <p>   </p>
            </body></html>
        "#;
        assert_eq!(
            extract_paragraphs(html),
            "First paragraph here.\nSecond paragraph."
        );
    }

    #[test]
    fn test_extract_paragraphs_without_paragraphs_is_empty() {
        assert_eq!(extract_paragraphs("<html><body><h1>title</h1></body></html>"), "");
    }

    #[test]
    fn test_captions_to_text_joins_segments() {
        let body = r#"{
            "events": [
                {"tStartMs": 0, "segs": [{"utf8": "hello"}, {"utf8": " there\n"}]},
                {"tStartMs": 1200},
                {"tStartMs": 2400, "segs": [{"utf8": "again"}]}
            ]
        }"#;
        assert_eq!(captions_to_text(body).as_deref(), Some("hello there again"));
    }

    #[test]
    fn test_captions_to_text_empty_track_is_unavailable() {
        assert_eq!(captions_to_text(""), None);
        assert_eq!(captions_to_text("{\"events\": []}"), None);
        assert_eq!(captions_to_text("not json"), None);
    }

    #[tokio::test]
    async fn test_load_text_file_reads_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "some notes").unwrap();

        let document = load_text_file(&path).await.unwrap();
        assert_eq!(document.kind, SourceKind::TextFile);
        assert_eq!(document.text, "some notes");
    }

    #[tokio::test]
    async fn test_load_text_file_missing_is_io_error() {
        let result = load_text_file(Path::new("/no/such/file.txt")).await;
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }

    #[tokio::test]
    async fn test_load_text_file_invalid_utf8_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let result = load_text_file(&path).await;
        assert!(matches!(result, Err(SourceError::Io { .. })));
    }
}
