//! Pipeline driver: extract, segment, synthesize, assemble.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use thiserror::Error;
use tts_client::{AudioFragment, SpeechBackend, SpeechRequest, TtsError};

use crate::audio::{self, EncodeError};
use crate::extract::{self, ExtractError};
use crate::report::Reporter;
use crate::text::{self, TextSegment};

/// A failed pipeline stage. No stage recovers from another stage's failure;
/// the first error aborts the run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("PDF extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(#[from] TtsError),

    #[error("MP3 encoding failed: {0}")]
    Encoding(#[from] EncodeError),
}

impl PipelineError {
    /// Process exit code for this failure: PDF read errors are distinct
    /// from audio generation errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Extraction(_) => 1,
            Self::Synthesis(_) | Self::Encoding(_) => 2,
        }
    }
}

/// Everything one conversion run needs
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub language: String,
    pub speaking_rate: f32,
    pub bitrate: String,
}

/// Summary of a completed run
#[derive(Debug)]
pub struct RunSummary {
    pub pages: usize,
    pub segments: usize,
    pub output_bytes: u64,
}

/// Run the conversion pipeline end to end.
///
/// Stages run strictly in sequence; fragments accumulate in segment order
/// and the output file appears only after the whole run succeeded.
pub async fn run(
    plan: &RunPlan,
    backend: &dyn SpeechBackend,
    reporter: &mut Reporter,
) -> Result<RunSummary, PipelineError> {
    reporter.info(&format!("Reading PDF file: {}", plan.input.display()));
    let document = extract::extract_document(&plan.input)?;

    for (i, page) in document.pages.iter().enumerate() {
        reporter.info(&format!(
            "Extracted page {}/{} ({} characters)",
            i + 1,
            document.page_count(),
            page.chars().count()
        ));
    }

    if !document.has_text() {
        reporter.error("No text extracted from PDF");
        return Err(ExtractError::NoText.into());
    }

    reporter.info(&format!(
        "Document: {} pages, ~{} words",
        document.page_count(),
        document.total_words()
    ));

    let segments = text::segment_document(&document.full_text(), backend.max_segment_len());
    if segments.is_empty() {
        reporter.error("Extracted text is empty after cleanup");
        return Err(ExtractError::NoText.into());
    }
    reporter.info(&format!(
        "Split text into {} segments (engine: {})",
        segments.len(),
        backend.name()
    ));

    backend.is_available()?;

    let fragments = synthesize_segments(plan, &segments, backend, reporter).await?;

    reporter.info(&format!("Encoding MP3: {}", plan.output.display()));
    audio::write_mp3(&fragments, &plan.output, &plan.bitrate)?;

    let output_bytes = std::fs::metadata(&plan.output).map(|m| m.len()).unwrap_or(0);
    reporter.info(&format!("MP3 file written: {}", plan.output.display()));

    Ok(RunSummary {
        pages: document.page_count(),
        segments: segments.len(),
        output_bytes,
    })
}

/// Synthesize segments one at a time, in order
pub(crate) async fn synthesize_segments(
    plan: &RunPlan,
    segments: &[TextSegment],
    backend: &dyn SpeechBackend,
    reporter: &mut Reporter,
) -> Result<Vec<AudioFragment>, PipelineError> {
    let pb = ProgressBar::new(segments.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut fragments = Vec::with_capacity(segments.len());
    for segment in segments {
        reporter.debug(&format!(
            "Synthesizing segment {} ({} characters)",
            segment.index,
            segment.text.chars().count()
        ));

        let request = SpeechRequest::new(segment.text.clone())
            .with_language(&plan.language)
            .with_speaking_rate(plan.speaking_rate);

        match backend.synthesize(request).await {
            Ok(fragment) => {
                fragments.push(fragment);
                pb.inc(1);
            }
            Err(e) => {
                pb.abandon();
                reporter.error(&format!("Synthesis failed on segment {}: {}", segment.index, e));
                return Err(e.into());
            }
        }
    }
    pb.finish_with_message("synthesis complete");

    Ok(fragments)
}
