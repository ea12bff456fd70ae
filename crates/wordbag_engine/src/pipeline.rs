use std::sync::Arc;
use std::time::Instant;

use engine_logging::{engine_debug, engine_warn};
use wordbag_core::{join_fragments, StopwordSet, TokenBag, TokenFilter};

use crate::fetch::{Fetcher, NoopProgressSink, ProgressSink};
use crate::strip::{MarkupStripper, StripError};
use crate::{decode_html, DecodeError, Document, EngineEvent, JobId, JobProgress, Outcome, Stage};

/// Failures that stop a document without being a fetch problem.
///
/// These are returned as errors, never folded into [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("markup stripping failed: {0}")]
    Strip(#[from] StripError),
    #[error("processing aborted: {0}")]
    Aborted(String),
}

/// The synchronous part of the pipeline: bytes -> text -> tokens.
#[derive(Debug)]
pub struct DocumentProcessor {
    stripper: MarkupStripper,
    filter: TokenFilter,
}

impl DocumentProcessor {
    pub fn new(stripper: MarkupStripper, filter: TokenFilter) -> Self {
        Self { stripper, filter }
    }

    /// Default parser strategies with the given stopwords.
    pub fn with_stopwords(stopwords: Arc<StopwordSet>) -> Self {
        Self::new(MarkupStripper::default(), TokenFilter::new(stopwords))
    }

    pub fn process(
        &self,
        job_id: JobId,
        document: &Document,
        sink: &dyn ProgressSink,
    ) -> Result<TokenBag, PipelineError> {
        sink.emit(EngineEvent::Progress(JobProgress {
            bytes: Some(document.metadata.byte_len),
            ..JobProgress::at(job_id, Stage::Decoding)
        }));
        let started = Instant::now();
        let decoded = decode_html(&document.bytes, document.metadata.content_type.as_deref())?;
        engine_debug!(
            "job {} decoded as {} in {:?}",
            job_id,
            decoded.encoding_label,
            started.elapsed()
        );

        Ok(self.tokenize(job_id, &decoded.html, sink)?)
    }

    /// Runs stripping, normalization and filtering on already-decoded markup.
    pub fn process_markup(&self, markup: &str) -> Result<TokenBag, StripError> {
        self.tokenize(0, markup, &NoopProgressSink)
    }

    /// The concatenated visible text that the token filter receives.
    pub fn visible_text(&self, markup: &str) -> Result<String, StripError> {
        Ok(join_fragments(&self.stripper.strip(markup)?))
    }

    fn tokenize(
        &self,
        job_id: JobId,
        markup: &str,
        sink: &dyn ProgressSink,
    ) -> Result<TokenBag, StripError> {
        sink.emit(EngineEvent::Progress(JobProgress::at(job_id, Stage::Stripping)));
        let started = Instant::now();
        let lines = self.stripper.strip(markup)?;
        engine_debug!(
            "job {} stripped to {} lines in {:?}",
            job_id,
            lines.len(),
            started.elapsed()
        );

        sink.emit(EngineEvent::Progress(JobProgress::at(job_id, Stage::Normalizing)));
        let started = Instant::now();
        let text = join_fragments(&lines);
        engine_debug!(
            "job {} normalized to {} chars in {:?}",
            job_id,
            text.len(),
            started.elapsed()
        );

        sink.emit(EngineEvent::Progress(JobProgress::at(job_id, Stage::Filtering)));
        let started = Instant::now();
        let bag = self.filter.filter(&text);
        engine_debug!(
            "job {} filtered to {} tokens in {:?}",
            job_id,
            bag.len(),
            started.elapsed()
        );

        sink.emit(EngineEvent::Progress(JobProgress {
            tokens: Some(bag.len()),
            ..JobProgress::at(job_id, Stage::Filtering)
        }));
        Ok(bag)
    }
}

/// URL in, [`Outcome`] out.
///
/// Fetch failures become [`Outcome::FetchFailed`]; decode and strip failures
/// are returned as `Err`.
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    processor: Arc<DocumentProcessor>,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, processor: Arc<DocumentProcessor>) -> Self {
        Self { fetcher, processor }
    }

    /// Fetches `url` and tokenizes it on the blocking pool.
    pub async fn run(
        &self,
        job_id: JobId,
        url: &str,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<Outcome, PipelineError> {
        let document = match self.fetcher.fetch(job_id, url, sink.as_ref()).await {
            Ok(document) => document,
            Err(err) => {
                engine_warn!("job {} fetch of {} failed: {}", job_id, url, err);
                return Ok(Outcome::FetchFailed(err));
            }
        };
        let processor = self.processor.clone();
        let bag = tokio::task::spawn_blocking(move || {
            processor.process(job_id, &document, sink.as_ref())
        })
        .await
        .map_err(|err| PipelineError::Aborted(err.to_string()))??;
        Ok(Outcome::Success(bag))
    }
}
