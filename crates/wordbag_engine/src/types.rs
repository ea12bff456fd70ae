use std::fmt;

use bytes::Bytes;
use wordbag_core::TokenBag;

use crate::pipeline::PipelineError;

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Downloading,
    Decoding,
    Stripping,
    Normalizing,
    Filtering,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub job_id: JobId,
    pub stage: Stage,
    pub bytes: Option<u64>,
    pub tokens: Option<usize>,
}

impl JobProgress {
    pub(crate) fn at(job_id: JobId, stage: Stage) -> Self {
        Self {
            job_id,
            stage,
            bytes: None,
            tokens: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress(JobProgress),
    JobCompleted {
        job_id: JobId,
        url: String,
        result: Result<Outcome, PipelineError>,
    },
}

/// Raw bytes of a fetched page. Lives only for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub bytes: Bytes,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

/// Result of one pipeline run that did not hit a hard failure.
///
/// An unreachable host and a page without words are distinguishable: the
/// former is `FetchFailed`, the latter an empty `Success`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(TokenBag),
    FetchFailed(FetchError),
}

impl Outcome {
    pub fn tokens(&self) -> Option<&TokenBag> {
        match self {
            Outcome::Success(bag) => Some(bag),
            Outcome::FetchFailed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => match actual {
                Some(actual) => write!(f, "response too large ({actual} > {max_bytes} bytes)"),
                None => write!(f, "response too large (max {max_bytes} bytes)"),
            },
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
