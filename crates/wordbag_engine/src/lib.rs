//! Wordbag engine: fetching, decoding, markup stripping and job execution.
mod decode;
mod engine;
mod fetch;
mod pipeline;
mod strip;
mod types;

pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use fetch::{FetchSettings, Fetcher, NoopProgressSink, ProgressSink, ReqwestFetcher};
pub use pipeline::{DocumentProcessor, Pipeline, PipelineError};
pub use strip::{
    split_lines, DocumentParser, FragmentParser, MarkupStripper, ParserKind, ParserStrategy,
    StripError,
};
pub use types::{
    Document, EngineEvent, FailureKind, FetchError, FetchMetadata, JobId, JobProgress, Outcome,
    Stage,
};
