use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use tokio::sync::Semaphore;
use wordbag_core::{StopwordSet, TokenFilter};

use crate::fetch::{ChannelProgressSink, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
use crate::pipeline::{DocumentProcessor, Pipeline};
use crate::strip::{MarkupStripper, ParserKind};
use crate::{EngineEvent, JobId, JobProgress, Outcome, Stage};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub max_concurrent_jobs: usize,
    pub stopwords: Arc<StopwordSet>,
    pub parsers: Vec<ParserKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            max_concurrent_jobs: 8,
            stopwords: Arc::new(StopwordSet::english()),
            parsers: vec![ParserKind::Document, ParserKind::Fragment],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Enqueue { job_id: JobId, url: String },
}

/// Runs documents through the pipeline on a background runtime.
///
/// Jobs are independent: they share only the read-only stopword set, run
/// concurrently up to `max_concurrent_jobs`, and complete in any order.
pub struct EngineHandle {
    cmd_tx: Option<mpsc::Sender<EngineCommand>>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
        Self::with_fetcher(config, fetcher)
    }

    /// Like [`EngineHandle::new`] but with a caller-supplied fetcher.
    pub fn with_fetcher(config: EngineConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let processor = DocumentProcessor::new(
            MarkupStripper::from_kinds(&config.parsers),
            TokenFilter::new(config.stopwords.clone()),
        );
        let pipeline = Arc::new(Pipeline::new(fetcher, Arc::new(processor)));
        let permits = Arc::new(Semaphore::new(config.max_concurrent_jobs.max(1)));

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let mut in_flight = Vec::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Enqueue { job_id, url } => {
                        let _ = event_tx.send(EngineEvent::Progress(JobProgress::at(
                            job_id,
                            Stage::Queued,
                        )));
                        in_flight.retain(|job: &tokio::task::JoinHandle<()>| !job.is_finished());
                        in_flight.push(runtime.spawn(run_job(
                            pipeline.clone(),
                            permits.clone(),
                            job_id,
                            url,
                            event_tx.clone(),
                        )));
                    }
                }
            }
            runtime.block_on(async {
                for job in in_flight {
                    let _ = job.await;
                }
            });
            engine_info!("engine stopped");
        });

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            event_rx,
            worker: Some(worker),
        })
    }

    pub fn enqueue(&self, job_id: JobId, url: impl Into<String>) {
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(EngineCommand::Enqueue {
                job_id,
                url: url.into(),
            });
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the engine has stopped and
    /// every event was drained.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Stops accepting jobs and waits for in-flight jobs to finish.
    ///
    /// Events of those jobs stay readable through [`EngineHandle::recv`].
    pub fn shutdown(&mut self) {
        self.cmd_tx.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                engine_warn!("engine worker thread panicked");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_job(
    pipeline: Arc<Pipeline>,
    permits: Arc<Semaphore>,
    job_id: JobId,
    url: String,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let Ok(_permit) = permits.acquire_owned().await else {
        return;
    };
    engine_info!("job {} started: {}", job_id, url);
    let sink: Arc<dyn ProgressSink> = Arc::new(ChannelProgressSink::new(event_tx.clone()));
    let result = pipeline.run(job_id, &url, sink.clone()).await;

    match &result {
        Ok(Outcome::Success(bag)) => engine_info!("job {} done: {} tokens", job_id, bag.len()),
        Ok(Outcome::FetchFailed(_)) => engine_info!("job {} done without result", job_id),
        Err(err) => engine_warn!("job {} failed: {}", job_id, err),
    }

    sink.emit(EngineEvent::Progress(JobProgress {
        tokens: result
            .as_ref()
            .ok()
            .and_then(Outcome::tokens)
            .map(|bag| bag.len()),
        ..JobProgress::at(job_id, Stage::Done)
    }));
    let _ = event_tx.send(EngineEvent::JobCompleted {
        job_id,
        url,
        result,
    });
}
