use std::collections::HashMap;
use std::sync::{Arc, Once};
use std::time::Duration;

use bytes::Bytes;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wordbag_core::StopwordSet;
use wordbag_engine::{
    Document, EngineConfig, EngineEvent, EngineHandle, FailureKind, FetchError, FetchMetadata,
    Fetcher, JobId, Outcome, PipelineError, ProgressSink, Stage,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Serves canned pages; unknown URLs fail like an unreachable host.
struct CannedFetcher {
    pages: HashMap<String, &'static str>,
}

impl CannedFetcher {
    fn new(pages: &[(&str, &'static str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, body)| (url.to_string(), *body))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(
        &self,
        _job_id: JobId,
        url: &str,
        _sink: &dyn ProgressSink,
    ) -> Result<Document, FetchError> {
        let body = self.pages.get(url).ok_or_else(|| FetchError {
            kind: FailureKind::Network,
            message: "connection refused".to_string(),
        })?;
        Ok(Document {
            bytes: Bytes::from_static(body.as_bytes()),
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: Some("text/html; charset=utf-8".to_string()),
                byte_len: body.len() as u64,
            },
        })
    }
}

fn config(max_concurrent_jobs: usize) -> EngineConfig {
    EngineConfig {
        max_concurrent_jobs,
        stopwords: Arc::new(StopwordSet::from_words(["and", "the"])),
        ..EngineConfig::default()
    }
}

/// Drains events until `jobs` completions arrived.
fn collect(
    engine: &EngineHandle,
    jobs: usize,
) -> (HashMap<JobId, Result<Outcome, PipelineError>>, Vec<(JobId, Stage)>) {
    let mut done = HashMap::new();
    let mut stages = Vec::new();
    while done.len() < jobs {
        match engine.recv_timeout(Duration::from_secs(10)) {
            Some(EngineEvent::Progress(progress)) => stages.push((progress.job_id, progress.stage)),
            Some(EngineEvent::JobCompleted { job_id, result, .. }) => {
                done.insert(job_id, result);
            }
            None => panic!("engine went quiet with {} of {jobs} jobs done", done.len()),
        }
    }
    (done, stages)
}

#[test]
fn runs_independent_jobs_to_completion() {
    init_logging();
    let fetcher = Arc::new(CannedFetcher::new(&[
        ("https://jobs.example/1", "<p>Rust and Go</p>"),
        ("https://jobs.example/2", "<p>Python and the SQL</p>"),
        ("https://jobs.example/3", "<p>Kotlin\0</p>"),
    ]));
    let mut engine = EngineHandle::with_fetcher(config(2), fetcher).unwrap();

    for job_id in 1..=4 {
        engine.enqueue(job_id, format!("https://jobs.example/{job_id}"));
    }
    let (done, stages) = collect(&engine, 4);
    engine.shutdown();

    let tokens = |job_id: JobId| {
        done[&job_id]
            .as_ref()
            .unwrap()
            .tokens()
            .unwrap()
            .clone()
            .into_vec()
    };
    assert_eq!(tokens(1), vec!["go", "rust"]);
    assert_eq!(tokens(2), vec!["python", "sql"]);
    assert_eq!(tokens(3), vec!["kotlin"]);
    assert!(matches!(
        done[&4],
        Ok(Outcome::FetchFailed(FetchError {
            kind: FailureKind::Network,
            ..
        }))
    ));

    for job_id in 1..=4 {
        assert!(stages.contains(&(job_id, Stage::Queued)));
        assert!(stages.contains(&(job_id, Stage::Done)));
    }
    assert!(stages.contains(&(1, Stage::Filtering)));
}

#[test]
fn single_permit_still_drains_queue() {
    init_logging();
    let fetcher = Arc::new(CannedFetcher::new(&[("https://a.example/", "<p>alpha</p>")]));
    let mut engine = EngineHandle::with_fetcher(config(1), fetcher).unwrap();

    for job_id in 0..5 {
        engine.enqueue(job_id, "https://a.example/");
    }
    let (done, _) = collect(&engine, 5);
    engine.shutdown();

    assert_eq!(done.len(), 5);
    assert!(done
        .values()
        .all(|result| matches!(result, Ok(Outcome::Success(bag)) if bag.contains("alpha"))));
}

#[test]
fn shutdown_without_jobs_returns() {
    let mut engine = EngineHandle::new(EngineConfig::default()).unwrap();
    engine.shutdown();
    assert!(engine.try_recv().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fetches_over_http() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posting"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<h1>Kotlin</h1><script>x()</script>", "text/html"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/posting", server.uri());
    let outcome = tokio::task::block_in_place(|| {
        let mut engine = EngineHandle::new(config(4)).unwrap();
        engine.enqueue(11, url.clone());
        let (mut done, _) = collect(&engine, 1);
        engine.shutdown();
        done.remove(&11).unwrap()
    });

    let bag = outcome.unwrap().tokens().unwrap().clone();
    assert!(bag.contains("kotlin"));
    assert!(!bag.contains("x"));
}
