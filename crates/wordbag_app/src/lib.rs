//! `wordbag` command-line driver.
pub mod cli;
pub mod config;
pub mod report;
pub mod urls;

use std::io::{self, Write};

use chrono::Utc;
use engine_logging::{engine_debug, engine_info, LogDestination};
use wordbag_engine::{EngineConfig, EngineEvent, EngineHandle, JobId, Outcome, PipelineError};

use crate::cli::{Cli, OutputFormat};
use crate::config::AppConfig;
use crate::report::{DocumentReport, DocumentStatus, Report};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(&cli);

    let config = AppConfig::resolve(&cli)?;
    let urls = collect_urls(&cli)?;
    let engine_config = config.engine_config()?;

    let results = harvest(engine_config, &urls)?;
    let documents = urls
        .into_iter()
        .zip(results)
        .map(|(url, result)| DocumentReport::new(url, result))
        .collect();
    let report = Report::build(Utc::now().to_rfc3339(), documents, cli.top);

    let mut stdout = io::stdout().lock();
    match cli.format {
        OutputFormat::Text => report.write_text(&mut stdout)?,
        OutputFormat::Json => report.write_json(&mut stdout)?,
    }
    stdout.flush()?;

    let failed = report.count(DocumentStatus::Failed);
    anyhow::ensure!(failed == 0, "{failed} document(s) could not be processed");
    Ok(())
}

fn init_logging(cli: &Cli) {
    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    engine_logging::initialize(engine_logging::level_for_verbosity(cli.verbose), destination);
}

fn collect_urls(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut urls = cli.urls.clone();
    if let Some(path) = &cli.input {
        urls.extend(urls::read_url_list(path)?);
    }
    let urls = urls::dedupe_urls(urls);
    anyhow::ensure!(!urls.is_empty(), "no urls to process");
    Ok(urls)
}

/// Runs every URL through the engine; results come back in input order.
pub fn harvest(
    config: EngineConfig,
    urls: &[String],
) -> anyhow::Result<Vec<Result<Outcome, PipelineError>>> {
    let mut engine = EngineHandle::new(config)?;
    for (index, url) in urls.iter().enumerate() {
        engine.enqueue(index as JobId, url.clone());
    }

    let mut results: Vec<Option<Result<Outcome, PipelineError>>> = vec![None; urls.len()];
    let mut remaining = urls.len();
    while remaining > 0 {
        let Some(event) = engine.recv() else {
            break;
        };
        if let EngineEvent::JobCompleted { job_id, url, result } = event {
            if let Ok(Outcome::FetchFailed(err)) = &result {
                engine_debug!("No result for {}: {}", url, err);
            }
            if let Some(slot) = results.get_mut(job_id as usize) {
                *slot = Some(result);
                remaining -= 1;
            }
        }
    }
    engine.shutdown();
    engine_info!("Processed {} documents", urls.len() - remaining);

    anyhow::ensure!(remaining == 0, "engine stopped with {remaining} jobs unfinished");
    Ok(results.into_iter().flatten().collect())
}
