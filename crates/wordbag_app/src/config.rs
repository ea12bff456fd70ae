use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use engine_logging::engine_info;
use serde::{Deserialize, Serialize};
use wordbag_core::StopwordSet;
use wordbag_engine::{EngineConfig, FetchSettings, ParserKind};

use crate::cli::Cli;

/// Settings read from a RON file. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub language: String,
    pub extra_stopwords: Vec<String>,
    pub stopword_files: Vec<PathBuf>,
    pub fetch: FetchConfig,
    pub max_concurrent_jobs: usize,
    pub parsers: Vec<ParserKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            language: "en".to_string(),
            extra_stopwords: Vec::new(),
            stopword_files: Vec::new(),
            fetch: FetchConfig::from(&engine.fetch),
            max_concurrent_jobs: engine.max_concurrent_jobs,
            parsers: engine.parsers,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&FetchSettings::default())
    }
}

impl From<&FetchSettings> for FetchConfig {
    fn from(settings: &FetchSettings) -> Self {
        Self {
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            redirect_limit: settings.redirect_limit,
            max_bytes: settings.max_bytes,
            allowed_content_types: settings.allowed_content_types.clone(),
        }
    }
}

impl From<&FetchConfig> for FetchSettings {
    fn from(config: &FetchConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            redirect_limit: config.redirect_limit,
            max_bytes: config.max_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = ron::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        engine_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Config file (if any) with command-line overrides applied.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(language) = &cli.language {
            config.language = language.clone();
        }
        if let Some(path) = &cli.stopwords_file {
            config.stopword_files.push(path.clone());
        }
        if let Some(jobs) = cli.jobs {
            config.max_concurrent_jobs = jobs;
        }
        if let Some(timeout) = cli.timeout {
            config.fetch.request_timeout_secs = timeout;
        }
        Ok(config)
    }

    pub fn stopwords(&self) -> anyhow::Result<StopwordSet> {
        let mut set = StopwordSet::for_language(&self.language)?
            .with_extra(&self.extra_stopwords);
        for path in &self.stopword_files {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read stopwords {}", path.display()))?;
            set = set.with_list_text(&text);
        }
        engine_info!("Using {} stopwords ({})", set.len(), self.language);
        Ok(set)
    }

    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        anyhow::ensure!(!self.parsers.is_empty(), "at least one parser must be configured");
        Ok(EngineConfig {
            fetch: FetchSettings::from(&self.fetch),
            max_concurrent_jobs: self.max_concurrent_jobs,
            stopwords: Arc::new(self.stopwords()?),
            parsers: self.parsers.clone(),
        })
    }
}
