use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "wordbag")]
#[command(about = "Reduce web pages to deduplicated bags of keywords", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Pages to fetch.
    #[arg(required_unless_present = "input")]
    pub urls: Vec<String>,
    /// File with one URL per line (`-` for stdin, `#` starts a comment).
    #[arg(long, short)]
    pub input: Option<PathBuf>,
    /// RON configuration file; flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Stopword language (code or English name).
    #[arg(long)]
    pub language: Option<String>,
    /// Extra stopwords file, one word per line.
    #[arg(long = "stopwords")]
    pub stopwords_file: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Number of most frequent tokens to report across documents.
    #[arg(long, default_value_t = 20)]
    pub top: usize,
    /// Maximum number of documents processed at once.
    #[arg(long)]
    pub jobs: Option<usize>,
    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,
    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}
