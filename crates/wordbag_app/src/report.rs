use std::io::Write;

use serde::Serialize;
use wordbag_core::{DocumentFrequency, TokenBag, TokenCount};
use wordbag_engine::{Outcome, PipelineError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Ok,
    FetchFailed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentReport {
    pub url: String,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenBag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentReport {
    pub fn new(url: String, result: Result<Outcome, PipelineError>) -> Self {
        let (status, tokens, error) = match result {
            Ok(Outcome::Success(bag)) => (DocumentStatus::Ok, Some(bag), None),
            Ok(Outcome::FetchFailed(err)) => {
                (DocumentStatus::FetchFailed, None, Some(err.to_string()))
            }
            Err(err) => (DocumentStatus::Failed, None, Some(err.to_string())),
        };
        Self {
            url,
            status,
            tokens,
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub generated_utc: String,
    pub documents: Vec<DocumentReport>,
    pub top_tokens: Vec<TokenCount>,
}

impl Report {
    pub fn build(generated_utc: String, documents: Vec<DocumentReport>, top: usize) -> Self {
        let mut frequency = DocumentFrequency::new();
        frequency.extend(documents.iter().filter_map(|doc| doc.tokens.as_ref()));
        Self {
            generated_utc,
            top_tokens: frequency.top(top),
            documents,
        }
    }

    pub fn count(&self, status: DocumentStatus) -> usize {
        self.documents
            .iter()
            .filter(|doc| doc.status == status)
            .count()
    }

    /// Plain listing. A lone document prints just its tokens; several
    /// documents get a header each plus the cross-document ranking.
    pub fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        if let [only] = self.documents.as_slice() {
            for token in only.tokens.iter().flat_map(|bag| bag.iter()) {
                writeln!(out, "{token}")?;
            }
            return Ok(());
        }

        for doc in &self.documents {
            match (&doc.tokens, &doc.error) {
                (Some(tokens), _) => {
                    writeln!(out, "# {} ({} tokens)", doc.url, tokens.len())?;
                    for token in tokens.iter() {
                        writeln!(out, "{token}")?;
                    }
                }
                (None, Some(error)) => writeln!(out, "# {} ({error})", doc.url)?,
                (None, None) => writeln!(out, "# {}", doc.url)?,
            }
            writeln!(out)?;
        }

        let processed = self.count(DocumentStatus::Ok);
        writeln!(out, "# top tokens across {processed} documents")?;
        for entry in &self.top_tokens {
            writeln!(out, "{}\t{}", entry.documents, entry.token)?;
        }
        Ok(())
    }

    pub fn write_json(&self, out: &mut dyn Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}
