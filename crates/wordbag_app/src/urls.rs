use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use engine_logging::engine_debug;
use url::Url;

/// Key under which two URLs count as the same page.
///
/// Scheme and host are lowercased by parsing, the fragment is dropped and a
/// trailing slash on a non-root path is removed. Unparseable input is its own
/// key, so the fetcher still gets to report it as invalid.
pub fn normalize_url_for_dedupe(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(mut url) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };
    url.set_fragment(None);
    let path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        url.set_path(path.trim_end_matches('/'));
    }
    url.to_string()
}

/// Keeps the first occurrence of every distinct URL, in input order.
pub fn dedupe_urls<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| {
            let fresh = seen.insert(normalize_url_for_dedupe(url));
            if !fresh {
                engine_debug!("Skipping duplicate url {}", url);
            }
            fresh
        })
        .collect()
}

pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToOwned::to_owned)
        .collect()
}

/// Reads a URL list from a file, or from stdin when `path` is `-`.
pub fn read_url_list(path: &Path) -> anyhow::Result<Vec<String>> {
    let text = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read urls from stdin")?;
        buffer
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read url list {}", path.display()))?
    };
    Ok(parse_url_list(&text))
}
