use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::domain::models::Section;
use crate::domain::results::ResultEntry;

pub fn load_layout(path: impl AsRef<Path>) -> Result<Vec<Section>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file: {}", path.display()))?;
    let layout = serde_json::from_str::<Vec<Section>>(&content)
        .with_context(|| format!("failed to parse layout file: {}", path.display()))?;

    debug!(path = %path.display(), sections = layout.len(), "loaded layout");
    Ok(layout)
}

/// Reads a results document. A JSON `null` means no search is active.
/// Files that are not JSON are read as one identifier per line.
pub fn load_results(path: impl AsRef<Path>) -> Result<Option<Vec<ResultEntry>>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read results file: {}", path.display()))?;

    if let Ok(results) = serde_json::from_str::<Option<Vec<ResultEntry>>>(&content) {
        return Ok(results);
    }

    let trimmed = content.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        // looks like JSON, so report the parse error instead of guessing
        serde_json::from_str::<Vec<ResultEntry>>(&content)
            .with_context(|| format!("failed to parse results file: {}", path.display()))?;
    }

    let results: Vec<ResultEntry> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ResultEntry::from)
        .collect();
    debug!(path = %path.display(), results = results.len(), "loaded plain-text results");
    Ok(Some(results))
}

pub fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("failed to serialize output")
    } else {
        serde_json::to_string(value).context("failed to serialize output")
    }
}
