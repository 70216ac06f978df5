use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_REPO_MARKER: &str = "/repos/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("malformed repository path '{id}': expected <owner>/<name>/... after '{marker}'")]
    MalformedRepoPath { id: String, marker: String },
}

/// One search hit as produced by the search backend. Both the bare
/// identifier and the `{ "id": ... }` object shapes are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResultEntry {
    Id(String),
    Object { id: String },
}

impl ResultEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Object { id } => id,
        }
    }
}

impl From<&str> for ResultEntry {
    fn from(value: &str) -> Self {
        Self::Id(value.to_string())
    }
}

impl From<String> for ResultEntry {
    fn from(value: String) -> Self {
        Self::Id(value)
    }
}

/// Repository coordinates pulled out of an identifier such as
/// `toolshed.g2.bx.psu.edu/repos/<owner>/<name>/<tool>/<version>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPath<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub tool: &'a str,
}

impl<'a> RepoPath<'a> {
    /// Returns `Ok(None)` when `id` carries no marker at all.
    pub fn parse(id: &'a str, marker: &str) -> Result<Option<Self>, FilterError> {
        let Some((_, rest)) = id.split_once(marker) else {
            return Ok(None);
        };

        let mut segments = rest.split('/');
        let malformed = || FilterError::MalformedRepoPath {
            id: id.to_string(),
            marker: marker.to_string(),
        };
        let owner = segments.next().ok_or_else(malformed)?;
        let name = segments.next().ok_or_else(malformed)?;
        let tool = segments.next().ok_or_else(malformed)?;
        if name.is_empty() {
            return Err(malformed());
        }

        Ok(Some(Self { owner, name, tool }))
    }
}

/// Result entries expanded with synthetic repository-name entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedResults {
    entries: Vec<ResultEntry>,
}

impl NormalizedResults {
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        tool_name_exists_in_results(id, &self.entries)
    }

    /// Rank of `id`: index of its first occurrence, `None` when absent.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }
}

pub fn normalize_results(
    results: &[ResultEntry],
    marker: &str,
) -> Result<NormalizedResults, FilterError> {
    let mut entries = Vec::with_capacity(results.len());
    for result in results {
        entries.push(result.clone());
        if let Some(repo) = RepoPath::parse(result.id(), marker)? {
            debug!(id = result.id(), repository = repo.name, "expanded repository result");
            entries.push(ResultEntry::Id(repo.name.to_string()));
        }
    }

    Ok(NormalizedResults { entries })
}

pub fn tool_name_exists_in_results(tool_name: &str, results: &[ResultEntry]) -> bool {
    results.iter().any(|entry| entry.id() == tool_name)
}
