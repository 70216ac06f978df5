use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::domain::panel::{PanelFilter, RankField, EXPRESSION_TOOLS_SECTION};
use crate::domain::results::DEFAULT_REPO_MARKER;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub excluded_sections: Vec<String>,
    pub repo_marker: String,
    pub rank_by: RankField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig {
                excluded_sections: vec![EXPRESSION_TOOLS_SECTION.to_string()],
                repo_marker: DEFAULT_REPO_MARKER.to_string(),
                rank_by: RankField::default(),
            },
            output: OutputConfig { pretty: true },
        }
    }
}

impl RuntimeConfig {
    pub fn default_path() -> PathBuf {
        env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".config/toolpanel/config.toml")
    }

    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        config.merge_env()?;
        Ok(config)
    }

    pub fn panel_filter(&self) -> PanelFilter {
        PanelFilter {
            excluded_sections: self.filter.excluded_sections.clone(),
            repo_marker: self.filter.repo_marker.clone(),
            rank_by: self.filter.rank_by,
        }
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading config file: {}", path.display()))?;
        self.merge_toml_text(&content)
            .with_context(|| format!("failed parsing config TOML: {}", path.display()))
    }

    fn merge_toml_text(&mut self, content: &str) -> Result<()> {
        let mut section = String::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line = strip_comment(raw_line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && !line.contains('=') {
                if !line.ends_with(']') {
                    return Err(anyhow!("line {}: invalid section syntax", idx + 1));
                }
                section = line[1..line.len() - 1].trim().to_string();
                continue;
            }

            let (key, value_raw) = line
                .split_once('=')
                .ok_or_else(|| anyhow!("line {}: expected key=value", idx + 1))?;
            let key = key.trim();
            let value = parse_value(value_raw.trim())
                .with_context(|| format!("line {}: invalid value", idx + 1))?;

            self.apply_file_value(&section, key, value)
                .with_context(|| format!("line {}: invalid {section}.{key}", idx + 1))?;
        }

        Ok(())
    }

    fn apply_file_value(&mut self, section: &str, key: &str, value: TomlValue) -> Result<()> {
        match (section, key) {
            ("filter", "excluded_sections") => {
                self.filter.excluded_sections = value.into_list()?;
            }
            ("filter", "repo_marker") => {
                self.filter.repo_marker = parse_marker(value.into_string()?)?;
            }
            ("filter", "rank_by") => {
                self.filter.rank_by = parse_rank_field(value.as_str()?)?;
            }
            ("output", "pretty") => {
                self.output.pretty = value.as_bool()?;
            }
            _ => {}
        }

        Ok(())
    }

    fn merge_env(&mut self) -> Result<()> {
        if let Ok(value) = env::var("TOOLPANEL_EXCLUDED_SECTIONS") {
            self.filter.excluded_sections = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Ok(marker) = env::var("TOOLPANEL_REPO_MARKER") {
            self.filter.repo_marker = parse_marker(marker)
                .with_context(|| "invalid TOOLPANEL_REPO_MARKER".to_string())?;
        }
        if let Ok(rank_by) = env::var("TOOLPANEL_RANK_BY") {
            self.filter.rank_by = parse_rank_field(&rank_by)
                .with_context(|| "invalid TOOLPANEL_RANK_BY".to_string())?;
        }
        if let Ok(pretty) = env::var("TOOLPANEL_OUTPUT_PRETTY") {
            self.output.pretty = parse_bool(&pretty)
                .with_context(|| "invalid TOOLPANEL_OUTPUT_PRETTY".to_string())?;
        }

        Ok(())
    }
}

fn parse_rank_field(value: &str) -> Result<RankField> {
    match value.trim().to_ascii_lowercase().as_str() {
        "score" => Ok(RankField::Score),
        "id" => Ok(RankField::Id),
        _ => Err(anyhow!("invalid rank field '{value}' (expected score or id)")),
    }
}

fn parse_marker(value: String) -> Result<String> {
    if value.trim().is_empty() {
        Err(anyhow!("repository marker cannot be empty"))
    } else {
        Ok(value)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(anyhow!("invalid boolean '{value}'")),
    }
}

fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..idx],
            _ => {}
        }
    }
    line
}

#[derive(Debug, Clone)]
enum TomlValue {
    String(String),
    Boolean(bool),
    List(Vec<String>),
}

impl TomlValue {
    fn as_str(&self) -> Result<&str> {
        match self {
            Self::String(value) => Ok(value.as_str()),
            _ => Err(anyhow!("expected string value")),
        }
    }

    fn into_string(self) -> Result<String> {
        match self {
            Self::String(value) => Ok(value),
            _ => Err(anyhow!("expected string value")),
        }
    }

    fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Boolean(value) => Ok(*value),
            Self::String(value) => parse_bool(value),
            Self::List(_) => Err(anyhow!("expected boolean value")),
        }
    }

    fn into_list(self) -> Result<Vec<String>> {
        match self {
            Self::List(values) => Ok(values),
            // a bare string is a one-element list
            Self::String(value) => Ok(vec![value]),
            Self::Boolean(_) => Err(anyhow!("expected array of strings")),
        }
    }
}

fn parse_value(value: &str) -> Result<TomlValue> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        if !trimmed.ends_with(']') {
            return Err(anyhow!("unterminated array"));
        }
        return parse_string_list(&trimmed[1..trimmed.len() - 1]).map(TomlValue::List);
    }

    if trimmed.starts_with('"') {
        return parse_quoted(trimmed).map(TomlValue::String);
    }

    match trimmed {
        "true" => return Ok(TomlValue::Boolean(true)),
        "false" => return Ok(TomlValue::Boolean(false)),
        _ => {}
    }

    Ok(TomlValue::String(trimmed.to_string()))
}

fn parse_quoted(value: &str) -> Result<String> {
    if !value.ends_with('"') || value.len() < 2 {
        return Err(anyhow!("unterminated string"));
    }
    Ok(value[1..value.len() - 1].to_string())
}

fn parse_string_list(body: &str) -> Result<Vec<String>> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in body.chars() {
        match ch {
            '"' => {
                if in_quotes {
                    values.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            }
            _ if in_quotes => current.push(ch),
            ',' => {}
            c if c.is_whitespace() => {}
            other => return Err(anyhow!("unexpected '{other}' in array, expected quoted strings")),
        }
    }

    if in_quotes {
        return Err(anyhow!("unterminated string in array"));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_file_values() {
        let mut config = RuntimeConfig::default();
        config
            .merge_toml_text(
                r#"
                    [filter]
                    excluded_sections = ["Expression Tools", "Collection Operations"]
                    repo_marker = "/shed/"
                    rank_by = "id"

                    [output]
                    pretty = false
                "#,
            )
            .expect("merge config text");

        assert_eq!(
            config.filter.excluded_sections,
            vec![
                "Expression Tools".to_string(),
                "Collection Operations".to_string()
            ]
        );
        assert_eq!(config.filter.repo_marker, "/shed/");
        assert_eq!(config.filter.rank_by, RankField::Id);
        assert!(!config.output.pretty);
    }

    #[test]
    fn empty_array_clears_exclusions() {
        let mut config = RuntimeConfig::default();
        config
            .merge_toml_text("[filter]\nexcluded_sections = []\n")
            .expect("merge empty array");
        assert!(config.filter.excluded_sections.is_empty());
    }

    #[test]
    fn comment_inside_quotes_is_kept() {
        let mut config = RuntimeConfig::default();
        config
            .merge_toml_text("[filter]\nexcluded_sections = [\"Tools #1\"] # trailing\n")
            .expect("merge quoted hash");
        assert_eq!(config.filter.excluded_sections, vec!["Tools #1".to_string()]);
    }

    #[test]
    fn invalid_rank_field_is_rejected() {
        let mut config = RuntimeConfig::default();
        let err = config
            .merge_toml_text(
                r#"
                    [filter]
                    rank_by = "relevance"
                "#,
            )
            .expect_err("invalid rank field should fail");
        assert!(format!("{err:#}").contains("invalid rank field"));
    }

    #[test]
    fn empty_marker_is_rejected() {
        let mut config = RuntimeConfig::default();
        let err = config
            .merge_toml_text("[filter]\nrepo_marker = \"\"\n")
            .expect_err("empty marker should fail");
        assert!(format!("{err:#}").contains("cannot be empty"));
    }

    #[test]
    fn panel_filter_mirrors_filter_section() {
        let config = RuntimeConfig::default();
        assert_eq!(config.panel_filter(), PanelFilter::default());
    }
}
