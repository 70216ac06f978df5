use tracing::debug;

use crate::domain::models::{FilteredTools, Item, PanelEntry, Section};
use crate::domain::results::{
    normalize_results, FilterError, NormalizedResults, ResultEntry, DEFAULT_REPO_MARKER,
};

pub const EXPRESSION_TOOLS_SECTION: &str = "Expression Tools";

/// Field looked up in the results list when ranking matched tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankField {
    #[default]
    Score,
    Id,
}

impl RankField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Id => "id",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelFilter {
    pub excluded_sections: Vec<String>,
    pub repo_marker: String,
    pub rank_by: RankField,
}

impl Default for PanelFilter {
    fn default() -> Self {
        Self {
            excluded_sections: vec![EXPRESSION_TOOLS_SECTION.to_string()],
            repo_marker: DEFAULT_REPO_MARKER.to_string(),
            rank_by: RankField::default(),
        }
    }
}

impl PanelFilter {
    /// Keeps only the tools and sections present in `results`, ordered by
    /// result rank. `None` means no search is active.
    pub fn filter_tool_sections(
        &self,
        layout: &[Section],
        results: Option<&[ResultEntry]>,
    ) -> Result<Vec<Section>, FilterError> {
        let Some(results) = results else {
            return Ok(layout.to_vec());
        };
        let results = normalize_results(results, &self.repo_marker)?;

        let mut filtered = Vec::new();
        for section in layout {
            let mut elems = matching_items(section, &results);
            self.sort_tools_by_results_score(&mut elems, &results);

            let matched_directly = !section.has_text() && results.contains(&section.id);
            if elems.is_empty() && !matched_directly {
                continue;
            }

            filtered.push(Section {
                elems: Some(elems),
                ..section.clone()
            });
        }

        sort_sections_by_first_tool(&mut filtered, &results);
        debug!(
            sections = layout.len(),
            kept = filtered.len(),
            results = results.len(),
            "filtered tool sections"
        );
        Ok(filtered)
    }

    /// Flattens every matching tool (and directly matched shortcut section)
    /// into one ranked list, skipping excluded sections.
    pub fn filter_tools(
        &self,
        layout: &[Section],
        results: Option<&[ResultEntry]>,
    ) -> Result<FilteredTools, FilterError> {
        let layout: Vec<&Section> = layout
            .iter()
            .filter(|section| !self.is_excluded(section))
            .collect();

        let Some(results) = results else {
            return Ok(FilteredTools::Unfiltered(
                layout.into_iter().cloned().collect(),
            ));
        };
        let results = normalize_results(results, &self.repo_marker)?;
        if results.is_empty() {
            return Ok(FilteredTools::Ranked(Vec::new()));
        }

        let mut tools = Vec::new();
        for section in layout {
            match &section.elems {
                Some(_) => tools.extend(
                    matching_items(section, &results)
                        .into_iter()
                        .map(PanelEntry::Tool),
                ),
                None if !section.has_text() && results.contains(&section.id) => {
                    tools.push(PanelEntry::Section(section.clone()));
                }
                None => {}
            }
        }

        self.sort_entries(&mut tools, &results);
        debug!(
            matched = tools.len(),
            results = results.len(),
            rank_by = self.rank_by.as_str(),
            "filtered tools"
        );
        Ok(FilteredTools::Ranked(tools))
    }

    pub fn is_excluded(&self, section: &Section) -> bool {
        section.name.as_deref().is_some_and(|name| {
            self.excluded_sections
                .iter()
                .any(|excluded| excluded == name)
        })
    }

    fn sort_tools_by_results_score(&self, tools: &mut [Item], results: &NormalizedResults) {
        match self.rank_by {
            RankField::Score => tools.sort_by_key(|tool| rank(tool.score_key(), results)),
            RankField::Id => tools.sort_by_key(|tool| results.position(&tool.id)),
        }
    }

    fn sort_entries(&self, entries: &mut [PanelEntry], results: &NormalizedResults) {
        match self.rank_by {
            RankField::Score => entries.sort_by_key(|entry| rank(entry.score_key(), results)),
            RankField::Id => entries.sort_by_key(|entry| results.position(entry.id())),
        }
    }
}

pub fn filter_tool_sections(
    layout: &[Section],
    results: Option<&[ResultEntry]>,
) -> Result<Vec<Section>, FilterError> {
    PanelFilter::default().filter_tool_sections(layout, results)
}

pub fn filter_tools(
    layout: &[Section],
    results: Option<&[ResultEntry]>,
) -> Result<FilteredTools, FilterError> {
    PanelFilter::default().filter_tools(layout, results)
}

fn tool_matches(tool: &Item, results: &NormalizedResults) -> bool {
    (!tool.has_text() && results.contains(&tool.id))
        || tool
            .repository_name()
            .is_some_and(|name| results.contains(name))
}

fn matching_items(section: &Section, results: &NormalizedResults) -> Vec<Item> {
    section
        .elems
        .iter()
        .flatten()
        .filter(|tool| tool_matches(tool, results))
        .cloned()
        .collect()
}

// `None` orders before every found position, like an index of -1.
fn rank(key: Option<&str>, results: &NormalizedResults) -> Option<usize> {
    key.and_then(|key| results.position(key))
}

/// Sections without tools hold their slot; the rest are stably sorted by the
/// rank of their first tool among the remaining slots.
fn sort_sections_by_first_tool(sections: &mut [Section], results: &NormalizedResults) {
    let slots: Vec<usize> = sections
        .iter()
        .enumerate()
        .filter(|(_, section)| section.has_elems())
        .map(|(idx, _)| idx)
        .collect();

    let mut ranked: Vec<(Option<usize>, Section)> = slots
        .iter()
        .map(|&idx| {
            let section = sections[idx].clone();
            let key = section
                .first_elem()
                .and_then(|tool| results.position(&tool.id));
            (key, section)
        })
        .collect();
    ranked.sort_by_key(|(key, _)| *key);

    for (slot, (_, section)) in slots.into_iter().zip(ranked) {
        sections[slot] = section;
    }
}
