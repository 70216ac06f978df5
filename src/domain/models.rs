use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolShedRepository {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolShedRepository {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// A single selectable tool inside a panel section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_shed_repository: Option<ToolShedRepository>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: None,
            tool_shed_repository: None,
            score: None,
            extra: Map::new(),
        }
    }

    /// Items carrying display text are labels, not id-matchable tools.
    pub fn has_text(&self) -> bool {
        non_empty(self.text.as_deref())
    }

    pub fn repository_name(&self) -> Option<&str> {
        self.tool_shed_repository
            .as_ref()
            .map(|repo| repo.name.as_str())
    }

    pub fn score_key(&self) -> Option<&str> {
        self.score.as_ref().and_then(Value::as_str)
    }
}

/// A named grouping of tools, or a directly selectable shortcut when it has
/// no `elems`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elems: Option<Vec<Item>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Section {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            text: None,
            elems: None,
            extra: Map::new(),
        }
    }

    pub fn with_elems(id: impl Into<String>, elems: Vec<Item>) -> Self {
        Self {
            elems: Some(elems),
            ..Self::new(id)
        }
    }

    pub fn has_text(&self) -> bool {
        non_empty(self.text.as_deref())
    }

    pub fn has_elems(&self) -> bool {
        self.elems.as_ref().is_some_and(|elems| !elems.is_empty())
    }

    pub fn first_elem(&self) -> Option<&Item> {
        self.elems.as_ref().and_then(|elems| elems.first())
    }

    pub fn score_key(&self) -> Option<&str> {
        self.extra.get("score").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PanelEntry {
    Tool(Item),
    Section(Section),
}

impl PanelEntry {
    pub fn id(&self) -> &str {
        match self {
            Self::Tool(item) => &item.id,
            Self::Section(section) => &section.id,
        }
    }

    pub fn score_key(&self) -> Option<&str> {
        match self {
            Self::Tool(item) => item.score_key(),
            Self::Section(section) => section.score_key(),
        }
    }

    pub fn as_tool(&self) -> Option<&Item> {
        match self {
            Self::Tool(item) => Some(item),
            Self::Section(_) => None,
        }
    }
}

/// Output of a flat tool search.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FilteredTools {
    /// No search is active; the layout minus excluded sections.
    Unfiltered(Vec<Section>),
    Ranked(Vec<PanelEntry>),
}

impl FilteredTools {
    pub fn len(&self) -> usize {
        match self {
            Self::Unfiltered(sections) => sections.len(),
            Self::Ranked(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ranked_ids(&self) -> Vec<&str> {
        match self {
            Self::Unfiltered(_) => Vec::new(),
            Self::Ranked(entries) => entries.iter().map(PanelEntry::id).collect(),
        }
    }
}

fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
