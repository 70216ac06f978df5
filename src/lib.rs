pub mod app;
pub mod domain;
pub mod storage;

pub use domain::models::{FilteredTools, Item, PanelEntry, Section, ToolShedRepository};
pub use domain::panel::{filter_tool_sections, filter_tools, PanelFilter, RankField};
pub use domain::results::{FilterError, ResultEntry};
