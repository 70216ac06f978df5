use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::domain::panel::PanelFilter;
use crate::storage::config::RuntimeConfig;
use crate::storage::documents::{load_layout, load_results, render_json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Filter sections in place, keeping the panel grouping.
    Sections {
        layout: PathBuf,
        results: Option<PathBuf>,
    },
    /// Flatten matches into a single ranked list.
    Tools {
        layout: PathBuf,
        results: Option<PathBuf>,
        include_excluded: bool,
    },
}

impl Command {
    fn layout_path(&self) -> &PathBuf {
        match self {
            Self::Sections { layout, .. } | Self::Tools { layout, .. } => layout,
        }
    }

    fn results_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Sections { results, .. } | Self::Tools { results, .. } => results.as_ref(),
        }
    }
}

/// Runs one command against `config` and returns the rendered JSON.
pub fn execute(command: &Command, config: &RuntimeConfig) -> Result<String> {
    let layout = load_layout(command.layout_path())?;
    let results = command.results_path().map(load_results).transpose()?.flatten();
    debug!(
        sections = layout.len(),
        results = results.as_ref().map(Vec::len),
        "running {}",
        command_name(command)
    );

    let mut filter = config.panel_filter();
    match command {
        Command::Sections { .. } => {
            let sections = filter
                .filter_tool_sections(&layout, results.as_deref())
                .context("filter tool sections")?;
            info!(kept = sections.len(), "sections filtered");
            render_json(&sections, config.output.pretty)
        }
        Command::Tools {
            include_excluded, ..
        } => {
            if *include_excluded {
                filter = PanelFilter {
                    excluded_sections: Vec::new(),
                    ..filter
                };
            }
            let tools = filter
                .filter_tools(&layout, results.as_deref())
                .context("filter tools")?;
            info!(matched = tools.len(), "tools filtered");
            render_json(&tools, config.output.pretty)
        }
    }
}

pub fn run(command: Command, config_path: Option<PathBuf>, debug: bool) -> Result<()> {
    init_tracing(debug);

    let config = match config_path {
        Some(path) => RuntimeConfig::load_from_path(&path),
        None => RuntimeConfig::load(),
    }
    .context("load runtime config")?;

    let output = execute(&command, &config)?;
    writeln!(io::stdout().lock(), "{output}").context("write output")?;
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Sections { .. } => "sections",
        Command::Tools { .. } => "tools",
    }
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "toolpanel=debug" } else { "toolpanel=info" };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}
