use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use toolpanel::app::{run, Command};

#[derive(Debug, Parser)]
#[command(
    name = "toolpanel",
    version,
    about = "Filter and rank a tool panel against search results"
)]
struct Cli {
    #[arg(long, global = true, help = "Enable verbose debug logs")]
    debug: bool,
    #[arg(long, global = true, help = "Config file (defaults to ~/.config/toolpanel/config.toml)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Keep matching tools inside their sections
    Sections {
        #[arg(long, help = "Panel layout JSON file")]
        layout: PathBuf,
        #[arg(long, help = "Search results file; omit when no search is active")]
        results: Option<PathBuf>,
    },
    /// List matching tools as one ranked list
    Tools {
        #[arg(long, help = "Panel layout JSON file")]
        layout: PathBuf,
        #[arg(long, help = "Search results file; omit when no search is active")]
        results: Option<PathBuf>,
        #[arg(long, help = "Keep sections that are normally excluded, like Expression Tools")]
        include_excluded: bool,
    },
}

impl From<Commands> for Command {
    fn from(value: Commands) -> Self {
        match value {
            Commands::Sections { layout, results } => Self::Sections { layout, results },
            Commands::Tools {
                layout,
                results,
                include_excluded,
            } => Self::Tools {
                layout,
                results,
                include_excluded,
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli.command.into(), cli.config, cli.debug)
}
