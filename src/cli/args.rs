//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    cat::CatCommands, completions::CompletionsArgs, explore::ExploreArgs, init::InitArgs,
    po::PoCommands, prod::ProdCommands, status::StatusArgs, sup::SupCommands,
};

#[derive(Parser)]
#[command(name = "stocktake")]
#[command(author, version, about = "Stocktake inventory toolkit")]
#[command(
    long_about = "A Unix-style toolkit for managing stock inventory as plain text files under git version control."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .stocktake/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new stocktake project
    Init(InitArgs),

    /// Category management (hierarchical classification)
    #[command(subcommand)]
    Cat(CatCommands),

    /// Product management (stock items)
    #[command(subcommand)]
    Prod(ProdCommands),

    /// Supplier management
    #[command(subcommand)]
    Sup(SupCommands),

    /// Purchase order management
    #[command(subcommand)]
    Po(PoCommands),

    /// Browse categories and products like a file explorer
    Explore(ExploreArgs),

    /// Show project status dashboard
    Status(StatusArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
