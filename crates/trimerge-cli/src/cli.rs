use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "trimerge",
    about = "Three-way line merge with diff3-style conflict markers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge MINE and YOURS against their common ancestor OLDER
    Merge(MergeArgs),
    /// Print the effective merge configuration
    Config(ConfigArgs),
}

/// Options shared by every command that builds a merge configuration.
#[derive(Args, Clone, Debug, Default)]
pub struct PolicyArgs {
    /// TOML file with merge settings; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Lines searched ahead for a resynchronization point
    #[arg(long, value_name = "N")]
    pub lookahead: Option<usize>,
    /// Keep older lines that mine deleted
    #[arg(long)]
    pub keep_older_on_mine_delete: bool,
    /// Keep older lines that yours deleted
    #[arg(long)]
    pub keep_older_on_yours_delete: bool,
    /// Keep older lines that either side deleted
    #[arg(long)]
    pub keep_older_on_either_delete: bool,
}

#[derive(Args)]
pub struct MergeArgs {
    pub older: PathBuf,
    pub mine: PathBuf,
    pub yours: PathBuf,
    /// Write the merged text here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,
}
