use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use trimerge_merge::{
    load_inputs, MergeConfig, MergeLabels, MergeOutcome, MergeStats, ThreeWayMerger,
};

use crate::cli::*;

/// How a successful command finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Clean,
    Conflicts,
}

pub fn run_command(cli: Cli) -> anyhow::Result<Status> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args, &cli.format),
        Command::Config(args) => cmd_config(args, &cli.format),
    }
}

/// Build the effective configuration: defaults, then the config file, then flags.
pub fn resolve_config(policy: &PolicyArgs) -> anyhow::Result<MergeConfig> {
    let mut config = match &policy.config {
        Some(path) => MergeConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => MergeConfig::default(),
    };
    if let Some(window) = policy.lookahead {
        config.lookahead_window = window;
    }
    config.keep_older_on_mine_delete |= policy.keep_older_on_mine_delete;
    config.keep_older_on_yours_delete |= policy.keep_older_on_yours_delete;
    config.keep_older_on_either_delete |= policy.keep_older_on_either_delete;
    Ok(config)
}

#[derive(Serialize)]
struct MergeReport<'a> {
    clean: bool,
    labels: &'a MergeLabels,
    output: Option<&'a PathBuf>,
    lines: usize,
    stats: &'a MergeStats,
}

fn cmd_merge(args: MergeArgs, format: &OutputFormat) -> anyhow::Result<Status> {
    let config = resolve_config(&args.policy)?;
    let inputs = load_inputs(&args.older, &args.mine, &args.yours)?;
    let labels = inputs.labels();
    let outcome = ThreeWayMerger::new(config).merge_inputs(&inputs);

    write_output(&outcome, args.output.as_ref())?;

    match format {
        OutputFormat::Text => print_summary(&outcome),
        OutputFormat::Json => {
            let report = MergeReport {
                clean: !outcome.has_conflicts(),
                labels: &labels,
                output: args.output.as_ref(),
                lines: outcome.lines.len(),
                stats: &outcome.stats,
            };
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(if outcome.has_conflicts() {
        Status::Conflicts
    } else {
        Status::Clean
    })
}

fn write_output(outcome: &MergeOutcome, path: Option<&PathBuf>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output {}", path.display()))?;
            outcome
                .write_to(&mut BufWriter::new(file))
                .with_context(|| format!("writing output {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            outcome
                .write_to(&mut stdout.lock())
                .context("writing merged text to stdout")?;
        }
    }
    Ok(())
}

fn print_summary(outcome: &MergeOutcome) {
    let stats = &outcome.stats;
    if outcome.has_conflicts() {
        eprintln!(
            "{} {} conflict(s) in {} block(s)",
            "✗".red().bold(),
            stats.conflicts.to_string().red().bold(),
            stats.blocks()
        );
    } else {
        eprintln!("{} Merged cleanly ({} block(s))", "✓".green().bold(), stats.blocks());
    }
    let kept = stats.kept_older_on_mine_delete + stats.kept_older_on_yours_delete;
    if kept > 0 {
        eprintln!("  Kept older lines for {} deletion(s)", kept.to_string().yellow());
    }
    if stats.unsynchronized_tail {
        eprintln!("  {}", "No resynchronization point for the final block".dimmed());
    }
}

fn cmd_config(args: ConfigArgs, format: &OutputFormat) -> anyhow::Result<Status> {
    let config = resolve_config(&args.policy)?;
    match format {
        OutputFormat::Text => print!("{}", toml::to_string_pretty(&config)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(Status::Clean)
}
