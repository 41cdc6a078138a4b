//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use a specific config file
//! - `--token <token>`: GitHub API token
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Feature Dashboard - track feature delivery across GitHub repositories
#[derive(Parser, Debug)]
#[command(name = "feature-dashboard")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// GitHub API token (overrides GITHUB_TOKEN and config)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a per-repository progress table for a feature
    #[command(
        name = "summary",
        long_about = "Show a per-repository progress table for a feature.\n\n\
            Searches the configured repositories for issues carrying every \
            given label, classifies them by state and type, and prints one \
            row per repository with counts, a delivery estimate, and the \
            percent complete.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Progress of a feature across the default repos
    fdash summary --label feature:reactions

    # Scope to specific repositories
    fdash summary --repo example-org/app --repo example-org/server \\
        --label feature:reactions

READING THE OUTPUT:
    Todo / WIP / Done count feature issues and p1 bugs. The percent
    column is '~' when a repo has no counted work. Delivery is the
    latest milestone due date over open tracked work, or 'n/a' when
    any of it is undated."
    )]
    Summary {
        /// Repository to search, as owner/name (repeatable)
        #[arg(long = "repo", value_name = "OWNER/NAME")]
        repos: Vec<String>,

        /// Label every issue must carry (repeatable)
        #[arg(long = "label", value_name = "LABEL")]
        labels: Vec<String>,
    },

    /// Show the feature plan as a grouped issue tree
    #[command(
        name = "plan",
        long_about = "Show the feature plan as a grouped issue tree.\n\n\
            Groups issues by the requested dimensions (story, phase, repo) \
            and prints each group with its percent complete. Groups that \
            don't apply to the data are skipped: phase grouping needs \
            phase:<n> labels, repo grouping needs more than one repository, \
            and story grouping needs --epic.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Plan for a labeled feature, grouped by repo
    fdash plan --label feature:reactions --by repo

    # Epic mode: stories come from the epic's milestone
    fdash plan --epic reactions --repo example-org/app

    # Phase-then-repo grouping
    fdash plan --label feature:reactions --by phase --by repo"
    )]
    Plan {
        /// Repository to search, as owner/name (repeatable)
        #[arg(long = "repo", value_name = "OWNER/NAME")]
        repos: Vec<String>,

        /// Label every issue must carry (repeatable)
        #[arg(long = "label", value_name = "LABEL")]
        labels: Vec<String>,

        /// Epic name; fetches the epic's stories and labeled issues
        #[arg(long)]
        epic: Option<String>,

        /// Grouping dimension, outermost first (story, phase, repo)
        #[arg(long = "by", value_name = "DIMENSION")]
        dimensions: Vec<String>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    fdash completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    fdash completion zsh >> ~/.zshrc

    # Fish
    fdash completion fish > ~/.config/fish/completions/fdash.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
