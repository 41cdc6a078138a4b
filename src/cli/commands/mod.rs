//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves its scope (repos, labels) from flags and config
//! 2. Fetches and categorizes issues
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Fetching commands (summary, plan) are async because they involve
//! network I/O. Each handler spins up a tokio runtime and blocks on its
//! async implementation, keeping dispatch itself synchronous.

mod completion;
mod plan;
mod summary;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use plan::plan;
pub use summary::summary;

use anyhow::Result;

use crate::cli::args::Command;
use crate::config::Config;
use crate::github::GitHubClient;
use crate::ui::Verbosity;

/// Shared state for command handlers.
#[derive(Debug)]
pub struct Context {
    /// Output verbosity from global flags.
    pub verbosity: Verbosity,
    /// Token from the `--token` flag, if given.
    pub token: Option<String>,
    /// Loaded configuration.
    pub config: Config,
}

impl Context {
    /// Build a GitHub client. The `--token` flag wins over `GITHUB_TOKEN`
    /// and the config file.
    pub fn client(&self) -> GitHubClient {
        let token = self.token.clone().or_else(|| self.config.resolve_token());
        match &self.config.api_base {
            Some(base) => GitHubClient::with_api_base(token, base.clone()),
            None => GitHubClient::new(token),
        }
    }

    /// Repositories in scope: flags win over config.
    pub fn repos(&self, from_flags: &[String]) -> Vec<String> {
        if from_flags.is_empty() {
            self.config.repos.clone()
        } else {
            from_flags.to_vec()
        }
    }

    /// Labels in scope: flags win over config.
    pub fn labels(&self, from_flags: &[String]) -> Vec<String> {
        if from_flags.is_empty() {
            self.config.labels.clone()
        } else {
            from_flags.to_vec()
        }
    }
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Summary { repos, labels } => summary::summary(ctx, &repos, &labels),
        Command::Plan {
            repos,
            labels,
            epic,
            dimensions,
        } => plan::plan(ctx, &repos, &labels, epic.as_deref(), &dimensions),
        Command::Completion { shell } => completion::completion(shell),
    }
}
