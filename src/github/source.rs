//! github::source
//!
//! The fetch seam between commands and the GitHub API.

use async_trait::async_trait;

use crate::core::issue::{Issue, UserStory};

use super::client::{GitHubClient, GitHubError};

/// Everything an epic fetch returns: the epic's user stories (in plan
/// order) and the issues labeled with the epic name.
#[derive(Debug, Clone, Default)]
pub struct EpicFetch {
    pub stories: Vec<UserStory>,
    pub issues: Vec<Issue>,
}

/// A source of normalized issues.
///
/// Commands depend on this trait rather than on `GitHubClient` directly
/// so tests can substitute canned data without a server.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Search issues matching every label across the listed repos.
    async fn search_issues(
        &self,
        repos: &[String],
        labels: &[String],
    ) -> Result<Vec<Issue>, GitHubError>;

    /// Fetch an epic's stories and task issues.
    async fn fetch_epic(&self, epic: &str, repos: &[String]) -> Result<EpicFetch, GitHubError>;
}

#[async_trait]
impl IssueSource for GitHubClient {
    async fn search_issues(
        &self,
        repos: &[String],
        labels: &[String],
    ) -> Result<Vec<Issue>, GitHubError> {
        GitHubClient::search_issues(self, repos, labels).await
    }

    async fn fetch_epic(&self, epic: &str, repos: &[String]) -> Result<EpicFetch, GitHubError> {
        GitHubClient::fetch_epic(self, epic, repos).await
    }
}
