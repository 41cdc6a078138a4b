//! github::models
//!
//! Serde wire shapes for the two GitHub APIs. Fields are limited to what
//! normalization consumes; everything else in the payloads is ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// --------------------------------------------------------------------------
// REST search endpoint
// --------------------------------------------------------------------------

/// Response of `GET /search/issues`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    pub items: Vec<SearchIssue>,
}

/// One issue (or pull request) from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchIssue {
    pub html_url: String,
    /// API URL of the owning repository; owner/repo are its last two
    /// path segments.
    pub repository_url: String,
    pub title: String,
    pub number: u64,
    pub state: String,
    #[serde(default)]
    pub labels: Vec<RestLabel>,
    #[serde(default)]
    pub assignees: Vec<RestUser>,
    /// Legacy singular assignee; consulted only when `assignees` is empty.
    pub assignee: Option<RestUser>,
    pub milestone: Option<RestMilestone>,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestMilestone {
    pub due_on: Option<DateTime<Utc>>,
}

// --------------------------------------------------------------------------
// GraphQL API
// --------------------------------------------------------------------------

/// Generic GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// Data section of the epic query.
#[derive(Debug, Clone, Deserialize)]
pub struct EpicQueryData {
    pub repository: Option<EpicRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpicRepository {
    pub milestones: MilestoneConnection,
    pub issues: IssueConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MilestoneConnection {
    pub nodes: Vec<GraphqlMilestone>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlMilestone {
    pub title: String,
    /// The milestone's issues are the epic's user stories.
    pub issues: StoryConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryConnection {
    pub nodes: Vec<StoryNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoryNode {
    pub number: u64,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueConnection {
    pub page_info: PageInfo,
    pub nodes: Vec<GraphqlIssue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One issue node from the epic query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlIssue {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub body: Option<String>,
    /// `OPEN`, `CLOSED`, or `MERGED`
    pub state: String,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub milestone: Option<GraphqlIssueMilestone>,
    pub labels: LabelConnection,
    pub assignees: AssigneeConnection,
    pub repository: Option<RepositoryRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlIssueMilestone {
    pub due_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelConnection {
    pub nodes: Vec<LabelNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabelNode {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssigneeConnection {
    pub nodes: Vec<AssigneeNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssigneeNode {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
    pub owner: OwnerRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerRef {
    pub login: String,
}
