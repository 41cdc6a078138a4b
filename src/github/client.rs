//! github::client
//!
//! The GitHub HTTP client: REST search with pagination and the GraphQL
//! epic query.
//!
//! # Scope
//!
//! Deliberately thin. No retry/backoff, no rate-limit handling, no token
//! refresh - a hit rate limit or expired token surfaces as an error for
//! the caller to display. The dashboard treats "fetch failed" and "no
//! issues" identically downstream, so there is nothing for the client to
//! recover here.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::issue::{numbered_label_value, Issue, UserStory};

use super::models::{EpicQueryData, GraphqlResponse, SearchResponse};
use super::normalize::{issue_from_graphql, issue_from_rest, NormalizeError};
use super::source::EpicFetch;

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "feature-dashboard-cli";

/// Search results per page (GitHub's maximum).
const PER_PAGE: usize = 100;

/// Issues per GraphQL page.
const GRAPHQL_PAGE: u32 = 100;

/// Errors from GitHub API operations.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Authentication failed (invalid token, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// A repository spec that is not `owner/name`.
    #[error("invalid repository spec '{0}' (expected owner/name)")]
    InvalidRepo(String),

    /// A fetched record could not be normalized; fails the batch.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// GitHub API client.
///
/// Holds an optional static bearer token; unauthenticated clients work
/// against public repositories at a lower rate limit.
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("has_token", &self.token.is_some())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubClient {
    /// Create a client against the public GitHub API.
    pub fn new(token: Option<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Create a client with a custom API base URL (GitHub Enterprise,
    /// test servers).
    pub fn with_api_base(token: Option<String>, api_base: impl Into<String>) -> Self {
        GitHubClient {
            client: Client::new(),
            token,
            api_base: api_base.into(),
        }
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, GitHubError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| GitHubError::AuthFailed("token is not a valid header value".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Handle an API response, mapping errors appropriately.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, GitHubError> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| GitHubError::ApiError {
                status: status.as_u16(),
                message: format!("failed to parse response: {e}"),
            });
        }

        let rate_limited = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "0")
            .unwrap_or(false);

        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|e| e.message)
            .unwrap_or_else(|_| "unknown error".to_string());

        Err(match status {
            StatusCode::UNAUTHORIZED => GitHubError::AuthFailed("invalid or expired token".into()),
            StatusCode::FORBIDDEN if rate_limited => GitHubError::RateLimited,
            StatusCode::FORBIDDEN => GitHubError::AuthFailed(message),
            StatusCode::NOT_FOUND => GitHubError::NotFound(message),
            _ => GitHubError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Search issues across repositories and labels via the REST search
    /// endpoint, paging through all results.
    ///
    /// The search string is `repo:<r> ... label:<l> ...`, matching issues
    /// carrying every label in every listed repository.
    pub async fn search_issues(
        &self,
        repos: &[String],
        labels: &[String],
    ) -> Result<Vec<Issue>, GitHubError> {
        let search: Vec<String> = repos
            .iter()
            .map(|repo| format!("repo:{repo}"))
            .chain(labels.iter().map(|label| format!("label:{label}")))
            .collect();
        let search = search.join(" ");

        let mut issues = Vec::new();
        let mut page: u32 = 1;
        loop {
            let url = format!("{}/search/issues", self.api_base);
            let response = self
                .client
                .get(&url)
                .headers(self.headers()?)
                .query(&[
                    ("q", search.as_str()),
                    ("per_page", "100"),
                    ("page", &page.to_string()),
                ])
                .send()
                .await
                .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

            let result: SearchResponse = self.handle_response(response).await?;
            let fetched = result.items.len();
            for raw in result.items {
                issues.push(issue_from_rest(raw)?);
            }

            if fetched < PER_PAGE || issues.len() as u64 >= result.total_count {
                break;
            }
            page += 1;
        }

        Ok(issues)
    }

    /// Fetch an epic: its user stories and task issues, across repos.
    ///
    /// Per repository, one GraphQL query returns the milestone matching
    /// the epic name (its issues are the user stories, in query order)
    /// and a page of issues labeled with the epic name. Task issues link
    /// to stories via their `story:<n>` label.
    pub async fn fetch_epic(
        &self,
        epic: &str,
        repos: &[String],
    ) -> Result<EpicFetch, GitHubError> {
        let mut stories: Vec<UserStory> = Vec::new();
        let mut raw_issues = Vec::new();

        for repo in repos {
            let Some((owner, name)) = repo.split_once('/') else {
                return Err(GitHubError::InvalidRepo(repo.clone()));
            };

            let mut cursor: Option<String> = None;
            loop {
                let data = self.epic_page(owner, name, epic, cursor.as_deref()).await?;
                let Some(repository) = data.repository else {
                    return Err(GitHubError::NotFound(repo.clone()));
                };

                // Stories come from the first page only; the milestone
                // connection does not paginate.
                if cursor.is_none() {
                    for milestone in repository.milestones.nodes {
                        if milestone.title != epic {
                            continue;
                        }
                        for story in milestone.issues.nodes {
                            stories.push(UserStory {
                                number: story.number,
                                title: story.title,
                                url: story.url,
                            });
                        }
                    }
                }

                let connection = repository.issues;
                raw_issues.extend(connection.nodes);
                if connection.page_info.has_next_page {
                    cursor = connection.page_info.end_cursor;
                } else {
                    break;
                }
            }
        }

        let mut issues = Vec::with_capacity(raw_issues.len());
        for raw in raw_issues {
            let label_names: Vec<&str> =
                raw.labels.nodes.iter().map(|l| l.name.as_str()).collect();
            let story = numbered_label_value(&label_names, "story").and_then(|number| {
                stories.iter().find(|story| story.number == number).cloned()
            });
            issues.push(issue_from_graphql(raw, story)?);
        }

        Ok(EpicFetch { stories, issues })
    }

    /// Run one page of the epic query.
    async fn epic_page(
        &self,
        owner: &str,
        name: &str,
        epic: &str,
        cursor: Option<&str>,
    ) -> Result<EpicQueryData, GitHubError> {
        const QUERY: &str = r#"
            query($owner: String!, $name: String!, $epic: String!, $first: Int!, $after: String) {
                repository(owner: $owner, name: $name) {
                    milestones(query: $epic, first: 10) {
                        nodes {
                            title
                            issues(first: 100) {
                                nodes { number title url }
                            }
                        }
                    }
                    issues(labels: [$epic], first: $first, after: $after) {
                        pageInfo { hasNextPage endCursor }
                        nodes {
                            number
                            title
                            url
                            body
                            state
                            createdAt
                            closedAt
                            milestone { dueOn }
                            labels(first: 50) { nodes { name } }
                            assignees(first: 20) { nodes { login } }
                            repository { name owner { login } }
                        }
                    }
                }
            }"#;

        let body = serde_json::json!({
            "query": QUERY,
            "variables": {
                "owner": owner,
                "name": name,
                "epic": epic,
                "first": GRAPHQL_PAGE,
                "after": cursor,
            }
        });

        let response = self
            .client
            .post(format!("{}/graphql", self.api_base))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| GitHubError::NetworkError(e.to_string()))?;

        let result: GraphqlResponse<EpicQueryData> = self.handle_response(response).await?;
        if let Some(errors) = result.errors {
            if let Some(first) = errors.first() {
                return Err(GitHubError::ApiError {
                    status: 200,
                    message: first.message.clone(),
                });
            }
        }
        result.data.ok_or_else(|| GitHubError::ApiError {
            status: 200,
            message: "GraphQL response had no data".to_string(),
        })
    }
}

/// GitHub error response format.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    message: String,
}
