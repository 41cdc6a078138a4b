//! github::normalize
//!
//! The Issue Normalizer: converts raw API records from either origin into
//! the canonical [`Issue`] shape, so downstream components never branch on
//! provenance.
//!
//! # Failure semantics
//!
//! A record whose owner/repo cannot be derived produces
//! [`NormalizeError::MalformedIssueReference`]. The error is fatal for the
//! record and the client fails the whole batch rather than silently
//! producing an issue with empty owner/repo.

use thiserror::Error;

use crate::core::issue::{Issue, IssueSeed, Origin, Progress, UserStory};

use super::models::{GraphqlIssue, SearchIssue};

/// Errors from normalizing a raw issue record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The record's repository reference could not be parsed.
    #[error("malformed issue reference: cannot derive owner/repo from '{url}'")]
    MalformedIssueReference { url: String },
}

/// Normalize a REST search result.
///
/// Owner and repo come from the last two path segments of the record's
/// `repository_url`. The assignee set prefers the plural `assignees`
/// field, falling back to the legacy singular `assignee`.
pub fn issue_from_rest(raw: SearchIssue) -> Result<Issue, NormalizeError> {
    let (owner, repo) = split_repository_url(&raw.repository_url)?;

    let assignees: Vec<String> = if !raw.assignees.is_empty() {
        raw.assignees.into_iter().map(|user| user.login).collect()
    } else if let Some(assignee) = raw.assignee {
        vec![assignee.login]
    } else {
        Vec::new()
    };

    Ok(IssueSeed {
        origin: Origin::Rest,
        url: raw.html_url,
        title: raw.title,
        number: raw.number,
        owner,
        repo,
        labels: raw.labels.into_iter().map(|label| label.name).collect(),
        assignees,
        raw_state: raw.state,
        created_at: raw.created_at,
        closed_at: raw.closed_at,
        milestone_due_on: raw.milestone.and_then(|m| m.due_on),
        story: None,
        progress: None,
    }
    .into_issue())
}

/// Normalize a GraphQL issue node, attaching its user story when the
/// caller resolved one.
pub fn issue_from_graphql(
    raw: GraphqlIssue,
    story: Option<UserStory>,
) -> Result<Issue, NormalizeError> {
    let Some(repository) = raw.repository else {
        return Err(NormalizeError::MalformedIssueReference { url: raw.url });
    };

    let progress = raw.body.as_deref().and_then(parse_progress);

    Ok(IssueSeed {
        origin: Origin::Graphql,
        url: raw.url,
        title: raw.title,
        number: raw.number,
        owner: repository.owner.login,
        repo: repository.name,
        labels: raw.labels.nodes.into_iter().map(|label| label.name).collect(),
        assignees: raw
            .assignees
            .nodes
            .into_iter()
            .map(|user| user.login)
            .collect(),
        raw_state: raw.state,
        created_at: raw.created_at,
        closed_at: raw.closed_at,
        milestone_due_on: raw.milestone.and_then(|m| m.due_on),
        story,
        progress,
    }
    .into_issue())
}

/// Parse subtask progress from checkbox lines in an issue body.
///
/// Lines are trimmed and must start with `- [`; `- [x]` is matched
/// case-insensitively. Progress exists only while at least one subtask is
/// still pending.
pub fn parse_progress(body: &str) -> Option<Progress> {
    let mut completed = 0;
    let mut outstanding = 0;

    for line in body.lines() {
        let line = line.trim();
        if !line.starts_with("- [") {
            continue;
        }
        if line.to_ascii_lowercase().starts_with("- [x]") {
            completed += 1;
        } else if line.starts_with("- [ ]") {
            outstanding += 1;
        }
    }

    (outstanding > 0).then_some(Progress {
        completed,
        outstanding,
    })
}

/// Derive owner and repo from a repository API URL.
fn split_repository_url(url: &str) -> Result<(String, String), NormalizeError> {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let repo = segments.next().filter(|s| !s.is_empty());
    let owner = segments.next().filter(|s| !s.is_empty());
    match (owner, repo) {
        (Some(owner), Some(repo)) => Ok((owner.to_string(), repo.to_string())),
        _ => Err(NormalizeError::MalformedIssueReference {
            url: url.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::issue::{IssueState, IssueType};
    use crate::github::models::{
        AssigneeConnection, AssigneeNode, LabelConnection, LabelNode, OwnerRef, RepositoryRef,
        RestLabel, RestMilestone, RestUser,
    };

    fn rest_issue() -> SearchIssue {
        SearchIssue {
            html_url: "https://github.com/example/app/issues/42".into(),
            repository_url: "https://api.github.com/repos/example/app".into(),
            title: "Add search".into(),
            number: 42,
            state: "open".into(),
            labels: vec![RestLabel {
                name: "feature".into(),
            }],
            assignees: vec![],
            assignee: None,
            milestone: Some(RestMilestone { due_on: None }),
            created_at: None,
            closed_at: None,
        }
    }

    fn graphql_issue() -> GraphqlIssue {
        GraphqlIssue {
            number: 7,
            title: "Fix crash".into(),
            url: "https://github.com/example/app/issues/7".into(),
            body: None,
            state: "OPEN".into(),
            created_at: None,
            closed_at: None,
            milestone: None,
            labels: LabelConnection {
                nodes: vec![LabelNode { name: "bug".into() }],
            },
            assignees: AssigneeConnection {
                nodes: vec![AssigneeNode {
                    login: "alice".into(),
                }],
            },
            repository: Some(RepositoryRef {
                name: "app".into(),
                owner: OwnerRef {
                    login: "example".into(),
                },
            }),
        }
    }

    #[test]
    fn rest_owner_repo_from_repository_url() {
        let issue = issue_from_rest(rest_issue()).unwrap();
        assert_eq!(issue.owner, "example");
        assert_eq!(issue.repo, "app");
        assert_eq!(issue.origin, Origin::Rest);
        assert_eq!(issue.state, IssueState::Todo);
        assert_eq!(issue.kind, IssueType::Issues);
    }

    #[test]
    fn rest_malformed_repository_url_fails() {
        let mut raw = rest_issue();
        raw.repository_url = "repos".into();
        assert!(matches!(
            issue_from_rest(raw),
            Err(NormalizeError::MalformedIssueReference { .. })
        ));

        let mut raw = rest_issue();
        raw.repository_url = String::new();
        assert!(issue_from_rest(raw).is_err());
    }

    #[test]
    fn rest_falls_back_to_singular_assignee() {
        let mut raw = rest_issue();
        raw.assignee = Some(RestUser {
            login: "bob".into(),
        });
        let issue = issue_from_rest(raw).unwrap();
        assert_eq!(issue.assignees, vec!["bob"]);
        assert_eq!(issue.state, IssueState::Wip);
    }

    #[test]
    fn rest_plural_assignees_win_over_singular() {
        let mut raw = rest_issue();
        raw.assignees = vec![
            RestUser {
                login: "carol".into(),
            },
            RestUser { login: "dan".into() },
        ];
        raw.assignee = Some(RestUser {
            login: "bob".into(),
        });
        let issue = issue_from_rest(raw).unwrap();
        assert_eq!(issue.assignees, vec!["carol", "dan"]);
    }

    #[test]
    fn graphql_owner_repo_from_nested_repository() {
        let issue = issue_from_graphql(graphql_issue(), None).unwrap();
        assert_eq!(issue.owner, "example");
        assert_eq!(issue.repo, "app");
        assert_eq!(issue.origin, Origin::Graphql);
        assert_eq!(issue.kind, IssueType::P1Bugs);
        assert_eq!(issue.state, IssueState::Wip);
    }

    #[test]
    fn graphql_merged_state_is_done() {
        let mut raw = graphql_issue();
        raw.state = "MERGED".into();
        let issue = issue_from_graphql(raw, None).unwrap();
        assert_eq!(issue.state, IssueState::Done);
    }

    #[test]
    fn graphql_missing_repository_fails() {
        let mut raw = graphql_issue();
        raw.repository = None;
        assert!(matches!(
            issue_from_graphql(raw, None),
            Err(NormalizeError::MalformedIssueReference { .. })
        ));
    }

    #[test]
    fn progress_counts_checkboxes_case_insensitively() {
        let body = "Intro text\n  - [x] shipped\n- [X] also shipped\n- [ ] pending\nnot a task";
        assert_eq!(
            parse_progress(body),
            Some(Progress {
                completed: 2,
                outstanding: 1
            })
        );
    }

    #[test]
    fn progress_absent_when_no_pending_subtasks() {
        assert_eq!(parse_progress("- [x] all done\n- [x] yes"), None);
        assert_eq!(parse_progress("no checkboxes here"), None);
    }

    #[test]
    fn progress_ignores_malformed_checkbox_lines() {
        // Starts with "- [" but is neither checked nor pending.
        let body = "- [?] odd\n- [ ] pending";
        assert_eq!(
            parse_progress(body),
            Some(Progress {
                completed: 0,
                outstanding: 1
            })
        );
    }

    #[test]
    fn graphql_body_yields_progress_on_issue() {
        let mut raw = graphql_issue();
        raw.body = Some("- [x] one\n- [ ] two".into());
        let issue = issue_from_graphql(raw, None).unwrap();
        assert_eq!(issue.progress.unwrap().to_string(), "1/2");
    }
}
