//! core::issue
//!
//! The normalized issue model and its classification rules.
//!
//! # Types
//!
//! - [`Issue`] - Canonical issue record, shape-identical across origins
//! - [`UserStory`] - Milestone-linked story referenced by issues in epic mode
//! - [`IssueState`] - todo/wip/done, derived from raw state and assignment
//! - [`IssueType`] - feature work, bugs by priority, or other
//! - [`Progress`] - Subtask checkbox counts parsed from an issue body
//!
//! # Classification
//!
//! `state` and `kind` are pure functions of an issue's immutable fields and
//! are computed once at construction via [`IssueSeed::into_issue`].
//! Re-classifying the same fields always yields the same result.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a normalized issue record came from.
///
/// Downstream components never branch on this; it exists for diagnostics
/// and to record which optional fields can be populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// REST search endpoint result
    Rest,
    /// GraphQL query result
    Graphql,
    /// Synthesized record (fixtures, tests)
    #[default]
    Placeholder,
}

/// Workflow state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Open and unassigned
    Todo,
    /// Open and assigned
    Wip,
    /// Closed (or merged, for pull requests)
    Done,
}

impl IssueState {
    /// All states, in table-column order.
    pub const ALL: [IssueState; 3] = [IssueState::Todo, IssueState::Wip, IssueState::Done];
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Todo => write!(f, "todo"),
            IssueState::Wip => write!(f, "wip"),
            IssueState::Done => write!(f, "done"),
        }
    }
}

/// Work category of an issue, derived from its labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    /// Planned feature work (`feature` or `enhancement` label)
    Issues,
    /// Priority-1 bugs, including bugs with no priority label
    P1Bugs,
    /// Priority-2 bugs
    P2Bugs,
    /// Priority-3 bugs
    P3Bugs,
    /// Everything else
    Others,
}

impl IssueType {
    /// All types, in table-column order.
    pub const ALL: [IssueType; 5] = [
        IssueType::Issues,
        IssueType::P1Bugs,
        IssueType::P2Bugs,
        IssueType::P3Bugs,
        IssueType::Others,
    ];

    /// Types counted toward completion percentage and delivery estimates.
    ///
    /// Only feature work and top-priority bugs are tracked against
    /// delivery; p2/p3 bugs and uncategorized issues are not.
    pub const COUNTED: [IssueType; 2] = [IssueType::Issues, IssueType::P1Bugs];

    /// Whether this type counts toward completion and delivery.
    pub fn counted(self) -> bool {
        matches!(self, IssueType::Issues | IssueType::P1Bugs)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueType::Issues => write!(f, "issues"),
            IssueType::P1Bugs => write!(f, "p1bugs"),
            IssueType::P2Bugs => write!(f, "p2bugs"),
            IssueType::P3Bugs => write!(f, "p3bugs"),
            IssueType::Others => write!(f, "others"),
        }
    }
}

/// Derive the workflow state from a raw API state string and assignment.
///
/// `done` for closed (REST) or closed/merged (GraphQL, case-insensitive);
/// otherwise `todo` when unassigned and `wip` when assigned. Total over
/// both inputs: every (raw state, assigned) pair maps to exactly one state.
pub fn classify_state(raw_state: &str, assigned: bool) -> IssueState {
    if raw_state.eq_ignore_ascii_case("closed") || raw_state.eq_ignore_ascii_case("merged") {
        IssueState::Done
    } else if !assigned {
        IssueState::Todo
    } else {
        IssueState::Wip
    }
}

/// Derive the work category from a set of label names.
///
/// Bugs are checked before features, so an issue labeled both `bug` and
/// `feature` classifies as a bug. A `bug` with no `p1`/`p2`/`p3` label
/// counts as p1: surfacing unprioritised bugs as highest priority
/// encourages triage.
pub fn classify_type<S: AsRef<str>>(labels: &[S]) -> IssueType {
    let has = |name: &str| labels.iter().any(|l| l.as_ref() == name);

    if has("bug") {
        for (priority, kind) in [
            ("p1", IssueType::P1Bugs),
            ("p2", IssueType::P2Bugs),
            ("p3", IssueType::P3Bugs),
        ] {
            if has(priority) {
                return kind;
            }
        }
        return IssueType::P1Bugs;
    }
    if has("feature") || has("enhancement") {
        return IssueType::Issues;
    }
    IssueType::Others
}

/// Extract the numeric value of the first `<prefix>:<n>` label.
///
/// Used for `phase:<n>` and `story:<n>` labels. Labels whose suffix is not
/// a number are skipped.
pub fn numbered_label_value<S: AsRef<str>>(labels: &[S], prefix: &str) -> Option<u64> {
    labels.iter().find_map(|label| {
        let rest = label.as_ref().strip_prefix(prefix)?;
        let value = rest.strip_prefix(':')?;
        value.parse().ok()
    })
}

/// Subtask progress parsed from checkbox lines in an issue body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Checked subtasks (`- [x]`)
    pub completed: usize,
    /// Unchecked subtasks (`- [ ]`)
    pub outstanding: usize,
}

impl Progress {
    /// Total number of subtasks.
    pub fn total(&self) -> usize {
        self.completed + self.outstanding
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total())
    }
}

/// A milestone-linked user story.
///
/// Owned by the epic fetch result; issues reference stories by value
/// (the record is three small fields, cloning is cheaper than sharing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStory {
    /// Story issue number
    pub number: u64,
    /// Story title
    pub title: String,
    /// Web URL
    pub url: String,
}

/// A normalized issue record.
///
/// Immutable once created: classification fields are computed at
/// construction time from the raw state, assignees, and labels, and the
/// record is never mutated afterwards. Construct via [`IssueSeed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Provenance tag
    pub origin: Origin,
    /// Web URL
    pub url: String,
    /// Issue title
    pub title: String,
    /// Issue number
    pub number: u64,
    /// Repository owner login
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Label names, in API order
    pub labels: Vec<String>,
    /// Assignee logins (possibly empty)
    pub assignees: Vec<String>,
    /// Creation timestamp, when known
    pub created_at: Option<DateTime<Utc>>,
    /// Close timestamp, when closed
    pub closed_at: Option<DateTime<Utc>>,
    /// Due date of the issue's milestone, when both exist
    pub milestone_due_on: Option<DateTime<Utc>>,
    /// Derived workflow state
    pub state: IssueState,
    /// Derived work category
    pub kind: IssueType,
    /// Back-reference to a user story (epic mode only)
    pub story: Option<UserStory>,
    /// Subtask progress (GraphQL origin only)
    pub progress: Option<Progress>,
}

impl Issue {
    /// Canonical `owner/repo` repository key.
    pub fn repo_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Whether the issue carries the given label.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }

    /// Numeric value of the first `<prefix>:<n>` label, if any.
    pub fn numbered_label_value(&self, prefix: &str) -> Option<u64> {
        numbered_label_value(&self.labels, prefix)
    }
}

/// Raw fields for an [`Issue`] before classification.
///
/// Normalizers fill this in from wire records; [`into_issue`] derives
/// `state` and `kind` and seals the record.
///
/// [`into_issue`]: IssueSeed::into_issue
#[derive(Debug, Clone, Default)]
pub struct IssueSeed {
    pub origin: Origin,
    pub url: String,
    pub title: String,
    pub number: u64,
    pub owner: String,
    pub repo: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    /// Raw state string from the API (`open`, `closed`, `OPEN`, `MERGED`, ...)
    pub raw_state: String,
    pub created_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub milestone_due_on: Option<DateTime<Utc>>,
    pub story: Option<UserStory>,
    pub progress: Option<Progress>,
}

impl IssueSeed {
    /// Classify and seal the record.
    pub fn into_issue(self) -> Issue {
        let state = classify_state(&self.raw_state, !self.assignees.is_empty());
        let kind = classify_type(&self.labels);
        Issue {
            origin: self.origin,
            url: self.url,
            title: self.title,
            number: self.number,
            owner: self.owner,
            repo: self.repo,
            labels: self.labels,
            assignees: self.assignees,
            created_at: self.created_at,
            closed_at: self.closed_at,
            milestone_due_on: self.milestone_due_on,
            state,
            kind,
            story: self.story,
            progress: self.progress,
        }
    }
}

/// Issue ordering for plan rendering: done, then wip, then todo, and by
/// issue number within a state.
///
/// Leaf buckets hold issues unsorted; this comparator is applied at render
/// time, never baked into the tree.
pub fn plan_order(a: &Issue, b: &Issue) -> Ordering {
    fn rank(state: IssueState) -> u8 {
        match state {
            IssueState::Done => 0,
            IssueState::Wip => 1,
            IssueState::Todo => 2,
        }
    }
    rank(a.state)
        .cmp(&rank(b.state))
        .then(a.number.cmp(&b.number))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(labels: &[&str], raw_state: &str, assignees: &[&str]) -> Issue {
        IssueSeed {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            assignees: assignees.iter().map(|s| s.to_string()).collect(),
            raw_state: raw_state.to_string(),
            ..IssueSeed::default()
        }
        .into_issue()
    }

    #[test]
    fn state_closed_is_done() {
        assert_eq!(classify_state("closed", false), IssueState::Done);
        assert_eq!(classify_state("closed", true), IssueState::Done);
    }

    #[test]
    fn state_merged_is_done_case_insensitive() {
        assert_eq!(classify_state("MERGED", true), IssueState::Done);
        assert_eq!(classify_state("CLOSED", false), IssueState::Done);
    }

    #[test]
    fn state_open_unassigned_is_todo() {
        assert_eq!(classify_state("open", false), IssueState::Todo);
        assert_eq!(classify_state("OPEN", false), IssueState::Todo);
    }

    #[test]
    fn state_open_assigned_is_wip() {
        assert_eq!(classify_state("open", true), IssueState::Wip);
    }

    #[test]
    fn type_prioritised_bugs() {
        assert_eq!(classify_type(&["bug", "p1"]), IssueType::P1Bugs);
        assert_eq!(classify_type(&["bug", "p2"]), IssueType::P2Bugs);
        assert_eq!(classify_type(&["p3", "bug"]), IssueType::P3Bugs);
    }

    #[test]
    fn type_priority_scan_order_is_fixed() {
        // p1 wins even when p2/p3 are also present
        assert_eq!(classify_type(&["bug", "p3", "p2", "p1"]), IssueType::P1Bugs);
        assert_eq!(classify_type(&["bug", "p3", "p2"]), IssueType::P2Bugs);
    }

    #[test]
    fn type_unprioritised_bug_defaults_to_p1() {
        assert_eq!(classify_type(&["bug"]), IssueType::P1Bugs);
    }

    #[test]
    fn type_bug_beats_feature() {
        assert_eq!(classify_type(&["bug", "feature"]), IssueType::P1Bugs);
        assert_eq!(classify_type(&["feature", "bug"]), IssueType::P1Bugs);
    }

    #[test]
    fn type_feature_and_enhancement_are_issues() {
        assert_eq!(classify_type(&["feature"]), IssueType::Issues);
        assert_eq!(classify_type(&["enhancement"]), IssueType::Issues);
    }

    #[test]
    fn type_unlabelled_is_others() {
        assert_eq!(classify_type::<&str>(&[]), IssueType::Others);
        assert_eq!(classify_type(&["blocked"]), IssueType::Others);
    }

    #[test]
    fn seed_classifies_at_construction() {
        let i = issue(&["bug"], "open", &["alice"]);
        assert_eq!(i.state, IssueState::Wip);
        assert_eq!(i.kind, IssueType::P1Bugs);
    }

    #[test]
    fn numbered_label_parses_value() {
        let i = issue(&["phase:2", "feature"], "open", &[]);
        assert_eq!(i.numbered_label_value("phase"), Some(2));
        assert_eq!(i.numbered_label_value("story"), None);
    }

    #[test]
    fn numbered_label_skips_non_numeric_and_prefix_collisions() {
        let labels = ["phases:9", "phase:soon", "phase:11"];
        assert_eq!(numbered_label_value(&labels, "phase"), Some(11));
    }

    #[test]
    fn numbered_label_handles_repo_scoped_prefix() {
        let labels = ["size:example/app:3"];
        assert_eq!(numbered_label_value(&labels, "size:example/app"), Some(3));
    }

    #[test]
    fn progress_display_shows_done_over_total() {
        let p = Progress {
            completed: 2,
            outstanding: 3,
        };
        assert_eq!(p.to_string(), "2/5");
    }

    #[test]
    fn plan_order_sorts_done_wip_todo_then_number() {
        let mut items = vec![
            issue(&[], "open", &[]),       // todo
            issue(&[], "closed", &[]),     // done
            issue(&[], "open", &["bob"]),  // wip
        ];
        items[0].number = 1;
        items[1].number = 9;
        items[2].number = 5;

        items.sort_by(plan_order);

        assert_eq!(items[0].state, IssueState::Done);
        assert_eq!(items[1].state, IssueState::Wip);
        assert_eq!(items[2].state, IssueState::Todo);
    }

    #[test]
    fn repo_name_is_owner_slash_repo() {
        let mut i = issue(&[], "open", &[]);
        i.owner = "example".into();
        i.repo = "app".into();
        assert_eq!(i.repo_name(), "example/app");
    }
}
