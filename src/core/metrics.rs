//! core::metrics
//!
//! Aggregate metrics over classified issues: the per-(state, type) summary
//! grid, per-repo summaries with delivery estimates, and the completion
//! percentage.
//!
//! # Completion semantics
//!
//! Completion counts only feature work and p1 bugs ([`IssueType::COUNTED`]).
//! The percentage is an additive aggregate: stats sum across buckets and
//! repos before dividing, so a whole-tree percentage equals the percentage
//! of the summed leaf counts, never a weighted average of percentages.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use super::delivery::DeliveryEstimate;
use super::issue::{Issue, IssueState, IssueType};

/// Counted-work completion tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompletionStats {
    /// Done issues among counted types
    pub completed: usize,
    /// All issues among counted types, across all states
    pub total: usize,
}

impl CompletionStats {
    /// Tally one issue. Uncounted types leave the stats untouched.
    pub fn record(&mut self, issue: &Issue) {
        if !issue.kind.counted() {
            return;
        }
        self.total += 1;
        if issue.state == IssueState::Done {
            self.completed += 1;
        }
    }

    /// Tally a whole scope.
    pub fn for_issues<'a, I>(issues: I) -> Self
    where
        I: IntoIterator<Item = &'a Issue>,
    {
        let mut stats = CompletionStats::default();
        for issue in issues {
            stats.record(issue);
        }
        stats
    }

    /// Percent complete, rounded half-up. `None` when nothing is counted.
    ///
    /// Integer arithmetic so ties at .5 have no float ambiguity:
    /// `(200c + t) / 2t` is `floor(100c/t + 0.5)`.
    pub fn percent(&self) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        Some(((200 * self.completed + self.total) / (2 * self.total)) as u32)
    }
}

impl fmt::Display for CompletionStats {
    /// `"~"` when nothing is counted - an empty scope is not 0% complete.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(percent) => write!(f, "{percent}"),
            None => write!(f, "~"),
        }
    }
}

impl Add for CompletionStats {
    type Output = CompletionStats;

    fn add(self, other: CompletionStats) -> CompletionStats {
        CompletionStats {
            completed: self.completed + other.completed,
            total: self.total + other.total,
        }
    }
}

impl AddAssign for CompletionStats {
    fn add_assign(&mut self, other: CompletionStats) {
        *self = *self + other;
    }
}

impl Sum for CompletionStats {
    fn sum<I: Iterator<Item = CompletionStats>>(iter: I) -> Self {
        iter.fold(CompletionStats::default(), Add::add)
    }
}

/// Issues of one state, split by type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeCells {
    pub issues: Vec<Issue>,
    pub p1bugs: Vec<Issue>,
    pub p2bugs: Vec<Issue>,
    pub p3bugs: Vec<Issue>,
    pub others: Vec<Issue>,
}

impl TypeCells {
    /// Cell for a type.
    pub fn get(&self, kind: IssueType) -> &[Issue] {
        match kind {
            IssueType::Issues => &self.issues,
            IssueType::P1Bugs => &self.p1bugs,
            IssueType::P2Bugs => &self.p2bugs,
            IssueType::P3Bugs => &self.p3bugs,
            IssueType::Others => &self.others,
        }
    }

    fn get_mut(&mut self, kind: IssueType) -> &mut Vec<Issue> {
        match kind {
            IssueType::Issues => &mut self.issues,
            IssueType::P1Bugs => &mut self.p1bugs,
            IssueType::P2Bugs => &mut self.p2bugs,
            IssueType::P3Bugs => &mut self.p3bugs,
            IssueType::Others => &mut self.others,
        }
    }

    /// All bugs of this state, p1 through p3.
    pub fn bug_count(&self) -> usize {
        self.p1bugs.len() + self.p2bugs.len() + self.p3bugs.len()
    }
}

/// The full (state, type) grid for one scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateGrid {
    pub todo: TypeCells,
    pub wip: TypeCells,
    pub done: TypeCells,
}

impl StateGrid {
    /// Cells for a state.
    pub fn state(&self, state: IssueState) -> &TypeCells {
        match state {
            IssueState::Todo => &self.todo,
            IssueState::Wip => &self.wip,
            IssueState::Done => &self.done,
        }
    }

    fn state_mut(&mut self, state: IssueState) -> &mut TypeCells {
        match state {
            IssueState::Todo => &mut self.todo,
            IssueState::Wip => &mut self.wip,
            IssueState::Done => &mut self.done,
        }
    }

    /// Cell for a (state, type) pair.
    pub fn cell(&self, state: IssueState, kind: IssueType) -> &[Issue] {
        self.state(state).get(kind)
    }

    /// File an issue into its cell.
    pub fn push(&mut self, issue: Issue) {
        self.state_mut(issue.state).get_mut(issue.kind).push(issue);
    }

    /// Completion stats over the counted cells.
    pub fn completion(&self) -> CompletionStats {
        let mut stats = CompletionStats::default();
        for kind in IssueType::COUNTED {
            stats.completed += self.done.get(kind).len();
            for state in IssueState::ALL {
                stats.total += self.cell(state, kind).len();
            }
        }
        stats
    }
}

/// Summary of one repository's issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    /// `owner/repo` key
    pub repo: String,
    /// Labels the query was scoped to
    pub labels: Vec<String>,
    /// Delivery estimate over this repo's open tracked work
    pub delivery: DeliveryEstimate,
    /// Per-(state, type) issue lists
    pub grid: StateGrid,
}

impl RepoSummary {
    fn new(repo: String, labels: Vec<String>) -> Self {
        RepoSummary {
            repo,
            labels,
            delivery: DeliveryEstimate::Unsampled,
            grid: StateGrid::default(),
        }
    }

    /// File one issue, folding its due date when it participates.
    fn record(&mut self, issue: Issue) {
        if DeliveryEstimate::tracks(&issue) {
            self.delivery = self.delivery.observe(issue.milestone_due_on);
        }
        self.grid.push(issue);
    }

    /// Completion stats for this repository.
    pub fn completion(&self) -> CompletionStats {
        self.grid.completion()
    }
}

/// The whole summary: one row per repository, in query order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Labels the query was scoped to
    pub labels: Vec<String>,
    /// Repository rows
    pub repos: Vec<RepoSummary>,
}

impl Summary {
    /// Build a summary from classified issues.
    ///
    /// Rows are pre-seeded for every repository in `search_repos` (so a
    /// repo with no matching issues still shows an empty row) and keep
    /// that order. Issues from repositories outside the list get rows
    /// appended after, in first-seen order.
    pub fn generate(issues: Vec<Issue>, labels: &[String], search_repos: &[String]) -> Self {
        let mut repos: Vec<RepoSummary> = search_repos
            .iter()
            .map(|repo| RepoSummary::new(repo.clone(), labels.to_vec()))
            .collect();

        for issue in issues {
            let name = issue.repo_name();
            let index = match repos.iter().position(|row| row.repo == name) {
                Some(index) => index,
                None => {
                    repos.push(RepoSummary::new(name, labels.to_vec()));
                    repos.len() - 1
                }
            };
            repos[index].record(issue);
        }

        Summary {
            labels: labels.to_vec(),
            repos,
        }
    }

    /// Whole-feature completion: sums across repos, then divides.
    pub fn completion(&self) -> CompletionStats {
        self.repos.iter().map(RepoSummary::completion).sum()
    }
}
