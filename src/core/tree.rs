//! core::tree
//!
//! The category tree builder: partitions a flat issue list into a nested
//! tree of named buckets along an ordered list of grouping dimensions.
//!
//! # Architecture
//!
//! Building happens in two steps:
//!
//! 1. [`TreePlan::prepare`] runs the activation check for each configured
//!    dimension (story: epic mode only; phase: at least one `phase:<n>`
//!    label present; repo: more than one repository in scope) and captures
//!    the ordering data each level needs. An inactive dimension contributes
//!    no level at all - the tree is shallower, never padded with a trivial
//!    single bucket.
//! 2. [`TreePlan::build`] recursively partitions the issues, fanning out by
//!    the first level and recursing with the remainder. Leaf buckets hold
//!    raw issue lists, unsorted; ordering for display is the renderer's
//!    concern (see [`crate::core::issue::plan_order`]).
//!
//! # Invariants
//!
//! - Every input issue lands in exactly one leaf bucket (catch-alls are
//!   computed as the complement of the matched items)
//! - Catch-all buckets appear only when non-empty and always last
//! - Bucket order is deterministic: ascending numeric for phases, discovery
//!   order for stories, user-specified list order for repos
//! - Each bucket's [`Requirements`] is a copy of its parent's, extended;
//!   siblings never observe each other's extensions

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::issue::{Issue, UserStory};
use super::metrics::CompletionStats;
use super::query::Query;

/// A grouping dimension.
///
/// A closed set with explicit dispatch; grouping configuration arriving as
/// strings is parsed via [`FromStr`], and unrecognized names are reported
/// to the caller for a warning rather than failing the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Group by user story (epic mode only)
    Story,
    /// Group by `phase:<n>` label
    Phase,
    /// Group by repository
    Repo,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Story => write!(f, "story"),
            Dimension::Phase => write!(f, "phase"),
            Dimension::Repo => write!(f, "repo"),
        }
    }
}

/// A grouping dimension name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category dimension '{0}'")]
pub struct UnknownDimension(pub String);

impl FromStr for Dimension {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "story" => Ok(Dimension::Story),
            "phase" => Ok(Dimension::Phase),
            "repo" => Ok(Dimension::Repo),
            other => Err(UnknownDimension(other.to_string())),
        }
    }
}

/// Constraints a new issue must satisfy to appear under a tree path.
///
/// Accumulated as the tree is descended: each level extends a copy of its
/// parent's record, so labels only grow and sibling buckets stay isolated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Requirements {
    /// Repository the issue must be filed in, once known
    pub repo: Option<String>,
    /// Labels the issue must carry
    pub labels: Vec<String>,
}

impl Requirements {
    /// Copy with an extra required label.
    fn with_label(&self, label: String) -> Self {
        let mut next = self.clone();
        next.labels.push(label);
        next
    }

    /// Copy with the required repository set.
    fn with_repo(&self, repo: String) -> Self {
        let mut next = self.clone();
        next.repo = Some(repo);
        next
    }
}

/// The dimension value a bucket was produced for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BucketData {
    /// A known user story
    Story(UserStory),
    /// A numeric phase
    Phase(u64),
    /// An `owner/repo` repository key
    Repo(String),
    /// Catch-all for issues that matched no heading at this level
    Unbucketed,
}

/// Contents of a bucket: either further levels or the raw issue list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BucketNode {
    /// Fan-out by the next dimension
    Children(Vec<Bucket>),
    /// Dimension list exhausted; issues are unsorted
    Leaf(Vec<Issue>),
}

/// A node in the category tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Which dimension produced this bucket
    pub dimension: Dimension,
    /// The dimension value
    pub data: BucketData,
    /// Requirements for a new issue to belong to this bucket's path
    pub requirements: Requirements,
    /// Children or leaf items
    pub node: BucketNode,
}

impl Bucket {
    /// Display heading for this bucket.
    pub fn heading(&self) -> String {
        match &self.data {
            BucketData::Story(story) => story.title.clone(),
            BucketData::Phase(n) => format!("phase:{n}"),
            BucketData::Repo(repo) => repo.clone(),
            BucketData::Unbucketed => match self.dimension {
                Dimension::Story => "unstoried".to_string(),
                Dimension::Phase => "unphased".to_string(),
                Dimension::Repo => "other repos".to_string(),
            },
        }
    }

    /// All issues under this bucket, in tree order.
    pub fn issues(&self) -> Vec<&Issue> {
        let mut acc = Vec::new();
        self.collect_issues(&mut acc);
        acc
    }

    fn collect_issues<'a>(&'a self, acc: &mut Vec<&'a Issue>) {
        match &self.node {
            BucketNode::Leaf(items) => acc.extend(items.iter()),
            BucketNode::Children(children) => {
                for child in children {
                    child.collect_issues(acc);
                }
            }
        }
    }

    /// Number of issues under this bucket.
    pub fn len(&self) -> usize {
        match &self.node {
            BucketNode::Leaf(items) => items.len(),
            BucketNode::Children(children) => children.iter().map(Bucket::len).sum(),
        }
    }

    /// Whether this bucket holds no issues.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Completion stats over everything under this bucket.
    pub fn completion(&self) -> CompletionStats {
        CompletionStats::for_issues(self.issues().into_iter())
    }
}

/// One active level of the tree, with the data it needs to order buckets.
#[derive(Debug, Clone)]
enum Level {
    /// Known stories, in milestone-query discovery order
    Story(Vec<UserStory>),
    /// Phases derive from the issues at each level
    Phase,
    /// The user-specified repository order
    Repo(Vec<String>),
}

impl Level {
    fn dimension(&self) -> Dimension {
        match self {
            Level::Story(_) => Dimension::Story,
            Level::Phase => Dimension::Phase,
            Level::Repo(_) => Dimension::Repo,
        }
    }
}

/// A partition of one level's issues, before recursing.
struct Split {
    data: BucketData,
    requirement: Option<Extend>,
    items: Vec<Issue>,
}

/// How a bucket extends the requirements record.
enum Extend {
    Label(String),
    Repo(String),
}

/// A prepared grouping plan: the active levels plus the base requirements.
#[derive(Debug, Clone)]
pub struct TreePlan {
    levels: Vec<Level>,
    /// Requirements that apply to the whole tree (e.g. the single
    /// repository when only one is in scope).
    pub requirements: Requirements,
}

impl TreePlan {
    /// Run activation checks for the query's dimensions.
    ///
    /// `stories` is the epic fetch's user-story list (ignored unless the
    /// query is in epic mode); `issues` is consulted for the phase
    /// activation check.
    pub fn prepare(query: &Query, stories: &[UserStory], issues: &[Issue]) -> Self {
        let mut levels = Vec::new();
        let mut requirements = Requirements::default();

        for dimension in &query.dimensions {
            match dimension {
                Dimension::Story => {
                    if query.epic.is_some() {
                        levels.push(Level::Story(stories.to_vec()));
                    }
                }
                Dimension::Phase => {
                    if issues
                        .iter()
                        .any(|issue| issue.numbered_label_value("phase").is_some())
                    {
                        levels.push(Level::Phase);
                    }
                }
                Dimension::Repo => {
                    if query.repos.len() > 1 {
                        levels.push(Level::Repo(query.repos.clone()));
                    } else if let Some(repo) = query.repos.first() {
                        // Single-repo scope: no repo level, but new issues
                        // still belong in that repo.
                        requirements.repo = Some(repo.clone());
                    }
                }
            }
        }

        TreePlan {
            levels,
            requirements,
        }
    }

    /// Number of active levels.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Build the tree, consuming the issue list.
    ///
    /// The tree is rebuilt from scratch on every call; it is never
    /// incrementally updated.
    pub fn build(&self, issues: Vec<Issue>) -> BucketNode {
        Self::build_levels(&self.levels, issues, &self.requirements)
    }

    fn build_levels(
        levels: &[Level],
        issues: Vec<Issue>,
        requirements: &Requirements,
    ) -> BucketNode {
        let Some((level, rest)) = levels.split_first() else {
            return BucketNode::Leaf(issues);
        };

        let mut buckets = Vec::new();
        for split in level.partition(issues) {
            let requirements = match &split.requirement {
                Some(Extend::Label(label)) => requirements.with_label(label.clone()),
                Some(Extend::Repo(repo)) => requirements.with_repo(repo.clone()),
                None => requirements.clone(),
            };
            buckets.push(Bucket {
                dimension: level.dimension(),
                data: split.data,
                node: Self::build_levels(rest, split.items, &requirements),
                requirements,
            });
        }
        BucketNode::Children(buckets)
    }
}

impl Level {
    /// Partition `issues` into this level's buckets.
    ///
    /// Catch-alls hold the exact complement of the matched items, so the
    /// partition property holds by construction.
    fn partition(&self, issues: Vec<Issue>) -> Vec<Split> {
        match self {
            Level::Story(stories) => Self::partition_by_story(stories, issues),
            Level::Phase => Self::partition_by_phase(issues),
            Level::Repo(order) => Self::partition_by_repo(order, issues),
        }
    }

    fn partition_by_story(stories: &[UserStory], issues: Vec<Issue>) -> Vec<Split> {
        let mut matched: Vec<Vec<Issue>> = stories.iter().map(|_| Vec::new()).collect();
        let mut unstoried = Vec::new();

        for issue in issues {
            let slot = issue.story.as_ref().and_then(|story| {
                stories.iter().position(|known| known.number == story.number)
            });
            match slot {
                Some(index) => matched[index].push(issue),
                None => unstoried.push(issue),
            }
        }

        let mut splits: Vec<Split> = stories
            .iter()
            .zip(matched)
            .map(|(story, items)| Split {
                data: BucketData::Story(story.clone()),
                requirement: Some(Extend::Label(format!("story:{}", story.number))),
                items,
            })
            .collect();
        if !unstoried.is_empty() {
            splits.push(Split {
                data: BucketData::Unbucketed,
                requirement: None,
                items: unstoried,
            });
        }
        splits
    }

    fn partition_by_phase(issues: Vec<Issue>) -> Vec<Split> {
        // BTreeMap gives ascending numeric phase order.
        let mut phased: BTreeMap<u64, Vec<Issue>> = BTreeMap::new();
        let mut unphased = Vec::new();

        for issue in issues {
            match issue.numbered_label_value("phase") {
                Some(phase) => phased.entry(phase).or_default().push(issue),
                None => unphased.push(issue),
            }
        }

        let mut splits: Vec<Split> = phased
            .into_iter()
            .map(|(phase, items)| Split {
                data: BucketData::Phase(phase),
                requirement: Some(Extend::Label(format!("phase:{phase}"))),
                items,
            })
            .collect();
        if !unphased.is_empty() {
            splits.push(Split {
                data: BucketData::Unbucketed,
                requirement: None,
                items: unphased,
            });
        }
        splits
    }

    fn partition_by_repo(order: &[String], issues: Vec<Issue>) -> Vec<Split> {
        // Group in first-seen order, then stably sort by the position in
        // the user's repo list. Repos absent from the list sort last and
        // keep their first-seen order among themselves.
        let mut names: Vec<String> = Vec::new();
        let mut grouped: BTreeMap<String, Vec<Issue>> = BTreeMap::new();

        for issue in issues {
            let name = issue.repo_name();
            if !grouped.contains_key(&name) {
                names.push(name.clone());
            }
            grouped.entry(name).or_default().push(issue);
        }

        names.sort_by_key(|name| {
            order
                .iter()
                .position(|known| known == name)
                .unwrap_or(usize::MAX)
        });

        names
            .into_iter()
            .map(|name| {
                let items = grouped.remove(&name).unwrap_or_default();
                Split {
                    requirement: Some(Extend::Repo(name.clone())),
                    data: BucketData::Repo(name),
                    items,
                }
            })
            .collect()
    }
}
