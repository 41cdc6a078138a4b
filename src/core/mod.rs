//! core
//!
//! Pure domain logic: the normalized issue model, state/type classification,
//! delivery-date aggregation, the category tree builder, and aggregate
//! metrics. No I/O happens here; everything operates on materialized issue
//! lists and returns fresh values, so it is safe to call repeatedly.

pub mod delivery;
pub mod issue;
pub mod metrics;
pub mod query;
pub mod tree;

pub use delivery::DeliveryEstimate;
pub use issue::{plan_order, Issue, IssueState, IssueType, Origin, Progress, UserStory};
pub use metrics::{CompletionStats, RepoSummary, StateGrid, Summary};
pub use query::Query;
pub use tree::{Bucket, BucketData, BucketNode, Dimension, Requirements, TreePlan};
