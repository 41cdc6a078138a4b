//! core::query
//!
//! The query model: which repositories and labels are in scope, whether
//! the query is in epic mode, and the grouping dimensions to apply.
//!
//! Grouping configuration arrives as strings from possibly-stale UI or
//! config state, so unknown dimension names must never be fatal:
//! [`parse_dimensions`] drops them and reports them for a warning, leaving
//! the tree shallower than requested.

use super::tree::Dimension;

/// Default grouping when none is configured.
pub const DEFAULT_DIMENSIONS: [Dimension; 2] = [Dimension::Story, Dimension::Repo];

/// A dashboard query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Repositories in scope, in the user-specified order.
    ///
    /// The order is display order: repo buckets and summary rows follow it.
    pub repos: Vec<String>,
    /// Labels every issue in scope must carry.
    pub labels: Vec<String>,
    /// Epic name; `Some` puts the query in epic mode.
    pub epic: Option<String>,
    /// Grouping dimensions, outermost first.
    pub dimensions: Vec<Dimension>,
}

impl Query {
    /// Build a query, parsing dimension names leniently.
    ///
    /// Returns the query plus the list of unrecognized dimension names,
    /// which the caller should surface as warnings.
    pub fn new<S: AsRef<str>>(
        repos: Vec<String>,
        labels: Vec<String>,
        epic: Option<String>,
        dimension_names: &[S],
    ) -> (Self, Vec<String>) {
        let (dimensions, unknown) = parse_dimensions(dimension_names);
        let dimensions = if dimensions.is_empty() && unknown.is_empty() {
            DEFAULT_DIMENSIONS.to_vec()
        } else {
            dimensions
        };
        (
            Query {
                repos,
                labels,
                epic,
                dimensions,
            },
            unknown,
        )
    }
}

/// Parse dimension names, skipping unrecognized ones.
///
/// Returns the recognized dimensions in input order and the rejected
/// names, also in input order.
pub fn parse_dimensions<S: AsRef<str>>(names: &[S]) -> (Vec<Dimension>, Vec<String>) {
    let mut dimensions = Vec::new();
    let mut unknown = Vec::new();
    for name in names {
        match name.as_ref().parse::<Dimension>() {
            Ok(dimension) => dimensions.push(dimension),
            Err(err) => unknown.push(err.0),
        }
    }
    (dimensions, unknown)
}
