//! github
//!
//! The external collaborator: fetches issues from the GitHub REST search
//! endpoint and the GraphQL API, and normalizes the raw records into the
//! canonical [`Issue`] shape the core consumes.
//!
//! # Design
//!
//! The core never performs HTTP; it takes a materialized issue list. This
//! module owns everything up to that boundary:
//!
//! - [`models`] - serde wire shapes for both APIs
//! - [`normalize`] - raw record to canonical [`Issue`] conversion
//! - [`client`] - the HTTP client (no retry/backoff, no rate-limit
//!   handling; those are the caller's concern)
//! - [`source`] - the [`IssueSource`] trait seam, so the CLI layer can be
//!   tested against a stub
//!
//! [`Issue`]: crate::core::Issue
//! [`IssueSource`]: source::IssueSource

pub mod client;
pub mod models;
pub mod normalize;
pub mod source;

pub use client::{GitHubClient, GitHubError, DEFAULT_API_BASE};
pub use normalize::NormalizeError;
pub use source::{EpicFetch, IssueSource};
