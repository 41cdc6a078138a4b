//! Feature Dashboard - a GitHub issue dashboard for the terminal
//!
//! `fdash` queries the GitHub REST and GraphQL APIs for issues across one or
//! more repositories, classifies them by state (todo/wip/done) and type
//! (feature work, bugs by priority, other), and renders summary tables and a
//! hierarchical plan tree.
//!
//! # Architecture
//!
//! The codebase separates pure data transformation from I/O:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to core)
//! - [`core`] - Issue model, classification, category tree, aggregate metrics
//! - [`github`] - REST search and GraphQL epic fetch, issue normalization
//! - [`config`] - User configuration (token, default repos/labels)
//! - [`ui`] - Terminal output utilities
//!
//! # Correctness Invariants
//!
//! The categorization core maintains the following invariants:
//!
//! 1. Every issue appears in exactly one leaf bucket of a built tree
//! 2. Classification is a pure function of an issue's immutable fields
//! 3. Catch-all buckets exist only when non-empty and always sort last
//! 4. Requirements accumulated down a tree path only grow, and sibling
//!    buckets never observe each other's requirement extensions

pub mod cli;
pub mod config;
pub mod core;
pub mod github;
pub mod ui;
