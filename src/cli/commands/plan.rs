//! plan command - grouped issue tree

use anyhow::{bail, Result};

use crate::core::{plan_order, Bucket, BucketNode, CompletionStats, Issue, Query, TreePlan};
use crate::github::EpicFetch;
use crate::ui::output;

use super::Context;

/// Show the feature plan as a grouped issue tree.
///
/// This is a synchronous wrapper that uses tokio to run the async
/// implementation.
pub fn plan(
    ctx: &Context,
    repos: &[String],
    labels: &[String],
    epic: Option<&str>,
    dimensions: &[String],
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(plan_async(ctx, repos, labels, epic, dimensions))
}

/// Async implementation of plan.
async fn plan_async(
    ctx: &Context,
    repos: &[String],
    labels: &[String],
    epic: Option<&str>,
    dimensions: &[String],
) -> Result<()> {
    let repos = ctx.repos(repos);
    let labels = ctx.labels(labels);
    if repos.is_empty() {
        bail!("no repositories specified; use --repo or set 'repos' in the config file");
    }
    if labels.is_empty() && epic.is_none() {
        bail!("nothing to plan; give at least one --label or an --epic");
    }

    let dimension_names = if dimensions.is_empty() {
        ctx.config.dimensions.clone()
    } else {
        dimensions.to_vec()
    };

    let (query, unknown) = Query::new(
        repos.clone(),
        labels,
        epic.map(str::to_string),
        &dimension_names,
    );
    for name in &unknown {
        output::warn(
            format!("ignoring unknown dimension '{name}'"),
            ctx.verbosity,
        );
    }

    let client = ctx.client();
    let fetch = match &query.epic {
        Some(epic) => client.fetch_epic(epic, &repos).await?,
        None => EpicFetch {
            stories: Vec::new(),
            issues: client.search_issues(&repos, &query.labels).await?,
        },
    };
    output::debug(
        format!(
            "fetched {} issues, {} stories",
            fetch.issues.len(),
            fetch.stories.len()
        ),
        ctx.verbosity,
    );

    let tree = TreePlan::prepare(&query, &fetch.stories, &fetch.issues);
    let total = CompletionStats::for_issues(&fetch.issues);
    let root = tree.build(fetch.issues);

    let mut out = String::new();
    render_node(&root, 0, &mut out);
    out.push_str(&format!(
        "\nOverall: {}% complete ({}/{})",
        total, total.completed, total.total
    ));
    output::print(out.trim_start_matches('\n'), ctx.verbosity);
    Ok(())
}

fn render_node(node: &BucketNode, depth: usize, out: &mut String) {
    match node {
        BucketNode::Children(buckets) => {
            for bucket in buckets {
                render_bucket(bucket, depth, out);
            }
        }
        BucketNode::Leaf(issues) => {
            let mut issues: Vec<&Issue> = issues.iter().collect();
            issues.sort_by(|a, b| plan_order(a, b));
            for issue in issues {
                out.push_str(&format!(
                    "{}{}\n",
                    "  ".repeat(depth),
                    render_issue(issue)
                ));
            }
        }
    }
}

fn render_bucket(bucket: &Bucket, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!(
        "\n{}{} ({}% complete)\n",
        indent,
        bucket.heading(),
        bucket.completion()
    ));
    render_node(&bucket.node, depth + 1, out);
}

/// One plan line: state marker, number, title, and subtask progress
/// when the issue tracks checkboxes.
fn render_issue(issue: &Issue) -> String {
    let mut line = format!("[{}] #{} {}", issue.state, issue.number, issue.title);
    if let Some(progress) = &issue.progress {
        line.push_str(&format!(" ({progress})"));
    }
    line
}
