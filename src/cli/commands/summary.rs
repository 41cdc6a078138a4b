//! summary command - per-repository progress table

use anyhow::{bail, Result};

use crate::core::{IssueState, IssueType, RepoSummary, Summary};
use crate::ui::output;

use super::Context;

/// Show a per-repository progress table for a feature.
///
/// This is a synchronous wrapper that uses tokio to run the async
/// implementation.
pub fn summary(ctx: &Context, repos: &[String], labels: &[String]) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(summary_async(ctx, repos, labels))
}

/// Async implementation of summary.
async fn summary_async(ctx: &Context, repos: &[String], labels: &[String]) -> Result<()> {
    let repos = ctx.repos(repos);
    let labels = ctx.labels(labels);
    if repos.is_empty() {
        bail!("no repositories specified; use --repo or set 'repos' in the config file");
    }

    let client = ctx.client();
    let issues = client.search_issues(&repos, &labels).await?;
    output::debug(format!("fetched {} issues", issues.len()), ctx.verbosity);

    let summary = Summary::generate(issues, &labels, &repos);
    output::print(render(&summary), ctx.verbosity);
    Ok(())
}

/// Render the summary as a table plus a whole-feature total line.
pub fn render(summary: &Summary) -> String {
    let header = [
        "Repo", "Todo", "WIP", "Done", "P1", "P2", "P3", "Fixed", "Other", "Delivery", "%",
    ];
    let rows: Vec<Vec<String>> = summary.repos.iter().map(row).collect();

    let mut out = String::new();
    if !summary.labels.is_empty() {
        out.push_str(&format!("Labels: {}\n\n", summary.labels.join(", ")));
    }
    out.push_str(&output::format_table(&header, &rows));

    let total = summary.completion();
    out.push_str(&format!(
        "\n\nOverall: {}% complete ({}/{})",
        total, total.completed, total.total
    ));
    out
}

fn row(repo: &RepoSummary) -> Vec<String> {
    // Todo/WIP/Done count the types that feed the percentage; bug
    // columns count open bugs by priority, Fixed counts closed ones.
    let counted = |state: IssueState| -> usize {
        IssueType::COUNTED
            .into_iter()
            .map(|kind| repo.grid.cell(state, kind).len())
            .sum()
    };
    let open_bugs = |kind: IssueType| -> usize {
        repo.grid.cell(IssueState::Todo, kind).len() + repo.grid.cell(IssueState::Wip, kind).len()
    };
    let others: usize = IssueState::ALL
        .into_iter()
        .map(|state| repo.grid.cell(state, IssueType::Others).len())
        .sum();

    vec![
        repo.repo.clone(),
        counted(IssueState::Todo).to_string(),
        counted(IssueState::Wip).to_string(),
        counted(IssueState::Done).to_string(),
        open_bugs(IssueType::P1Bugs).to_string(),
        open_bugs(IssueType::P2Bugs).to_string(),
        open_bugs(IssueType::P3Bugs).to_string(),
        repo.grid.done.bug_count().to_string(),
        others.to_string(),
        repo.delivery.to_string(),
        repo.completion().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::issue::IssueSeed;

    fn issue(repo: &str, labels: &[&str], raw_state: &str, assigned: bool) -> crate::core::Issue {
        IssueSeed {
            owner: "org".into(),
            repo: repo.into(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            assignees: if assigned { vec!["bob".into()] } else { vec![] },
            raw_state: raw_state.into(),
            ..IssueSeed::default()
        }
        .into_issue()
    }

    #[test]
    fn render_includes_every_requested_repo() {
        let issues = vec![issue("app", &["feature"], "open", false)];
        let summary = Summary::generate(
            issues,
            &[],
            &["org/app".to_string(), "org/server".to_string()],
        );
        let rendered = render(&summary);
        assert!(rendered.contains("org/app"));
        assert!(rendered.contains("org/server"));
    }

    #[test]
    fn render_counts_open_bugs_by_priority() {
        let issues = vec![
            issue("app", &["bug"], "open", false),
            issue("app", &["bug", "p2"], "open", true),
            issue("app", &["bug", "p3"], "closed", false),
        ];
        let summary = Summary::generate(issues, &[], &["org/app".to_string()]);
        let cells = row(&summary.repos[0]);
        // P1 open, P2 open, P3 open, Fixed
        assert_eq!(cells[4], "1");
        assert_eq!(cells[5], "1");
        assert_eq!(cells[6], "0");
        assert_eq!(cells[7], "1");
    }

    #[test]
    fn render_shows_sentinel_for_empty_repo() {
        let summary = Summary::generate(Vec::new(), &[], &["org/app".to_string()]);
        let rendered = render(&summary);
        assert!(rendered.contains('~'));
        assert!(rendered.contains("Overall: ~% complete (0/0)"));
    }
}
