//! core::delivery
//!
//! Delivery-date aggregation: fold per-issue milestone due dates into a
//! single "latest known due date among open tracked work" per scope.
//!
//! # State machine
//!
//! The aggregate moves between three values:
//!
//! - [`Unsampled`] - no qualifying issue observed yet
//! - [`Due`] - latest due date seen so far among qualifying issues
//! - [`Unknown`] - terminal; an open tracked issue without a milestone due
//!   date poisons the whole scope's estimate, regardless of what else is
//!   or was observed
//!
//! [`Unsampled`]: DeliveryEstimate::Unsampled
//! [`Due`]: DeliveryEstimate::Due
//! [`Unknown`]: DeliveryEstimate::Unknown

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::issue::{Issue, IssueState};

/// Aggregated delivery estimate for a scope of issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliveryEstimate {
    /// No open tracked issue with a milestone observed yet.
    #[default]
    Unsampled,
    /// Latest milestone due date among observed issues.
    Due(DateTime<Utc>),
    /// No reliable delivery date for this scope. Terminal.
    Unknown,
}

impl DeliveryEstimate {
    /// Whether an issue participates in delivery estimation.
    ///
    /// Closed work and bug-fix due dates below p1 do not influence the
    /// projected delivery date.
    pub fn tracks(issue: &Issue) -> bool {
        issue.state != IssueState::Done && issue.kind.counted()
    }

    /// Fold one issue's milestone due date into the aggregate.
    ///
    /// Once `Unknown`, stays `Unknown`. An absent due date transitions to
    /// `Unknown` from any state; a present one adopts or keeps the later
    /// of the two dates.
    pub fn observe(self, due: Option<DateTime<Utc>>) -> Self {
        match (self, due) {
            (DeliveryEstimate::Unknown, _) => DeliveryEstimate::Unknown,
            (_, None) => DeliveryEstimate::Unknown,
            (DeliveryEstimate::Unsampled, Some(date)) => DeliveryEstimate::Due(date),
            (DeliveryEstimate::Due(current), Some(date)) => {
                DeliveryEstimate::Due(current.max(date))
            }
        }
    }

    /// Estimate delivery for a scope, folding left-to-right over the
    /// participating issues.
    pub fn for_scope<'a, I>(issues: I) -> Self
    where
        I: IntoIterator<Item = &'a Issue>,
    {
        issues
            .into_iter()
            .filter(|issue| Self::tracks(issue))
            .fold(DeliveryEstimate::Unsampled, |acc, issue| {
                acc.observe(issue.milestone_due_on)
            })
    }

    /// Concrete date, when one exists.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        match self {
            DeliveryEstimate::Due(date) => Some(*date),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryEstimate::Due(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            _ => write!(f, "n/a"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::issue::IssueSeed;
    use chrono::TimeZone;

    fn due(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn tracked_issue(milestone_due_on: Option<DateTime<Utc>>) -> Issue {
        IssueSeed {
            labels: vec!["feature".into()],
            raw_state: "open".into(),
            milestone_due_on,
            ..IssueSeed::default()
        }
        .into_issue()
    }

    #[test]
    fn adopts_first_due_date() {
        let estimate = DeliveryEstimate::Unsampled.observe(Some(due(2024, 1, 10)));
        assert_eq!(estimate, DeliveryEstimate::Due(due(2024, 1, 10)));
    }

    #[test]
    fn keeps_the_later_date() {
        let estimate = DeliveryEstimate::Due(due(2024, 2, 1)).observe(Some(due(2024, 1, 10)));
        assert_eq!(estimate, DeliveryEstimate::Due(due(2024, 2, 1)));

        let estimate = DeliveryEstimate::Due(due(2024, 1, 10)).observe(Some(due(2024, 2, 1)));
        assert_eq!(estimate, DeliveryEstimate::Due(due(2024, 2, 1)));
    }

    #[test]
    fn missing_due_date_poisons() {
        assert_eq!(
            DeliveryEstimate::Due(due(2024, 2, 1)).observe(None),
            DeliveryEstimate::Unknown
        );
        assert_eq!(
            DeliveryEstimate::Unsampled.observe(None),
            DeliveryEstimate::Unknown
        );
    }

    #[test]
    fn unknown_is_terminal() {
        assert_eq!(
            DeliveryEstimate::Unknown.observe(Some(due(2024, 2, 1))),
            DeliveryEstimate::Unknown
        );
        assert_eq!(DeliveryEstimate::Unknown.observe(None), DeliveryEstimate::Unknown);
    }

    #[test]
    fn undated_issue_poisons_regardless_of_later_dates() {
        // [A(due=2024-01-10), B(no due), C(due=2024-02-01)] -> Unknown
        let issues = vec![
            tracked_issue(Some(due(2024, 1, 10))),
            tracked_issue(None),
            tracked_issue(Some(due(2024, 2, 1))),
        ];
        assert_eq!(
            DeliveryEstimate::for_scope(&issues),
            DeliveryEstimate::Unknown
        );

        // [A, C] without B -> the later date
        let issues = vec![
            tracked_issue(Some(due(2024, 1, 10))),
            tracked_issue(Some(due(2024, 2, 1))),
        ];
        assert_eq!(
            DeliveryEstimate::for_scope(&issues),
            DeliveryEstimate::Due(due(2024, 2, 1))
        );
    }

    #[test]
    fn done_and_low_priority_issues_do_not_participate() {
        let done = IssueSeed {
            labels: vec!["feature".into()],
            raw_state: "closed".into(),
            milestone_due_on: None,
            ..IssueSeed::default()
        }
        .into_issue();
        let p2bug = IssueSeed {
            labels: vec!["bug".into(), "p2".into()],
            raw_state: "open".into(),
            milestone_due_on: None,
            ..IssueSeed::default()
        }
        .into_issue();

        // Neither undated record poisons, because neither is tracked.
        let issues = vec![done, p2bug, tracked_issue(Some(due(2024, 3, 1)))];
        assert_eq!(
            DeliveryEstimate::for_scope(&issues),
            DeliveryEstimate::Due(due(2024, 3, 1))
        );
    }

    #[test]
    fn empty_scope_stays_unsampled() {
        let issues: Vec<Issue> = Vec::new();
        assert_eq!(
            DeliveryEstimate::for_scope(&issues),
            DeliveryEstimate::Unsampled
        );
    }

    #[test]
    fn display_formats_date_or_na() {
        assert_eq!(DeliveryEstimate::Due(due(2024, 2, 1)).to_string(), "2024-02-01");
        assert_eq!(DeliveryEstimate::Unknown.to_string(), "n/a");
        assert_eq!(DeliveryEstimate::Unsampled.to_string(), "n/a");
    }
}
