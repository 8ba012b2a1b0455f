//! Aggregated inspection results

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lint::{Issue, IssueKind};

/// Number of issues per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IssueCounts {
    pub invalid: usize,
    pub out_of_bounds: usize,
    pub overlap: usize,
    pub too_close: usize,
}

impl IssueCounts {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            *counts.slot(issue.kind) += 1;
        }
        counts
    }

    pub fn get(&self, kind: IssueKind) -> usize {
        match kind {
            IssueKind::InvalidElement => self.invalid,
            IssueKind::OutOfBounds => self.out_of_bounds,
            IssueKind::Overlap => self.overlap,
            IssueKind::TooClose => self.too_close,
        }
    }

    pub fn total(&self) -> usize {
        self.invalid + self.actionable()
    }

    /// Issues repair can act on
    pub fn actionable(&self) -> usize {
        self.out_of_bounds + self.overlap + self.too_close
    }

    fn slot(&mut self, kind: IssueKind) -> &mut usize {
        match kind {
            IssueKind::InvalidElement => &mut self.invalid,
            IssueKind::OutOfBounds => &mut self.out_of_bounds,
            IssueKind::Overlap => &mut self.overlap,
            IssueKind::TooClose => &mut self.too_close,
        }
    }
}

/// Ordered issue list for one canvas
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    pub issues: Vec<Issue>,
    pub counts: IssueCounts,
    /// Set by repair when actionable issues survived the iteration budget
    pub convergence_failure: bool,
}

impl Report {
    /// Build a report, ordering issues by kind priority, then magnitude
    /// (largest first), then element ids.
    pub fn from_issues(mut issues: Vec<Issue>) -> Self {
        issues.sort_by(compare_issues);
        let counts = IssueCounts::from_issues(&issues);
        Self {
            issues,
            counts,
            convergence_failure: false,
        }
    }

    pub(crate) fn with_convergence_failure(mut self, failed: bool) -> Self {
        self.convergence_failure = failed;
        self
    }

    /// True when nothing at all was reported
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_actionable(&self) -> bool {
        self.counts.actionable() > 0
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    /// Issues mentioning a given element
    pub fn issues_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Issue> + 'a {
        self.issues.iter().filter(move |issue| issue.involves(id))
    }
}

pub(crate) fn compare_issues(a: &Issue, b: &Issue) -> Ordering {
    a.kind
        .cmp(&b.kind)
        .then_with(|| b.magnitude.total_cmp(&a.magnitude))
        .then_with(|| a.element_ids.cmp(&b.element_ids))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "no layout issues");
        }

        let breakdown: Vec<String> = IssueKind::ALL
            .iter()
            .filter(|kind| self.counts.get(**kind) > 0)
            .map(|kind| format!("{} {}", self.counts.get(*kind), kind))
            .collect();
        let noun = if self.len() == 1 { "issue" } else { "issues" };
        write!(f, "{} {} ({})", self.len(), noun, breakdown.join(", "))?;

        for issue in &self.issues {
            write!(f, "\n  {}: {}", issue.kind, issue)?;
        }

        if self.convergence_failure {
            write!(
                f,
                "\nrepair did not converge: {} actionable issue(s) remain",
                self.counts.actionable()
            )?;
        }
        Ok(())
    }
}
