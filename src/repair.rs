//! Greedy iterative repair of layout issues.
//!
//! Each pass collects issues on the current positions and applies one local
//! fix per actionable issue, most severe first. Out-of-bounds elements are
//! pulled back into the content area, overlapping pairs are pushed apart
//! along their minimal translation, and cramped neighbours are spread along
//! their shared axis. Elements are only ever translated, never resized.
//!
//! This is a local heuristic, not a global optimizer: a pass may trade one
//! issue for another. The best state seen is what gets returned, so the
//! issue count never goes up.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};
use crate::error::ConfigError;
use crate::geometry::{Axis, Canvas, Rect, GEOMETRY_EPSILON};
use crate::lint::{self, boundary, spacing, Issue, IssueKind};
use crate::options::Options;
use crate::report::{compare_issues, Report};

/// How many fixes of each kind actually moved something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FixCounts {
    pub bounds: usize,
    pub overlap: usize,
    pub spacing: usize,
}

impl FixCounts {
    pub fn total(&self) -> usize {
        self.bounds + self.overlap + self.spacing
    }
}

impl fmt::Display for FixCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fixed {} out-of-bounds, {} overlapping, {} spacing",
            self.bounds, self.overlap, self.spacing
        )
    }
}

/// Result of [`repair`]
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    /// Repaired elements, in input order
    pub elements: Vec<Element>,
    /// Issues remaining on `elements`
    pub report: Report,
    /// Passes run before stopping
    pub iterations: usize,
    pub fixes: FixCounts,
    moved: Vec<ElementId>,
}

impl RepairOutcome {
    pub fn into_parts(self) -> (Vec<Element>, Report) {
        (self.elements, self.report)
    }

    /// Ids of elements whose bounds differ from the input
    pub fn moved(&self) -> &[ElementId] {
        &self.moved
    }

    pub fn converged(&self) -> bool {
        !self.report.convergence_failure
    }
}

/// Repair a canvas by translating elements until no issue of a kind in
/// `options.fix_kinds` remains or the iteration budget runs out.
///
/// The input is never modified. Invalid elements are passed through
/// untouched and do not count against convergence.
pub fn repair(
    canvas: &Canvas,
    elements: &[Element],
    options: &Options,
) -> Result<RepairOutcome, ConfigError> {
    options.validate_for(canvas)?;

    let mut pass = RepairPass::new(canvas, elements, options);
    let mut issues = lint::collect(canvas, elements, options);
    tracing::debug!(
        elements = elements.len(),
        issues = issues.len(),
        "starting layout repair"
    );

    let mut best = (elements.to_vec(), issues.clone(), FixCounts::default());
    let mut iterations = 0;

    while iterations < options.max_iterations && has_actionable(&issues, options) {
        iterations += 1;
        issues.sort_by(compare_issues);

        let applied = pass.apply(&issues);
        issues = lint::collect(canvas, &pass.elements, options);
        tracing::debug!(
            iteration = iterations,
            applied,
            remaining = issues.len(),
            "repair pass complete"
        );

        // Later states win ties so partial progress is kept
        if issues.len() <= best.1.len() {
            best = (pass.elements.clone(), issues.clone(), pass.fixes);
        }
        if applied == 0 {
            break;
        }
    }

    let (repaired, remaining, fixes) = best;
    let report = Report::from_issues(remaining);
    let failed = has_actionable(&report.issues, options);
    if failed {
        tracing::debug!(
            remaining = report.counts.actionable(),
            iterations,
            "layout repair did not converge"
        );
    }

    let moved = elements
        .iter()
        .zip(&repaired)
        .filter(|(before, after)| before.bounds.is_valid() && before.bounds != after.bounds)
        .map(|(before, _)| before.id.clone())
        .collect();

    Ok(RepairOutcome {
        elements: repaired,
        report: report.with_convergence_failure(failed),
        iterations,
        fixes,
        moved,
    })
}

/// Whether any issue is of a kind this run is allowed to fix
fn has_actionable(issues: &[Issue], options: &Options) -> bool {
    issues.iter().any(|issue| options.fixes(issue.kind))
}

// ── Fix application ───────────────────────────────────────────────

/// Working state of one repair run
struct RepairPass<'a> {
    canvas: &'a Canvas,
    options: &'a Options,
    /// Canvas shrunk by the margin; every fix clamps into this
    area: Rect,
    elements: Vec<Element>,
    /// First valid occurrence of each id, matching what the lint checks see
    index: HashMap<ElementId, usize>,
    fixes: FixCounts,
}

impl<'a> RepairPass<'a> {
    fn new(canvas: &'a Canvas, elements: &[Element], options: &'a Options) -> Self {
        let mut index = HashMap::new();
        for (i, elem) in elements.iter().enumerate() {
            if elem.bounds.is_valid() {
                index.entry(elem.id.clone()).or_insert(i);
            }
        }
        Self {
            canvas,
            options,
            area: canvas.content_area(options.margin_min),
            elements: elements.to_vec(),
            index,
            fixes: FixCounts::default(),
        }
    }

    /// Apply one fix per issue in order; returns how many moved something
    fn apply(&mut self, issues: &[Issue]) -> usize {
        let mut applied = 0;
        for issue in issues {
            if !self.options.fixes(issue.kind) {
                continue;
            }
            let moved = match (issue.kind, issue.element_ids.as_slice()) {
                (IssueKind::OutOfBounds, [id]) => {
                    let moved = self.fix_bounds(id);
                    self.fixes.bounds += usize::from(moved);
                    moved
                }
                (IssueKind::Overlap, [a, b]) => {
                    let moved = self.fix_overlap(a, b);
                    self.fixes.overlap += usize::from(moved);
                    moved
                }
                (IssueKind::TooClose, [a, b]) => {
                    let moved = self.fix_spacing(a, b);
                    self.fixes.spacing += usize::from(moved);
                    moved
                }
                _ => false,
            };
            applied += usize::from(moved);
        }
        applied
    }

    fn bounds(&self, id: &ElementId) -> Option<Rect> {
        self.index.get(id).map(|&i| self.elements[i].bounds)
    }

    /// Move an element to `target`; false if it was already there
    fn place(&mut self, id: &ElementId, target: Rect) -> bool {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        if self.elements[i].bounds == target {
            return false;
        }
        tracing::trace!(id = %id, from = %self.elements[i].bounds, to = %target, "moving element");
        self.elements[i] = self.elements[i].moved_to(&target);
        true
    }

    fn fix_bounds(&mut self, id: &ElementId) -> bool {
        let Some(current) = self.bounds(id) else {
            return false;
        };
        if boundary::overflow(&current, self.canvas, self.options.margin_min).is_empty() {
            return false;
        }
        self.place(id, current.clamp_within(&self.area))
    }

    /// Push the higher id off the lower one; if the content area stops it
    /// short, push the lower one back by whatever overlap is left.
    fn fix_overlap(&mut self, low: &ElementId, high: &ElementId) -> bool {
        let (Some(anchor), Some(mover)) = (self.bounds(low), self.bounds(high)) else {
            return false;
        };
        if anchor.edge_gap(&mover) > -GEOMETRY_EPSILON
            || anchor.overlap_ratio(&mover) <= self.options.overlap_ratio_threshold
        {
            return false;
        }
        let Some((axis, delta)) = anchor.minimal_translation(&mover) else {
            return false;
        };

        let moved = mover.shift(axis, delta).clamp_within(&self.area);
        let mut changed = self.place(high, moved);

        let (gap_x, gap_y) = anchor.axis_gaps(&moved);
        if gap_x < -GEOMETRY_EPSILON && gap_y < -GEOMETRY_EPSILON {
            let residual = match axis {
                Axis::Horizontal => -gap_x,
                Axis::Vertical => -gap_y,
            };
            let pushed = anchor
                .shift(axis, -delta.signum() * residual)
                .clamp_within(&self.area);
            changed |= self.place(low, pushed);
        }
        changed
    }

    /// Spread a cramped pair apart by half the deficit each; a side held by
    /// the content area hands its share to the other.
    fn fix_spacing(&mut self, a: &ElementId, b: &ElementId) -> bool {
        let (Some(ra), Some(rb)) = (self.bounds(a), self.bounds(b)) else {
            return false;
        };
        let Some((axis, gap)) = spacing::band_gap(&ra, &rb) else {
            return false;
        };
        let deficit = self.options.spacing_min - gap;
        if deficit <= GEOMETRY_EPSILON {
            return false;
        }

        let (first_id, first, second_id, second) = if ra.mid(axis) <= rb.mid(axis) {
            (a, ra, b, rb)
        } else {
            (b, rb, a, ra)
        };
        let half = deficit / 2.0;

        let mut new_first = first.shift(axis, -half).clamp_within(&self.area);
        let mut new_second = second.shift(axis, half).clamp_within(&self.area);
        let first_short = half - (first.start(axis) - new_first.start(axis));
        let second_short = half - (new_second.start(axis) - second.start(axis));

        if first_short > GEOMETRY_EPSILON {
            new_second = new_second.shift(axis, first_short).clamp_within(&self.area);
        } else if second_short > GEOMETRY_EPSILON {
            new_first = new_first.shift(axis, -second_short).clamp_within(&self.area);
        }

        let moved_first = self.place(first_id, new_first);
        let moved_second = self.place(second_id, new_second);
        moved_first || moved_second
    }
}
