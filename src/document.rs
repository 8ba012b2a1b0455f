//! Inspection and repair across a multi-canvas document.
//!
//! The engine never owns document state. A [`LayoutDocument`] hands out
//! value snapshots of each canvas and accepts repaired element sets back;
//! how those map onto slides, pages or shapes is up to the implementor.

use std::collections::BTreeMap;
use std::fmt;

use crate::element::{Element, ElementKind, Snapshot};
use crate::error::DocumentError;
use crate::lint::IssueKind;
use crate::options::Options;
use crate::repair::{repair, RepairOutcome};
use crate::report::{IssueCounts, Report};

/// Access to the canvases of a document
pub trait LayoutDocument {
    type Error: std::error::Error + Send + Sync + 'static;

    fn canvas_count(&self) -> usize;

    /// Current canvas size and elements of canvas `index`
    fn snapshot(&self, index: usize) -> Result<Snapshot, Self::Error>;

    /// Write repaired positions back; `elements` keeps the snapshot's order
    fn commit(&mut self, index: usize, elements: &[Element]) -> Result<(), Self::Error>;
}

/// Inspection result for one canvas
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSummary {
    pub index: usize,
    pub element_count: usize,
    pub kinds: BTreeMap<ElementKind, usize>,
    pub report: Report,
}

/// Inspection result for a whole document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentSummary {
    pub canvases: Vec<CanvasSummary>,
}

impl DocumentSummary {
    /// Indices of canvases with at least one issue
    pub fn canvases_with_issues(&self) -> Vec<usize> {
        self.canvases
            .iter()
            .filter(|c| !c.report.is_clean())
            .map(|c| c.index)
            .collect()
    }

    pub fn element_count(&self) -> usize {
        self.canvases.iter().map(|c| c.element_count).sum()
    }

    /// Element counts per kind over all canvases
    pub fn kinds(&self) -> BTreeMap<ElementKind, usize> {
        let mut totals = BTreeMap::new();
        for canvas in &self.canvases {
            for (kind, count) in &canvas.kinds {
                *totals.entry(*kind).or_insert(0) += count;
            }
        }
        totals
    }

    /// Issue counts per kind over all canvases
    pub fn totals(&self) -> IssueCounts {
        let mut totals = IssueCounts::default();
        for canvas in &self.canvases {
            let counts = canvas.report.counts;
            totals.invalid += counts.invalid;
            totals.out_of_bounds += counts.out_of_bounds;
            totals.overlap += counts.overlap;
            totals.too_close += counts.too_close;
        }
        totals
    }

    pub fn is_clean(&self) -> bool {
        self.canvases.iter().all(|c| c.report.is_clean())
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.canvases.len();
        write!(
            f,
            "{}, {}",
            plural(total, "canvas", "canvases"),
            plural(self.element_count(), "element", "elements")
        )?;

        let kinds: Vec<String> = self
            .kinds()
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();
        if !kinds.is_empty() {
            write!(f, " ({})", kinds.join(", "))?;
        }

        let flagged = self.canvases_with_issues();
        if flagged.is_empty() {
            return write!(f, "\nno layout issues");
        }

        for canvas in self.canvases.iter().filter(|c| !c.report.is_clean()) {
            let counts = canvas.report.counts;
            let breakdown: Vec<String> = IssueKind::ALL
                .iter()
                .filter(|kind| counts.get(**kind) > 0)
                .map(|kind| format!("{} {}", counts.get(*kind), kind))
                .collect();
            write!(f, "\n  canvas {}: {}", canvas.index, breakdown.join(", "))?;
        }
        write!(
            f,
            "\n{} of {} with layout issues",
            flagged.len(),
            plural(total, "canvas", "canvases")
        )
    }
}

/// Inspect every canvas of a document
pub fn inspect_document<D: LayoutDocument>(
    doc: &D,
    options: &Options,
) -> Result<DocumentSummary, DocumentError<D::Error>> {
    options.validate()?;

    let mut summary = DocumentSummary::default();
    for index in 0..doc.canvas_count() {
        let snapshot = doc.snapshot(index).map_err(DocumentError::Document)?;
        let report = crate::inspect(&snapshot.canvas, &snapshot.elements, options)?;

        let mut kinds = BTreeMap::new();
        for elem in &snapshot.elements {
            *kinds.entry(elem.kind).or_insert(0) += 1;
        }
        tracing::trace!(index, issues = report.len(), "inspected canvas");

        summary.canvases.push(CanvasSummary {
            index,
            element_count: snapshot.elements.len(),
            kinds,
            report,
        });
    }

    tracing::debug!(
        canvases = summary.canvases.len(),
        flagged = summary.canvases_with_issues().len(),
        "inspected document"
    );
    Ok(summary)
}

/// Repair one canvas and commit the result.
///
/// Nothing is committed when repair leaves every element where it was.
pub fn repair_canvas<D: LayoutDocument>(
    doc: &mut D,
    index: usize,
    options: &Options,
) -> Result<RepairOutcome, DocumentError<D::Error>> {
    let count = doc.canvas_count();
    if index >= count {
        return Err(DocumentError::CanvasOutOfRange { index, count });
    }

    let snapshot = doc.snapshot(index).map_err(DocumentError::Document)?;
    let outcome = repair(&snapshot.canvas, &snapshot.elements, options)?;

    if outcome.moved().is_empty() {
        tracing::debug!(index, "nothing to commit");
    } else {
        tracing::debug!(
            index,
            moved = outcome.moved().len(),
            "committing repaired canvas"
        );
        doc.commit(index, &outcome.elements)
            .map_err(DocumentError::Document)?;
    }
    Ok(outcome)
}
