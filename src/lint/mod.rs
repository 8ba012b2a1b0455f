//! Lint engine for detecting layout defects on a canvas.
//!
//! Checks a snapshot of placed elements for mechanical issues: elements
//! spilling past the canvas edges, overlapping elements, and neighbours
//! crammed too close together. Each check lives in its own submodule and
//! appends to a shared issue list.

pub mod boundary;
pub mod overlap;
pub mod spacing;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};
use crate::geometry::{Axis, Canvas, Rect};
use crate::options::Options;

/// Share of the canvas (on both axes) at which an element counts as a
/// full-bleed background
pub const FULL_BLEED_COVERAGE: f64 = 0.9;

/// Category of layout defect, declared in reporting priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    InvalidElement,
    OutOfBounds,
    Overlap,
    TooClose,
}

impl IssueKind {
    pub const ALL: [IssueKind; 4] = [
        IssueKind::InvalidElement,
        IssueKind::OutOfBounds,
        IssueKind::Overlap,
        IssueKind::TooClose,
    ];

    /// Whether repair can do anything about this kind
    pub fn is_actionable(&self) -> bool {
        !matches!(self, IssueKind::InvalidElement)
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::InvalidElement => write!(f, "invalid"),
            IssueKind::OutOfBounds => write!(f, "out-of-bounds"),
            IssueKind::Overlap => write!(f, "overlap"),
            IssueKind::TooClose => write!(f, "too-close"),
        }
    }
}

/// How far an element reaches past each allowed edge (all values >= 0)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeOverflow {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl EdgeOverflow {
    pub fn total(&self) -> f64 {
        self.left + self.top + self.right + self.bottom
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0.0
    }

    fn edges(&self) -> [(&'static str, f64); 4] {
        [
            ("left", self.left),
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
        ]
    }
}

/// Why an element was excluded from analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InvalidReason {
    NonPositiveSize { width: f64, height: f64 },
    NonFinite,
    DuplicateId,
}

/// Kind-specific measurements attached to an issue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueDetail {
    OutOfBounds(EdgeOverflow),
    Overlap {
        region: Rect,
        ratio: f64,
    },
    TooClose {
        axis: Axis,
        gap: f64,
        required: f64,
        deficit: f64,
    },
    InvalidElement(InvalidReason),
}

/// A single layout defect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    /// Elements involved; pairs are listed in ascending id order
    pub element_ids: Vec<ElementId>,
    /// Severity used for ordering: overflow sum, overlap ratio or deficit
    pub magnitude: f64,
    pub detail: IssueDetail,
}

impl Issue {
    pub fn out_of_bounds(id: &ElementId, overflow: EdgeOverflow) -> Self {
        Self {
            kind: IssueKind::OutOfBounds,
            element_ids: vec![id.clone()],
            magnitude: overflow.total(),
            detail: IssueDetail::OutOfBounds(overflow),
        }
    }

    pub fn overlap(a: &ElementId, b: &ElementId, region: Rect, ratio: f64) -> Self {
        Self {
            kind: IssueKind::Overlap,
            element_ids: ordered_pair(a, b),
            magnitude: ratio,
            detail: IssueDetail::Overlap { region, ratio },
        }
    }

    pub fn too_close(a: &ElementId, b: &ElementId, axis: Axis, gap: f64, required: f64) -> Self {
        let deficit = required - gap;
        Self {
            kind: IssueKind::TooClose,
            element_ids: ordered_pair(a, b),
            magnitude: deficit,
            detail: IssueDetail::TooClose {
                axis,
                gap,
                required,
                deficit,
            },
        }
    }

    pub fn invalid(id: &ElementId, reason: InvalidReason) -> Self {
        Self {
            kind: IssueKind::InvalidElement,
            element_ids: vec![id.clone()],
            magnitude: 0.0,
            detail: IssueDetail::InvalidElement(reason),
        }
    }

    /// Whether the issue mentions the given element
    pub fn involves(&self, id: &str) -> bool {
        self.element_ids.iter().any(|e| e.as_str() == id)
    }
}

fn ordered_pair(a: &ElementId, b: &ElementId) -> Vec<ElementId> {
    if a <= b {
        vec![a.clone(), b.clone()]
    } else {
        vec![b.clone(), a.clone()]
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .element_ids
            .iter()
            .map(|id| format!("\"{}\"", id))
            .collect();
        match &self.detail {
            IssueDetail::OutOfBounds(overflow) => {
                let edges: Vec<String> = overflow
                    .edges()
                    .iter()
                    .filter(|(_, amount)| *amount > 0.0)
                    .map(|(edge, amount)| format!("{} by {:.2}", edge, amount))
                    .collect();
                write!(
                    f,
                    "element {} extends past the canvas ({})",
                    names.join(", "),
                    edges.join(", ")
                )
            }
            IssueDetail::Overlap { region, ratio } => write!(
                f,
                "elements {} overlap by {:.2}x{:.2} ({:.0}% of the smaller)",
                names.join(" and "),
                region.width,
                region.height,
                ratio * 100.0
            ),
            IssueDetail::TooClose {
                axis,
                gap,
                required,
                deficit,
            } => write!(
                f,
                "elements {} are {:.2} apart ({}), need {:.2} (short by {:.2})",
                names.join(" and "),
                gap,
                axis,
                required,
                deficit
            ),
            IssueDetail::InvalidElement(reason) => match reason {
                InvalidReason::NonPositiveSize { width, height } => write!(
                    f,
                    "element {} has non-positive size {:.2}x{:.2}",
                    names.join(", "),
                    width,
                    height
                ),
                InvalidReason::NonFinite => {
                    write!(f, "element {} has non-finite geometry", names.join(", "))
                }
                InvalidReason::DuplicateId => {
                    write!(f, "element id {} is used more than once", names.join(", "))
                }
            },
        }
    }
}

/// Run all checks on one canvas.
///
/// Invalid elements are reported and left out of every geometric check.
/// Options are assumed to be validated already.
pub fn collect(canvas: &Canvas, elements: &[Element], options: &Options) -> Vec<Issue> {
    let mut issues = Vec::new();
    let valid = check_elements(elements, &mut issues);

    boundary::check(canvas, &valid, options.margin_min, &mut issues);

    let candidates: Vec<&Element> = valid
        .iter()
        .copied()
        .filter(|e| !is_exempt(e, canvas, options))
        .collect();
    overlap::check(&candidates, options.overlap_ratio_threshold, &mut issues);
    spacing::check(&candidates, options.spacing_min, &mut issues);

    issues
}

// ── Element validation ────────────────────────────────────────────

/// Report elements that cannot enter analysis and return the rest.
///
/// The first occurrence of a duplicated id stays in; later ones are reported.
fn check_elements<'a>(elements: &'a [Element], issues: &mut Vec<Issue>) -> Vec<&'a Element> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut valid = Vec::with_capacity(elements.len());

    for elem in elements {
        let bounds = &elem.bounds;
        if !bounds.is_finite() {
            issues.push(Issue::invalid(&elem.id, InvalidReason::NonFinite));
            continue;
        }
        if !bounds.is_valid() {
            issues.push(Issue::invalid(
                &elem.id,
                InvalidReason::NonPositiveSize {
                    width: bounds.width,
                    height: bounds.height,
                },
            ));
            continue;
        }
        if !seen.insert(elem.id.as_str()) {
            issues.push(Issue::invalid(&elem.id, InvalidReason::DuplicateId));
            continue;
        }
        valid.push(elem);
    }

    valid
}

/// Whether an element sits out the overlap and spacing checks
pub fn is_exempt(elem: &Element, canvas: &Canvas, options: &Options) -> bool {
    elem.exempt_from_overlap
        || options.is_exempt_kind(elem.kind)
        || (options.exempt_full_bleed && is_full_bleed(&elem.bounds, canvas))
}

fn is_full_bleed(bounds: &Rect, canvas: &Canvas) -> bool {
    bounds.width >= canvas.width * FULL_BLEED_COVERAGE
        && bounds.height >= canvas.height * FULL_BLEED_COVERAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn make_rect(id: &str, left: f64, top: f64, w: f64, h: f64) -> Element {
        Element::shape(id, Rect::new(left, top, w, h))
    }

    fn kinds(issues: &[Issue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_clean_layout_has_no_issues() {
        let canvas = Canvas::new(10.0, 7.5);
        let elements = vec![
            make_rect("a", 1.0, 1.0, 2.0, 2.0),
            make_rect("b", 5.0, 1.0, 2.0, 2.0),
        ];
        assert!(collect(&canvas, &elements, &Options::default()).is_empty());
    }

    #[test]
    fn test_invalid_element_excluded_from_geometry() {
        let canvas = Canvas::new(10.0, 7.5);
        let elements = vec![
            make_rect("a", 1.0, 1.0, 2.0, 2.0),
            // would overlap "a" and overflow the canvas if it were analyzed
            make_rect("flat", 0.0, 1.5, 20.0, 0.0),
        ];
        let issues = collect(&canvas, &elements, &Options::default());
        assert_eq!(kinds(&issues), vec![IssueKind::InvalidElement]);
        assert_eq!(
            issues[0].detail,
            IssueDetail::InvalidElement(InvalidReason::NonPositiveSize {
                width: 20.0,
                height: 0.0
            })
        );
    }

    #[test]
    fn test_non_finite_element() {
        let canvas = Canvas::new(10.0, 7.5);
        let elements = vec![make_rect("nan", f64::NAN, 1.0, 2.0, 2.0)];
        let issues = collect(&canvas, &elements, &Options::default());
        assert_eq!(
            issues[0].detail,
            IssueDetail::InvalidElement(InvalidReason::NonFinite)
        );
    }

    #[test]
    fn test_duplicate_id_reported_once() {
        let canvas = Canvas::new(10.0, 7.5);
        let elements = vec![
            make_rect("a", 1.0, 1.0, 2.0, 2.0),
            make_rect("a", 1.5, 1.5, 2.0, 2.0),
        ];
        let issues = collect(&canvas, &elements, &Options::default());
        assert_eq!(kinds(&issues), vec![IssueKind::InvalidElement]);
        assert!(issues[0].involves("a"));
    }

    #[test]
    fn test_connectors_exempt_from_overlap() {
        let canvas = Canvas::new(10.0, 7.5);
        let elements = vec![
            make_rect("a", 1.0, 1.0, 3.0, 2.0),
            Element::new("line", ElementKind::Connector, Rect::new(2.0, 1.5, 3.0, 0.5)),
        ];
        assert!(collect(&canvas, &elements, &Options::default()).is_empty());
    }

    #[test]
    fn test_exempt_connector_still_bounds_checked() {
        let canvas = Canvas::new(10.0, 7.5);
        let elements = vec![Element::new(
            "line",
            ElementKind::Connector,
            Rect::new(8.0, 1.0, 3.0, 0.5),
        )];
        let issues = collect(&canvas, &elements, &Options::default());
        assert_eq!(kinds(&issues), vec![IssueKind::OutOfBounds]);
    }

    #[test]
    fn test_exempt_kinds_option() {
        let canvas = Canvas::new(10.0, 7.5);
        let elements = vec![
            make_rect("a", 1.0, 1.0, 3.0, 2.0),
            Element::placeholder("ph", Rect::new(2.0, 1.5, 3.0, 2.0)),
        ];
        let options = Options::new().with_exempt_kind(ElementKind::Placeholder);
        assert!(collect(&canvas, &elements, &options).is_empty());
        assert_eq!(
            kinds(&collect(&canvas, &elements, &Options::default())),
            vec![IssueKind::Overlap]
        );
    }

    #[test]
    fn test_full_bleed_background_exempt() {
        let canvas = Canvas::new(10.0, 7.5);
        let elements = vec![
            Element::image("bg", Rect::new(0.0, 0.0, 10.0, 7.5)),
            make_rect("a", 1.0, 1.0, 3.0, 2.0),
        ];
        let options = Options::new().with_full_bleed_exempt(true);
        assert!(collect(&canvas, &elements, &options).is_empty());
    }

    #[test]
    fn test_pair_ids_sorted() {
        let issue = Issue::overlap(
            &ElementId::new("zeta"),
            &ElementId::new("alpha"),
            Rect::new(0.0, 0.0, 1.0, 1.0),
            0.5,
        );
        assert_eq!(
            issue.element_ids,
            vec![ElementId::new("alpha"), ElementId::new("zeta")]
        );
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue::out_of_bounds(
            &ElementId::new("title"),
            EdgeOverflow {
                right: 2.0,
                ..EdgeOverflow::default()
            },
        );
        assert_eq!(
            issue.to_string(),
            "element \"title\" extends past the canvas (right by 2.00)"
        );

        let issue = Issue::too_close(
            &ElementId::new("a"),
            &ElementId::new("b"),
            Axis::Horizontal,
            0.05,
            0.25,
        );
        assert_eq!(
            issue.to_string(),
            "elements \"a\" and \"b\" are 0.05 apart (horizontal), need 0.25 (short by 0.20)"
        );
    }
}
