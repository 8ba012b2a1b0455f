//! Canvas boundary checks

use crate::element::Element;
use crate::geometry::{Canvas, Rect, GEOMETRY_EPSILON};

use super::{EdgeOverflow, Issue};

/// Per-edge overflow of `bounds` past the canvas shrunk by `margin`
pub fn overflow(bounds: &Rect, canvas: &Canvas, margin: f64) -> EdgeOverflow {
    let trim = |amount: f64| if amount > GEOMETRY_EPSILON { amount } else { 0.0 };
    EdgeOverflow {
        left: trim(margin - bounds.left),
        top: trim(margin - bounds.top),
        right: trim(bounds.right() - (canvas.width - margin)),
        bottom: trim(bounds.bottom() - (canvas.height - margin)),
    }
}

/// Report every element reaching past the margin-adjusted canvas
pub fn check(canvas: &Canvas, elements: &[&Element], margin: f64, issues: &mut Vec<Issue>) {
    for elem in elements {
        let edges = overflow(&elem.bounds, canvas, margin);
        if !edges.is_empty() {
            issues.push(Issue::out_of_bounds(&elem.id, edges));
        }
    }
}
