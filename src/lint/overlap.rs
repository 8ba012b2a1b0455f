//! Pairwise overlap detection

use crate::element::Element;
use crate::geometry::GEOMETRY_EPSILON;

use super::Issue;

/// Report each pair whose overlap ratio exceeds `threshold`.
///
/// Quadratic in the element count, which stays in the tens per canvas.
pub fn check(elements: &[&Element], threshold: f64, issues: &mut Vec<Issue>) {
    for i in 0..elements.len() {
        for j in (i + 1)..elements.len() {
            let a = elements[i];
            let b = elements[j];

            // float residue from earlier translations counts as touching
            if a.bounds.edge_gap(&b.bounds) > -GEOMETRY_EPSILON {
                continue;
            }
            let Some(region) = a.bounds.intersection(&b.bounds) else {
                continue;
            };
            let ratio = a.bounds.overlap_ratio(&b.bounds);
            if ratio > threshold {
                issues.push(Issue::overlap(&a.id, &b.id, region, ratio));
            }
        }
    }
}
