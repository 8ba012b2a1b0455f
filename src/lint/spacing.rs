//! Spacing checks between neighbouring elements

use crate::element::Element;
use crate::geometry::{Axis, Rect, GEOMETRY_EPSILON};

use super::Issue;

/// Axis and gap between two rectangles that share a row or column band.
///
/// Returns `None` for overlapping pairs and for pairs that are only
/// diagonally related (no shared band).
pub fn band_gap(a: &Rect, b: &Rect) -> Option<(Axis, f64)> {
    let (gap_x, gap_y) = a.axis_gaps(b);
    let shares_row = gap_y < -GEOMETRY_EPSILON;
    let shares_col = gap_x < -GEOMETRY_EPSILON;
    match (shares_row, shares_col) {
        (true, false) => Some((Axis::Horizontal, gap_x.max(0.0))),
        (false, true) => Some((Axis::Vertical, gap_y.max(0.0))),
        _ => None,
    }
}

/// Report same-band pairs closer than `spacing_min`
pub fn check(elements: &[&Element], spacing_min: f64, issues: &mut Vec<Issue>) {
    for i in 0..elements.len() {
        for j in (i + 1)..elements.len() {
            let a = elements[i];
            let b = elements[j];

            let Some((axis, gap)) = band_gap(&a.bounds, &b.bounds) else {
                continue;
            };
            if spacing_min - gap > GEOMETRY_EPSILON {
                issues.push(Issue::too_close(&a.id, &b.id, axis, gap, spacing_min));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::IssueDetail;

    fn run(elements: &[Element], spacing: f64) -> Vec<Issue> {
        let refs: Vec<&Element> = elements.iter().collect();
        let mut issues = Vec::new();
        check(&refs, spacing, &mut issues);
        issues
    }

    #[test]
    fn test_same_row_too_close() {
        let issues = run(
            &[
                Element::shape("a", Rect::new(1.0, 1.0, 2.0, 1.0)),
                Element::shape("b", Rect::new(3.05, 1.0, 2.0, 1.0)),
            ],
            0.25,
        );
        assert_eq!(issues.len(), 1);
        let IssueDetail::TooClose {
            axis, gap, deficit, ..
        } = issues[0].detail
        else {
            panic!("expected too-close detail");
        };
        assert_eq!(axis, Axis::Horizontal);
        assert!((gap - 0.05).abs() < 1e-9);
        assert!((deficit - 0.20).abs() < 1e-9);
    }

    #[test]
    fn test_same_column_too_close() {
        let issues = run(
            &[
                Element::text_box("title", Rect::new(1.0, 0.5, 8.0, 1.0)),
                Element::text_box("body", Rect::new(2.0, 1.6, 6.0, 3.0)),
            ],
            0.25,
        );
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0].detail,
            IssueDetail::TooClose {
                axis: Axis::Vertical,
                ..
            }
        ));
    }

    #[test]
    fn test_touching_counts_as_zero_gap() {
        let issues = run(
            &[
                Element::shape("a", Rect::new(0.0, 0.0, 2.0, 1.0)),
                Element::shape("b", Rect::new(2.0, 0.0, 2.0, 1.0)),
            ],
            0.25,
        );
        assert_eq!(issues.len(), 1);
        assert!((issues[0].magnitude - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_diagonal_neighbours_ignored() {
        let issues = run(
            &[
                Element::shape("a", Rect::new(0.0, 0.0, 2.0, 1.0)),
                Element::shape("b", Rect::new(2.1, 1.1, 2.0, 1.0)),
            ],
            0.25,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_overlapping_pairs_ignored() {
        let issues = run(
            &[
                Element::shape("a", Rect::new(0.0, 0.0, 2.0, 1.0)),
                Element::shape("b", Rect::new(1.9, 0.0, 2.0, 1.0)),
            ],
            0.25,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_wide_gap_fine() {
        let issues = run(
            &[
                Element::shape("a", Rect::new(0.0, 0.0, 2.0, 1.0)),
                Element::shape("b", Rect::new(2.25, 0.0, 2.0, 1.0)),
            ],
            0.25,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_zero_spacing_disables_check() {
        let issues = run(
            &[
                Element::shape("a", Rect::new(0.0, 0.0, 2.0, 1.0)),
                Element::shape("b", Rect::new(2.0, 0.0, 2.0, 1.0)),
            ],
            0.0,
        );
        assert!(issues.is_empty());
    }
}
