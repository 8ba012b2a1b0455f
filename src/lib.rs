//! Layout Integrity - detection and repair of mechanical layout defects
//!
//! This library checks a canvas of positioned elements for elements spilling
//! past the edges, overlapping elements, and neighbours placed too close
//! together, and can nudge elements around to fix what it finds.
//!
//! # Example
//!
//! ```rust
//! use layout_integrity::{inspect, repair, Canvas, Element, Options, Rect};
//!
//! let canvas = Canvas::STANDARD;
//! let elements = vec![Element::shape("chart", Rect::new(9.0, 1.0, 3.0, 1.0))];
//!
//! let report = inspect(&canvas, &elements, &Options::default()).unwrap();
//! assert_eq!(report.counts.out_of_bounds, 1);
//!
//! let (fixed, report) = repair(&canvas, &elements, &Options::default())
//!     .unwrap()
//!     .into_parts();
//! assert_eq!(fixed[0].bounds.left, 7.0);
//! assert!(report.is_clean());
//! ```

pub mod document;
pub mod element;
pub mod error;
pub mod geometry;
pub mod lint;
pub mod options;
pub mod repair;
pub mod report;

pub use document::{inspect_document, repair_canvas, CanvasSummary, DocumentSummary, LayoutDocument};
pub use element::{Element, ElementId, ElementKind, Endpoints, Snapshot};
pub use error::{ConfigError, DocumentError, LoadError};
pub use geometry::{AspectRatio, Axis, Canvas, Point, Rect, GEOMETRY_EPSILON};
pub use lint::{EdgeOverflow, InvalidReason, Issue, IssueDetail, IssueKind};
pub use options::Options;
pub use repair::{repair, FixCounts, RepairOutcome};
pub use report::{IssueCounts, Report};

/// Inspect one canvas without changing anything
///
/// Options and canvas are validated before any element is looked at.
pub fn inspect(
    canvas: &Canvas,
    elements: &[Element],
    options: &Options,
) -> Result<Report, ConfigError> {
    options.validate_for(canvas)?;
    Ok(Report::from_issues(lint::collect(canvas, elements, options)))
}
