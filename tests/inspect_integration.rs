//! Integration tests for canvas inspection

use std::path::{Path, PathBuf};

use layout_integrity::{
    inspect, Canvas, EdgeOverflow, Element, ElementId, ElementKind, IssueCounts, IssueDetail,
    IssueKind, LoadError, Options, Rect, Snapshot,
};
use pretty_assertions::assert_eq;

fn load(source: &str) -> Snapshot {
    Snapshot::from_toml_str(source).expect("Should parse fixture")
}

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/layout-fixtures")
        .join(name)
}

#[test]
fn test_true_positives_all_categories() {
    let snapshot = load(include_str!("layout-fixtures/true-positives.toml"));
    let report = inspect(&snapshot.canvas, &snapshot.elements, &Options::default())
        .expect("Should inspect");

    assert_eq!(
        report.counts,
        IssueCounts {
            invalid: 1,
            out_of_bounds: 1,
            overlap: 1,
            too_close: 1,
        }
    );

    let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::InvalidElement,
            IssueKind::OutOfBounds,
            IssueKind::Overlap,
            IssueKind::TooClose,
        ]
    );

    assert!(report.issues[0].involves("ghost"));
    assert!(report.issues[1].involves("logo"));
    assert_eq!(
        report.issues[2].element_ids,
        vec![ElementId::new("chart"), ElementId::new("legend")]
    );
    assert_eq!(
        report.issues[3].element_ids,
        vec![ElementId::new("subtitle"), ElementId::new("title")]
    );

    // the connector crosses both shapes without being reported
    assert_eq!(report.issues_for("arrow").count(), 0);
}

#[test]
fn test_true_negatives_clean() {
    let snapshot = load(include_str!("layout-fixtures/true-negatives.toml"));
    let report = inspect(&snapshot.canvas, &snapshot.elements, &Options::default())
        .expect("Should inspect");
    assert!(
        report.is_clean(),
        "Expected no issues for true-negatives, got:\n{}",
        report
    );
}

#[test]
fn test_stricter_options_from_file() {
    let options = Options::from_file(&fixture_path("strict.toml")).expect("Should load options");
    assert_eq!(options.margin_min, 0.25);
    assert_eq!(options.spacing_min, 0.3);
    assert_eq!(options.max_iterations, 20);
    assert!(options.exempt_kinds.contains(&ElementKind::Placeholder));

    let snapshot = Snapshot::from_file(&fixture_path("true-negatives.toml"))
        .expect("Should load snapshot");
    assert_eq!(snapshot.elements.len(), 5);
    let report = inspect(&snapshot.canvas, &snapshot.elements, &options).expect("Should inspect");

    // footer sits 0.3 from the bottom edge, inside the 0.25 margin
    assert_eq!(report.counts.out_of_bounds, 0);
    // 0.3 apart is exactly the required spacing
    assert_eq!(report.counts.too_close, 0);
    assert!(report.is_clean(), "unexpected issues:\n{}", report);

    let options = options.with_spacing(0.4);
    let report = inspect(&snapshot.canvas, &snapshot.elements, &options).expect("Should inspect");
    assert_eq!(report.counts.too_close, 2);
}

#[test]
fn test_options_missing_file_is_io_error() {
    let result = Options::from_file(&fixture_path("no-such-options.toml"));
    assert!(matches!(result, Err(LoadError::Io(_))), "got {:?}", result);
}

#[test]
fn test_snapshot_missing_file_is_io_error() {
    let result = Snapshot::from_file(&fixture_path("no-such-layout.toml"));
    assert!(matches!(result, Err(LoadError::Io(_))), "got {:?}", result);
}

#[test]
fn test_options_file_with_unknown_key_is_parse_error() {
    // a snapshot file is not an options file
    let result = Options::from_file(&fixture_path("true-negatives.toml"));
    assert!(matches!(result, Err(LoadError::Parse(_))), "got {:?}", result);
}

#[test]
fn test_boundary_example() {
    let canvas = Canvas::new(10.0, 7.5);
    let elements = vec![Element::shape("e", Rect::new(9.0, 1.0, 3.0, 1.0))];
    let report = inspect(&canvas, &elements, &Options::default()).expect("Should inspect");

    assert_eq!(report.len(), 1);
    assert_eq!(
        report.issues[0].detail,
        IssueDetail::OutOfBounds(EdgeOverflow {
            right: 2.0,
            ..EdgeOverflow::default()
        })
    );
}

#[test]
fn test_overlap_example() {
    let canvas = Canvas::new(10.0, 7.5);
    let elements = vec![
        Element::shape("a", Rect::new(2.0, 2.0, 4.0, 3.0)),
        Element::shape("b", Rect::new(4.0, 3.0, 4.0, 3.0)),
    ];
    let report = inspect(&canvas, &elements, &Options::default()).expect("Should inspect");

    assert_eq!(report.len(), 1);
    let IssueDetail::Overlap { region, ratio } = report.issues[0].detail else {
        panic!("expected an overlap, got {}", report);
    };
    assert_eq!(region.area(), 4.0);
    assert!((ratio - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_spacing_example() {
    let canvas = Canvas::new(10.0, 7.5);
    let elements = vec![
        Element::shape("a", Rect::new(1.0, 1.0, 2.0, 1.0)),
        Element::shape("b", Rect::new(3.05, 1.0, 2.0, 1.0)),
    ];
    let report = inspect(&canvas, &elements, &Options::default()).expect("Should inspect");

    assert_eq!(report.counts.too_close, 1);
    assert!((report.issues[0].magnitude - 0.20).abs() < 1e-9);
}

#[test]
fn test_full_bleed_background() {
    let canvas = Canvas::WIDESCREEN;
    let elements = vec![
        Element::image("background", Rect::new(0.0, 0.0, 10.0, 5.625)),
        Element::text_box("title", Rect::new(0.5, 0.5, 9.0, 1.0)),
    ];

    let report = inspect(&canvas, &elements, &Options::default()).expect("Should inspect");
    assert_eq!(report.counts.overlap, 1);

    let options = Options::new().with_full_bleed_exempt(true);
    let report = inspect(&canvas, &elements, &options).expect("Should inspect");
    assert!(report.is_clean());
}

#[test]
fn test_report_text() {
    let snapshot = load(include_str!("layout-fixtures/true-positives.toml"));
    let report = inspect(&snapshot.canvas, &snapshot.elements, &Options::default())
        .expect("Should inspect");

    insta::assert_snapshot!(report.to_string(), @r###"
    4 issues (1 invalid, 1 out-of-bounds, 1 overlap, 1 too-close)
      invalid: element "ghost" has non-positive size 0.00x1.00
      out-of-bounds: element "logo" extends past the canvas (right by 0.40, bottom by 0.30)
      overlap: elements "chart" and "legend" overlap by 1.00x2.00 (50% of the smaller)
      too-close: elements "subtitle" and "title" are 0.10 apart (vertical), need 0.25 (short by 0.15)
    "###);
}
