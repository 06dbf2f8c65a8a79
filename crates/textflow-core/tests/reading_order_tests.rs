//! Reading-order reconstruction tests
//!
//! End-to-end checks through the public API: empty pages, pre-merged input,
//! line splitting, anchoring, empty-text handling and input validation.

use rstest::rstest;
use textflow_core::{
    reconstruct, Detection, OcrError, PageMetadata, Point, Quadrilateral, RawDetection,
    ReadingOrderConfig, StructuredResult,
};

// ============================================================================
// Helpers
// ============================================================================

/// Axis-aligned 10px-tall token centered vertically at `center_y`
fn token(text: &str, left: f64, center_y: f64) -> RawDetection {
    token_with_confidence(text, left, center_y, 0.9)
}

fn token_with_confidence(text: &str, left: f64, center_y: f64, confidence: f64) -> RawDetection {
    Detection::new(
        Quadrilateral::from_rect(left, center_y - 5.0, left + 25.0, center_y + 5.0),
        text,
        confidence,
    )
    .into()
}

fn run(raw: &[RawDetection]) -> StructuredResult {
    reconstruct(raw, PageMetadata::new(800, 600), &ReadingOrderConfig::default())
        .expect("reconstruction should succeed")
}

// ============================================================================
// Terminal and pre-merged paths
// ============================================================================

#[test]
fn test_empty_input_returns_metadata_only() {
    let result = run(&[]);
    assert_eq!(result.text, "");
    assert_eq!(result.metadata, PageMetadata::new(800, 600));
    assert_eq!(result.mime_type, "text/plain");
    assert!(result.confidence.is_none());
}

#[test]
fn test_pre_merged_pairs_join_with_newlines() {
    let result = run(&[
        RawDetection::PreMerged("Hello".to_string(), 0.9),
        RawDetection::PreMerged("World".to_string(), 0.8),
    ]);
    assert_eq!(result.text, "Hello\nWorld");
    assert!((result.confidence.unwrap() - 0.85).abs() < 1e-9);
}

#[test]
fn test_pre_merged_whitespace_is_normalized() {
    let result = run(&[
        RawDetection::PreMerged("  spaced   out ".to_string(), 0.5),
        RawDetection::PreMerged(String::new(), 0.5),
        RawDetection::PreMerged("\tnext".to_string(), 0.5),
    ]);
    assert_eq!(result.text, "spaced out\nnext");
}

// ============================================================================
// Geometric path
// ============================================================================

#[test]
fn test_single_line_sorted_horizontally() {
    let result = run(&[
        token("B", 50.0, 100.0),
        token("A", 10.0, 102.0),
        token("C", 90.0, 105.0),
    ]);
    assert_eq!(result.text, "A B C");
}

#[test]
fn test_two_line_split() {
    let result = run(&[
        token("second-right", 200.0, 40.0),
        token("first-right", 200.0, 10.0),
        token("second-left", 0.0, 40.0),
        token("first-left", 0.0, 10.0),
    ]);
    assert_eq!(result.text, "first-left first-right\nsecond-left second-right");
}

#[test]
fn test_anchor_is_fixed_at_first_member() {
    let result = run(&[
        token("c", 0.0, 30.0),
        token("b", 100.0, 15.0),
        token("a", 50.0, 0.0),
    ]);
    // a (0) and b (15) share a line; c is 30 away from the anchor at 0
    assert_eq!(result.text, "a b\nc");
}

#[rstest]
#[case::leading(vec![token("", 0.0, 10.0), token("x", 40.0, 10.0)], "x")]
#[case::middle(vec![token("x", 0.0, 10.0), token("", 40.0, 10.0), token("y", 80.0, 10.0)], "x y")]
#[case::trailing(vec![token("x", 0.0, 10.0), token("", 40.0, 10.0)], "x")]
#[case::whole_line(vec![token("x", 0.0, 10.0), token("", 0.0, 100.0), token("z", 0.0, 200.0)], "x\nz")]
#[case::only_empty(vec![token("", 0.0, 10.0)], "")]
fn test_empty_text_is_skipped(#[case] raw: Vec<RawDetection>, #[case] expected: &str) {
    let result = run(&raw);
    assert_eq!(result.text, expected);
    assert!(!result.text.contains("  "));
}

#[test]
fn test_empty_text_does_not_count_toward_confidence() {
    let result = run(&[
        token_with_confidence("a", 0.0, 10.0, 0.4),
        token_with_confidence("", 30.0, 10.0, 0.0),
        token_with_confidence("b", 60.0, 10.0, 0.8),
    ]);
    assert!((result.confidence.unwrap() - 0.6).abs() < 1e-9);
}

#[test]
fn test_all_empty_geometric_input_has_no_confidence() {
    let result = run(&[token("", 0.0, 10.0), token("", 0.0, 80.0)]);
    assert_eq!(result.text, "");
    assert!(result.confidence.is_none());
}

#[rstest]
#[case(5.0, "a\nb\nc")]
#[case(20.0, "a b\nc")]
#[case(40.0, "a b c")]
fn test_threshold_controls_grouping(#[case] threshold: f64, #[case] expected: &str) {
    let raw = [
        token("a", 0.0, 0.0),
        token("b", 30.0, 15.0),
        token("c", 60.0, 30.0),
    ];
    let config = ReadingOrderConfig::with_line_height_threshold(threshold);
    let result = reconstruct(&raw, PageMetadata::new(100, 100), &config).unwrap();
    assert_eq!(result.text, expected);
}

#[test]
fn test_token_whitespace_inherited_then_normalized() {
    let result = run(&[token("multi  word", 0.0, 10.0), token("tail\t", 100.0, 10.0)]);
    assert_eq!(result.text, "multi word tail");
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_malformed_quadrilateral_fails_fast() {
    let raw = [
        token("fine", 0.0, 10.0),
        RawDetection::Geometric(
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(0.0, 1.0),
                Point::new(0.5, 0.5),
            ],
            "five corners".to_string(),
            0.9,
        ),
    ];
    let err = reconstruct(&raw, PageMetadata::new(10, 10), &ReadingOrderConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        OcrError::MalformedQuadrilateral {
            index: 1,
            points: 5
        }
    ));
}

#[test]
fn test_mixed_shapes_rejected() {
    let raw = [
        token("geometric", 0.0, 10.0),
        RawDetection::PreMerged("pair".to_string(), 0.9),
    ];
    let err = reconstruct(&raw, PageMetadata::new(10, 10), &ReadingOrderConfig::default())
        .unwrap_err();
    assert!(matches!(
        err,
        OcrError::MixedDetectionShapes {
            geometric: 0,
            pre_merged: 1
        }
    ));
}

#[test]
fn test_easyocr_json_round_trip_through_pipeline() {
    let json = r#"[
        [[[120, 12], [200, 12], [200, 30], [120, 30]], "world", 0.91],
        [[[10, 10], [100, 10], [100, 32], [10, 32]], "hello", 0.87],
        [[[10, 60], [90, 60], [90, 80], [10, 80]], "next", 0.95]
    ]"#;
    let raw: Vec<RawDetection> = serde_json::from_str(json).unwrap();
    let result = run(&raw);
    assert_eq!(result.text, "hello world\nnext");
}
