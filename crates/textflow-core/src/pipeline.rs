//! Reconstruction entry points.
//!
//! Control flow: normalizer, then either clusterer + composer (geometric
//! input) or a direct join (pre-merged input), then the assembler. Empty
//! input short-circuits to [`StructuredResult::empty`].

use crate::assemble::assemble;
use crate::cluster::cluster_lines;
use crate::compose::{compose_lines, compose_pre_merged};
use crate::config::ReadingOrderConfig;
use crate::error::Result;
use crate::normalize::DetectionSet;
use crate::types::{PageMetadata, RawDetection, StructuredResult};
use log::debug;

/// Reconstruct reading-order text from raw backend output.
///
/// # Errors
///
/// - [`OcrError::InvalidConfig`](crate::OcrError::InvalidConfig) for an
///   unusable threshold
/// - [`OcrError::MixedDetectionShapes`](crate::OcrError::MixedDetectionShapes)
///   and [`OcrError::MalformedQuadrilateral`](crate::OcrError::MalformedQuadrilateral)
///   for invalid input
///
/// # Examples
///
/// ```
/// use textflow_core::{reconstruct, PageMetadata, RawDetection, ReadingOrderConfig};
///
/// let raw = vec![
///     RawDetection::PreMerged("Hello".to_string(), 0.9),
///     RawDetection::PreMerged("World".to_string(), 0.8),
/// ];
/// let result = reconstruct(&raw, PageMetadata::new(800, 600), &ReadingOrderConfig::default())?;
/// assert_eq!(result.text, "Hello\nWorld");
/// # Ok::<(), textflow_core::OcrError>(())
/// ```
pub fn reconstruct(
    raw: &[RawDetection],
    metadata: PageMetadata,
    config: &ReadingOrderConfig,
) -> Result<StructuredResult> {
    config.validate()?;
    let set = DetectionSet::from_raw(raw)?;
    Ok(reconstruct_set(&set, metadata, config))
}

/// Reconstruct reading-order text from an already validated detection set.
///
/// `config` is expected to have passed [`ReadingOrderConfig::validate`].
#[must_use = "result is reconstructed but not used"]
pub fn reconstruct_set(
    set: &DetectionSet,
    metadata: PageMetadata,
    config: &ReadingOrderConfig,
) -> StructuredResult {
    let composed = match set {
        DetectionSet::Empty => {
            debug!("No detections; returning empty result");
            return StructuredResult::empty(metadata);
        }
        DetectionSet::PreMerged(detections) => compose_pre_merged(detections),
        DetectionSet::Geometric(detections) => {
            let lines = cluster_lines(detections, config.line_height_threshold);
            compose_lines(&lines)
        }
    };

    let result = assemble(&composed, metadata);
    debug!(
        "Reconstructed {} line(s) from {} detection(s)",
        result.lines().count(),
        set.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::types::{Detection, Quadrilateral};

    fn raw(text: &str, left: f64, center_y: f64) -> RawDetection {
        Detection::new(
            Quadrilateral::from_rect(left, center_y - 5.0, left + 30.0, center_y + 5.0),
            text,
            0.9,
        )
        .into()
    }

    #[test]
    fn test_empty_input_keeps_metadata() {
        let result = reconstruct(&[], PageMetadata::new(800, 600), &ReadingOrderConfig::default())
            .unwrap();
        assert_eq!(result.text, "");
        assert_eq!(result.metadata, PageMetadata::new(800, 600));
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn test_two_lines_sorted_independently() {
        let detections = [
            raw("world", 60.0, 10.0),
            raw("again", 60.0, 40.0),
            raw("hello", 0.0, 12.0),
            raw("hello", 0.0, 41.0),
        ];
        let result = reconstruct(
            &detections,
            PageMetadata::new(100, 100),
            &ReadingOrderConfig::default(),
        )
        .unwrap();
        assert_eq!(result.text, "hello world\nhello again");
        assert!((result.confidence.unwrap() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected_before_input() {
        let config = ReadingOrderConfig::with_line_height_threshold(-5.0);
        let err = reconstruct(&[], PageMetadata::default(), &config).unwrap_err();
        assert!(matches!(err, OcrError::InvalidConfig(_)));
    }

    #[test]
    fn test_custom_threshold_changes_grouping() {
        let detections = [raw("a", 0.0, 0.0), raw("b", 40.0, 15.0)];
        let metadata = PageMetadata::new(50, 50);

        let wide = reconstruct(&detections, metadata, &ReadingOrderConfig::default()).unwrap();
        assert_eq!(wide.text, "a b");

        let tight = ReadingOrderConfig::with_line_height_threshold(10.0);
        let narrow = reconstruct(&detections, metadata, &tight).unwrap();
        assert_eq!(narrow.text, "a\nb");
    }
}
