//! Detection normalizer: resolves raw backend output into one typed shape.
//!
//! Backends return either line-level `(text, confidence)` pairs or geometric
//! `(box, text, confidence)` triples. The shape is checked once here so the
//! rest of the pipeline never re-inspects individual elements.

use crate::error::{OcrError, Result};
use crate::types::{Detection, PreMergedDetection, Quadrilateral, RawDetection};
use log::{debug, warn};

/// Backend output after shape validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionSet {
    /// No detections at all
    Empty,
    /// Line-level results without geometry
    PreMerged(Vec<PreMergedDetection>),
    /// Token-level results with bounding boxes
    Geometric(Vec<Detection>),
}

impl DetectionSet {
    /// Validate raw backend output and resolve its shape.
    ///
    /// # Errors
    ///
    /// - [`OcrError::MixedDetectionShapes`] if pairs and triples are mixed
    /// - [`OcrError::MalformedQuadrilateral`] if a box does not have 4 corners
    pub fn from_raw(raw: &[RawDetection]) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::Empty);
        }

        warn_out_of_range_confidence(raw);

        let first_geometric = raw
            .iter()
            .position(|d| matches!(d, RawDetection::Geometric(..)));
        let first_pre_merged = raw
            .iter()
            .position(|d| matches!(d, RawDetection::PreMerged(..)));

        match (first_geometric, first_pre_merged) {
            (Some(geometric), Some(pre_merged)) => Err(OcrError::MixedDetectionShapes {
                geometric,
                pre_merged,
            }),
            (None, _) => {
                debug!("Routing {} pre-merged detections", raw.len());
                let detections = raw
                    .iter()
                    .filter_map(|d| match d {
                        RawDetection::PreMerged(text, confidence) => {
                            Some(PreMergedDetection::new(text.clone(), *confidence))
                        }
                        RawDetection::Geometric(..) => None,
                    })
                    .collect();
                Ok(Self::PreMerged(detections))
            }
            (Some(_), None) => {
                debug!("Routing {} geometric detections", raw.len());
                let detections = raw
                    .iter()
                    .enumerate()
                    .filter_map(|(index, d)| match d {
                        RawDetection::Geometric(points, text, confidence) => Some(
                            Quadrilateral::from_points(points, index)
                                .map(|bbox| Detection::new(bbox, text.clone(), *confidence)),
                        ),
                        RawDetection::PreMerged(..) => None,
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Geometric(detections))
            }
        }
    }

    /// Number of detections in the set
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::PreMerged(detections) => detections.len(),
            Self::Geometric(detections) => detections.len(),
        }
    }

    /// Whether the set holds no detections
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Detection>> for DetectionSet {
    fn from(detections: Vec<Detection>) -> Self {
        if detections.is_empty() {
            Self::Empty
        } else {
            Self::Geometric(detections)
        }
    }
}

impl From<Vec<PreMergedDetection>> for DetectionSet {
    fn from(detections: Vec<PreMergedDetection>) -> Self {
        if detections.is_empty() {
            Self::Empty
        } else {
            Self::PreMerged(detections)
        }
    }
}

// Out-of-range confidences are accepted verbatim; the backend owns the scale.
fn warn_out_of_range_confidence(raw: &[RawDetection]) {
    let out_of_range = raw
        .iter()
        .filter(|d| !(0.0..=1.0).contains(&d.confidence()))
        .count();
    if out_of_range > 0 {
        warn!("{out_of_range} detection(s) have confidence outside [0, 1]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn rect_points(left: f64, top: f64, right: f64, bottom: f64) -> Vec<Point> {
        Quadrilateral::from_rect(left, top, right, bottom).0.to_vec()
    }

    #[test]
    fn test_empty_input() {
        let set = DetectionSet::from_raw(&[]).unwrap();
        assert_eq!(set, DetectionSet::Empty);
        assert!(set.is_empty());
    }

    #[test]
    fn test_pre_merged_routing() {
        let raw = vec![
            RawDetection::PreMerged("Hello".to_string(), 0.9),
            RawDetection::PreMerged(String::new(), 0.1),
        ];
        let set = DetectionSet::from_raw(&raw).unwrap();
        match set {
            DetectionSet::PreMerged(detections) => {
                assert_eq!(detections.len(), 2);
                assert_eq!(detections[0].text, "Hello");
                assert_eq!(detections[1].text, "");
            }
            other => panic!("expected pre-merged set, got {other:?}"),
        }
    }

    #[test]
    fn test_geometric_routing_preserves_order() {
        let raw = vec![
            RawDetection::Geometric(rect_points(0.0, 50.0, 10.0, 60.0), "b".to_string(), 0.8),
            RawDetection::Geometric(rect_points(0.0, 0.0, 10.0, 10.0), "a".to_string(), 0.7),
        ];
        let set = DetectionSet::from_raw(&raw).unwrap();
        match set {
            DetectionSet::Geometric(detections) => {
                let texts: Vec<_> = detections.iter().map(|d| d.text.as_str()).collect();
                assert_eq!(texts, ["b", "a"]);
            }
            other => panic!("expected geometric set, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_shapes_rejected() {
        let raw = vec![
            RawDetection::PreMerged("line".to_string(), 0.9),
            RawDetection::Geometric(rect_points(0.0, 0.0, 1.0, 1.0), "tok".to_string(), 0.9),
        ];
        let err = DetectionSet::from_raw(&raw).unwrap_err();
        assert!(matches!(
            err,
            OcrError::MixedDetectionShapes {
                geometric: 1,
                pre_merged: 0
            }
        ));
    }

    #[test]
    fn test_malformed_quadrilateral_rejected() {
        let mut short = rect_points(0.0, 0.0, 1.0, 1.0);
        short.pop();
        let raw = vec![
            RawDetection::Geometric(rect_points(0.0, 0.0, 1.0, 1.0), "ok".to_string(), 0.9),
            RawDetection::Geometric(short, "bad".to_string(), 0.9),
        ];
        let err = DetectionSet::from_raw(&raw).unwrap_err();
        assert!(matches!(
            err,
            OcrError::MalformedQuadrilateral {
                index: 1,
                points: 3
            }
        ));
    }

    #[test]
    fn test_from_vec_conversions() {
        assert_eq!(DetectionSet::from(Vec::<Detection>::new()), DetectionSet::Empty);
        let set = DetectionSet::from(vec![PreMergedDetection::new("x", 1.0)]);
        assert_eq!(set.len(), 1);
    }
}
