//! Data model for OCR detections and reconstructed results.

use crate::error::{OcrError, Result};
use serde::{Deserialize, Serialize};

/// MIME type attached to every reconstructed result.
pub const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";

/// A 2D coordinate in page space (pixels).
///
/// Serializes as a `[x, y]` pair, the shape detection backends emit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate (grows downwards)
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[inline]
    #[must_use = "point is created but not used"]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    #[inline]
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    #[inline]
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Bounding quadrilateral of a detection.
///
/// Corners are stored clockwise from top-left: top-left, top-right,
/// bottom-right, bottom-left. The corner order is meaningful: clustering
/// reads corners 0 and 2, composition reads corner 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quadrilateral(pub [Point; 4]);

impl Quadrilateral {
    /// Create a quadrilateral from its four corners
    #[inline]
    #[must_use = "quadrilateral is created but not used"]
    pub const fn new(corners: [Point; 4]) -> Self {
        Self(corners)
    }

    /// Axis-aligned rectangle spanning `(left, top)` to `(right, bottom)`
    #[inline]
    #[must_use = "quadrilateral is created but not used"]
    pub const fn from_rect(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self([
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ])
    }

    /// Build a quadrilateral from a backend point list.
    ///
    /// `index` is the position of the owning detection and is only used to
    /// make the error actionable.
    ///
    /// # Errors
    ///
    /// Returns [`OcrError::MalformedQuadrilateral`] when `points` does not
    /// hold exactly 4 corners.
    pub fn from_points(points: &[Point], index: usize) -> Result<Self> {
        let corners: [Point; 4] = points
            .try_into()
            .map_err(|_| OcrError::MalformedQuadrilateral {
                index,
                points: points.len(),
            })?;
        Ok(Self(corners))
    }

    /// The four corners in winding order
    #[inline]
    #[must_use]
    pub const fn corners(&self) -> &[Point; 4] {
        &self.0
    }

    /// Left edge used for horizontal ordering (x of the top-left corner)
    #[inline]
    #[must_use]
    pub const fn left(&self) -> f64 {
        self.0[0].x
    }

    /// Vertical midpoint estimated from the top-left and bottom-right corners.
    ///
    /// Used as the sort key when clustering lines.
    #[inline]
    #[must_use]
    pub fn diagonal_center_y(&self) -> f64 {
        (self.0[0].y + self.0[2].y) / 2.0
    }

    /// Mean y-coordinate of all four corners.
    ///
    /// Used when comparing a detection against a line anchor.
    #[inline]
    #[must_use]
    pub fn mean_y(&self) -> f64 {
        self.0.iter().map(|p| p.y).sum::<f64>() / 4.0
    }
}

/// A single geometric detection: bounding box, recognized text, confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box of the recognized text
    pub bbox: Quadrilateral,
    /// Recognized text, possibly empty
    pub text: String,
    /// Recognition confidence (0.0 to 1.0)
    pub confidence: f64,
}

impl Detection {
    /// Create a new detection
    #[inline]
    #[must_use = "detection is created but not used"]
    pub fn new(bbox: Quadrilateral, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            bbox,
            text: text.into(),
            confidence,
        }
    }
}

/// A detection already merged to line granularity by the backend; no geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreMergedDetection {
    /// Recognized line text, possibly empty
    pub text: String,
    /// Recognition confidence (0.0 to 1.0)
    pub confidence: f64,
}

impl PreMergedDetection {
    /// Create a new pre-merged detection
    #[inline]
    #[must_use = "detection is created but not used"]
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// One element of raw backend output, before shape validation.
///
/// Deserializes from the two shapes EasyOCR's `readtext` produces:
///
/// ```text
/// ["Hello", 0.93]
/// [[[10, 20], [60, 20], [60, 40], [10, 40]], "Hello", 0.93]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDetection {
    /// Geometric triple with an unchecked corner list
    Geometric(Vec<Point>, String, f64),
    /// Line-level `(text, confidence)` pair
    PreMerged(String, f64),
}

impl RawDetection {
    /// Recognized text carried by this element
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Geometric(_, text, _) | Self::PreMerged(text, _) => text,
        }
    }

    /// Confidence carried by this element
    #[inline]
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        match self {
            Self::Geometric(_, _, confidence) | Self::PreMerged(_, confidence) => *confidence,
        }
    }
}

impl From<Detection> for RawDetection {
    fn from(detection: Detection) -> Self {
        Self::Geometric(
            detection.bbox.0.to_vec(),
            detection.text,
            detection.confidence,
        )
    }
}

impl From<PreMergedDetection> for RawDetection {
    fn from(detection: PreMergedDetection) -> Self {
        Self::PreMerged(detection.text, detection.confidence)
    }
}

/// A horizontal text line: detections sharing a vertical band.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    /// Vertical center of the first member; fixed for the line's lifetime
    pub anchor: f64,
    /// Members in clustering order (top-to-bottom sweep order)
    pub detections: Vec<&'a Detection>,
}

impl<'a> Line<'a> {
    /// Start a line anchored at `first`
    #[inline]
    #[must_use = "line is created but not used"]
    pub fn start(first: &'a Detection) -> Self {
        Self {
            anchor: first.bbox.mean_y(),
            detections: vec![first],
        }
    }

    /// Number of member detections
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Whether the line has no members
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// Dimensions of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl PageMetadata {
    /// Create page metadata from image dimensions
    #[inline]
    #[must_use = "page metadata is created but not used"]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Final reading-order text for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    /// Lines separated by `\n`, tokens separated by single spaces
    pub text: String,
    /// Always [`PLAIN_TEXT_MIME_TYPE`]
    pub mime_type: String,
    /// Source page dimensions
    pub metadata: PageMetadata,
    /// Mean confidence over all non-empty tokens; absent when none contributed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl StructuredResult {
    /// Result for a page with no detections
    #[inline]
    #[must_use = "result is created but not used"]
    pub fn empty(metadata: PageMetadata) -> Self {
        Self {
            text: String::new(),
            mime_type: PLAIN_TEXT_MIME_TYPE.to_string(),
            metadata,
            confidence: None,
        }
    }

    /// Whether no text was reconstructed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Iterate over reconstructed lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}
