//! Error types for reading-order reconstruction.
//!
//! Every error produced by this crate is a local precondition violation
//! surfaced synchronously to the caller. There is no partial result on error:
//! a [`StructuredResult`](crate::StructuredResult) is either fully built or
//! not built at all.
//!
//! # Examples
//!
//! ```
//! use textflow_core::{reconstruct, OcrError, PageMetadata, Point, RawDetection, ReadingOrderConfig};
//!
//! let raw = vec![RawDetection::Geometric(
//!     vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
//!     "oops".to_string(),
//!     0.9,
//! )];
//!
//! match reconstruct(&raw, PageMetadata::new(100, 100), &ReadingOrderConfig::default()) {
//!     Err(OcrError::MalformedQuadrilateral { index, points }) => {
//!         assert_eq!((index, points), (0, 3));
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use thiserror::Error;

/// Boxed error returned by detection backends.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while reconstructing reading-order text.
#[derive(Error, Debug)]
pub enum OcrError {
    /// A geometric detection whose box does not have exactly 4 corners.
    #[error("Detection {index}: quadrilateral must have exactly 4 points, got {points}")]
    MalformedQuadrilateral {
        /// Position of the offending detection in the backend output
        index: usize,
        /// Number of points the detection actually carried
        points: usize,
    },

    /// The backend output mixes `(text, confidence)` pairs with geometric
    /// `(box, text, confidence)` triples.
    #[error(
        "Mixed detection shapes: geometric detection at index {geometric}, \
         pre-merged detection at index {pre_merged}"
    )]
    MixedDetectionShapes {
        /// Index of the first geometric detection
        geometric: usize,
        /// Index of the first pre-merged detection
        pre_merged: usize,
    },

    /// Reading-order configuration is unusable.
    #[error("Invalid reading order configuration: {0}")]
    InvalidConfig(String),

    /// The detection backend failed before producing any detections.
    #[error("Failed to OCR using {backend}: {source}")]
    Backend {
        /// Name reported by the backend
        backend: String,
        /// The underlying backend error
        #[source]
        source: BoxError,
    },
}

/// Result type alias for reconstruction operations.
pub type Result<T> = std::result::Result<T, OcrError>;

impl OcrError {
    /// Wrap a backend failure.
    #[inline]
    pub fn backend(backend: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Backend {
            backend: backend.into(),
            source: source.into(),
        }
    }

    /// Returns true for errors caused by the shape of the input detections.
    #[inline]
    #[must_use = "returns whether the error is an input validation error"]
    pub const fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedQuadrilateral { .. } | Self::MixedDetectionShapes { .. }
        )
    }
}
