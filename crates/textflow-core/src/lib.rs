//! Reading-order text reconstruction from unordered OCR detections.
//!
//! Detection backends return a bag of `(box, text, confidence)` triples in
//! no particular order, or line-level `(text, confidence)` pairs when they
//! merge tokens themselves. This crate turns that output into a single text
//! stream whose line breaks and token order follow the page layout:
//! top to bottom, left to right.
//!
//! # Architecture
//!
//! 1. **Normalizer** ([`DetectionSet::from_raw`]): validates and resolves the
//!    input shape once
//! 2. **Clusterer** ([`cluster_lines`]): groups geometric detections into
//!    lines by vertical-center proximity to a fixed per-line anchor
//! 3. **Composer** ([`compose_lines`], [`compose_pre_merged`]): orders
//!    tokens left to right and joins them
//! 4. **Assembler** ([`assemble`], [`normalize_spaces`]): normalizes
//!    whitespace and attaches page metadata
//!
//! The whole pipeline is a pure function of its inputs: no I/O, no shared
//! state, safe to call concurrently for independent pages. [`OcrEngine`]
//! wraps an injected [`DetectionBackend`] for callers that want the backend
//! call and the reconstruction in one step.
//!
//! # Example
//!
//! ```
//! use textflow_core::{reconstruct, Detection, PageMetadata, Quadrilateral, RawDetection, ReadingOrderConfig};
//!
//! let raw: Vec<RawDetection> = vec![
//!     Detection::new(Quadrilateral::from_rect(50.0, 95.0, 80.0, 105.0), "B", 0.9).into(),
//!     Detection::new(Quadrilateral::from_rect(10.0, 97.0, 40.0, 107.0), "A", 0.8).into(),
//!     Detection::new(Quadrilateral::from_rect(90.0, 100.0, 120.0, 110.0), "C", 0.7).into(),
//! ];
//!
//! let result = reconstruct(&raw, PageMetadata::new(800, 600), &ReadingOrderConfig::default())?;
//! assert_eq!(result.text, "A B C");
//! assert_eq!(result.metadata.width, 800);
//! # Ok::<(), textflow_core::OcrError>(())
//! ```

pub mod assemble;
pub mod cluster;
pub mod compose;
pub mod config;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod text;
pub mod types;

pub use assemble::assemble;
pub use cluster::cluster_lines;
pub use compose::{compose_lines, compose_pre_merged, ComposedText, ConfidenceStats};
pub use config::{ReadingOrderConfig, DEFAULT_LINE_HEIGHT_THRESHOLD};
pub use engine::{DetectionBackend, OcrEngine};
pub use error::{BoxError, OcrError, Result};
pub use normalize::DetectionSet;
pub use pipeline::{reconstruct, reconstruct_set};
pub use text::normalize_spaces;
pub use types::{
    Detection, Line, PageMetadata, Point, PreMergedDetection, Quadrilateral, RawDetection,
    StructuredResult, PLAIN_TEXT_MIME_TYPE,
};
