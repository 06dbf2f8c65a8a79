//! Line composer: turns clustered lines into raw reading-order text.
//!
//! Output here is not yet normalized. Each token is followed by a single
//! space and every line ends with `\n`, including lines whose tokens were
//! all empty. [`normalize_spaces`](crate::text::normalize_spaces) sheds the
//! extra separators later.

use crate::types::{Detection, Line, PreMergedDetection};
use log::trace;

/// Running confidence sum over tokens that contributed text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConfidenceStats {
    /// Sum of contributing confidences
    pub sum: f64,
    /// Number of contributing tokens
    pub count: usize,
}

impl ConfidenceStats {
    /// Record one contributing token
    #[inline]
    pub fn record(&mut self, confidence: f64) {
        self.sum += confidence;
        self.count += 1;
    }

    /// Mean confidence, or `None` when nothing contributed
    // Precision loss acceptable: token counts are far below 2^52
    #[allow(clippy::cast_precision_loss)]
    #[inline]
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Raw composed text plus its confidence aggregate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposedText {
    /// Unnormalized text with trailing separators
    pub raw: String,
    /// Confidence over non-empty tokens
    pub confidence: ConfidenceStats,
}

/// Compose clustered lines into raw text.
///
/// Lines are emitted in the given (top-to-bottom) order. Within a line,
/// members are stably sorted by left edge; empty texts are skipped without
/// adding a separator.
#[must_use = "composed text is returned but not used"]
pub fn compose_lines(lines: &[Line<'_>]) -> ComposedText {
    let mut composed = ComposedText::default();

    for (line_no, line) in lines.iter().enumerate() {
        let mut members: Vec<&Detection> = line.detections.clone();
        members.sort_by(|a, b| a.bbox.left().total_cmp(&b.bbox.left()));

        for detection in members {
            if detection.text.is_empty() {
                continue;
            }
            composed.raw.push_str(&detection.text);
            composed.raw.push(' ');
            composed.confidence.record(detection.confidence);
        }
        composed.raw.push('\n');
        trace!("Composed line {line_no} ({} member(s))", line.len());
    }

    composed
}

/// Compose pre-merged detections: one synthesized line per non-empty text.
#[must_use = "composed text is returned but not used"]
pub fn compose_pre_merged(detections: &[PreMergedDetection]) -> ComposedText {
    let mut composed = ComposedText::default();

    for detection in detections.iter().filter(|d| !d.text.is_empty()) {
        composed.raw.push_str(&detection.text);
        composed.raw.push('\n');
        composed.confidence.record(detection.confidence);
    }

    composed
}
