//! Reading-order configuration.

use crate::error::{OcrError, Result};
use serde::{Deserialize, Serialize};

/// Default maximum vertical distance (pixels) between a detection and its
/// line anchor.
pub const DEFAULT_LINE_HEIGHT_THRESHOLD: f64 = 20.0;

/// Configuration for line clustering.
///
/// Deserializes with defaults for missing fields, so an empty TOML table or
/// JSON object yields [`ReadingOrderConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingOrderConfig {
    /// Maximum `|center - anchor|` for a detection to join the current line.
    ///
    /// A detection whose vertical center differs from the anchor by more
    /// than this starts a new line. Same units as the box coordinates.
    pub line_height_threshold: f64,
}

impl Default for ReadingOrderConfig {
    #[inline]
    fn default() -> Self {
        Self {
            line_height_threshold: DEFAULT_LINE_HEIGHT_THRESHOLD,
        }
    }
}

impl ReadingOrderConfig {
    /// Config with a custom line-height threshold
    #[inline]
    #[must_use = "config is created but not used"]
    pub const fn with_line_height_threshold(line_height_threshold: f64) -> Self {
        Self {
            line_height_threshold,
        }
    }

    /// Check that the configuration can be used for clustering.
    ///
    /// # Errors
    ///
    /// Returns [`OcrError::InvalidConfig`] if the threshold is negative or
    /// not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.line_height_threshold.is_finite() {
            return Err(OcrError::InvalidConfig(format!(
                "line_height_threshold must be finite, got {}",
                self.line_height_threshold
            )));
        }
        if self.line_height_threshold < 0.0 {
            return Err(OcrError::InvalidConfig(format!(
                "line_height_threshold must be non-negative, got {}",
                self.line_height_threshold
            )));
        }
        Ok(())
    }
}
