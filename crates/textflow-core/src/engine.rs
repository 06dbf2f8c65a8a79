//! Backend injection: run a detection backend and reconstruct its output.
//!
//! The backend (model loading, language packs, device selection) lives
//! outside this crate. It is constructed once by the caller and handed to
//! [`OcrEngine`], which owns or borrows it for its whole lifetime; nothing
//! here keeps process-wide state.
//!
//! # Examples
//!
//! ```
//! use textflow_core::{BoxError, DetectionBackend, OcrEngine, PageMetadata, RawDetection};
//!
//! struct Canned(Vec<RawDetection>);
//!
//! impl DetectionBackend for Canned {
//!     type Input = str;
//!
//!     fn name(&self) -> &str {
//!         "canned"
//!     }
//!
//!     fn read_text(&self, _image_path: &str) -> Result<Vec<RawDetection>, BoxError> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! let engine = OcrEngine::new(Canned(vec![RawDetection::PreMerged("Hi".into(), 0.9)]))?;
//! let result = engine.process("page.png", PageMetadata::new(100, 50))?;
//! assert_eq!(result.text, "Hi");
//! # Ok::<(), textflow_core::OcrError>(())
//! ```

use crate::config::ReadingOrderConfig;
use crate::error::{BoxError, OcrError, Result};
use crate::pipeline::reconstruct;
use crate::types::{PageMetadata, RawDetection, StructuredResult};
use log::debug;
use std::sync::Arc;

/// A text detection/recognition backend treated as a black box.
pub trait DetectionBackend {
    /// What the backend reads from (image bytes, a path, a decoded buffer).
    type Input: ?Sized;

    /// Short name used in error messages
    fn name(&self) -> &str;

    /// Run detection and recognition.
    ///
    /// # Errors
    ///
    /// Any backend failure; [`OcrEngine`] wraps it as [`OcrError::Backend`].
    fn read_text(&self, input: &Self::Input) -> std::result::Result<Vec<RawDetection>, BoxError>;
}

impl<T: DetectionBackend + ?Sized> DetectionBackend for &T {
    type Input = T::Input;

    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn read_text(&self, input: &Self::Input) -> std::result::Result<Vec<RawDetection>, BoxError> {
        (**self).read_text(input)
    }
}

impl<T: DetectionBackend + ?Sized> DetectionBackend for Arc<T> {
    type Input = T::Input;

    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn read_text(&self, input: &Self::Input) -> std::result::Result<Vec<RawDetection>, BoxError> {
        (**self).read_text(input)
    }
}

/// Runs an injected backend and reconstructs reading-order text.
#[derive(Debug, Clone)]
pub struct OcrEngine<B> {
    backend: B,
    config: ReadingOrderConfig,
}

impl<B: DetectionBackend> OcrEngine<B> {
    /// Create an engine with the default reading-order config.
    ///
    /// # Errors
    ///
    /// Never fails with the default config; the signature matches
    /// [`OcrEngine::with_config`].
    pub fn new(backend: B) -> Result<Self> {
        Self::with_config(backend, ReadingOrderConfig::default())
    }

    /// Create an engine with a custom reading-order config.
    ///
    /// # Errors
    ///
    /// Returns [`OcrError::InvalidConfig`] if `config` fails validation.
    pub fn with_config(backend: B, config: ReadingOrderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { backend, config })
    }

    /// The injected backend
    #[inline]
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Active reading-order config
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ReadingOrderConfig {
        &self.config
    }

    /// Run the backend on `input` and reconstruct its output.
    ///
    /// `metadata` carries the source image dimensions and is attached to the
    /// result even when the backend finds nothing.
    ///
    /// # Errors
    ///
    /// - [`OcrError::Backend`] if the backend fails
    /// - validation errors from [`reconstruct`] for malformed output
    pub fn process(&self, input: &B::Input, metadata: PageMetadata) -> Result<StructuredResult> {
        let raw = self
            .backend
            .read_text(input)
            .map_err(|e| OcrError::backend(self.backend.name(), e))?;
        debug!(
            "Backend {} returned {} detection(s)",
            self.backend.name(),
            raw.len()
        );
        reconstruct(&raw, metadata, &self.config)
    }
}
