//! Result assembler: normalizes composed text and attaches page metadata.

use crate::compose::ComposedText;
use crate::text::normalize_spaces;
use crate::types::{PageMetadata, StructuredResult, PLAIN_TEXT_MIME_TYPE};

/// Build the final result from composed text.
#[must_use = "result is assembled but not used"]
pub fn assemble(composed: &ComposedText, metadata: PageMetadata) -> StructuredResult {
    StructuredResult {
        text: normalize_spaces(&composed.raw),
        mime_type: PLAIN_TEXT_MIME_TYPE.to_string(),
        metadata,
        confidence: composed.confidence.mean(),
    }
}
