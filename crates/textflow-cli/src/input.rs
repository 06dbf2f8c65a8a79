//! Recorded detection files
//!
//! Accepts either a bare EasyOCR `readtext` array or an envelope carrying
//! the page dimensions alongside it:
//!
//! ```json
//! {"width": 800, "height": 600, "detections": [[[[0,0],[9,0],[9,9],[0,9]], "hi", 0.9]]}
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use textflow_core::{PageMetadata, RawDetection};

/// Detections plus whatever page dimensions the file recorded
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionDocument {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    pub detections: Vec<RawDetection>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetectionFile {
    Bare(Vec<RawDetection>),
    Envelope(DetectionDocument),
}

impl From<DetectionFile> for DetectionDocument {
    fn from(file: DetectionFile) -> Self {
        match file {
            DetectionFile::Envelope(doc) => doc,
            DetectionFile::Bare(detections) => Self {
                width: None,
                height: None,
                detections,
            },
        }
    }
}

/// Page dimension overrides from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl DetectionDocument {
    /// Parse a detection document from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let file: DetectionFile = serde_json::from_str(json).context(
            "Expected a JSON array of detections or an object with a \"detections\" array",
        )?;
        Ok(file.into())
    }

    /// Read a detection document from a path, or stdin when the path is `-`
    pub fn load(path: &Path) -> Result<Self> {
        let json = if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read detections from stdin")?;
            buf
        } else {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()))?
        };
        Self::from_json(&json).with_context(|| format!("Invalid detection file: {}", path.display()))
    }

    /// Resolve page dimensions: flags win over the image header, which wins
    /// over the dimensions recorded in the file.
    pub fn page(&self, overrides: PageOverrides, image: Option<&Path>) -> Result<PageMetadata> {
        let from_image = image
            .map(|path| {
                image::image_dimensions(path).with_context(|| {
                    format!("Failed to read image dimensions: {}", path.display())
                })
            })
            .transpose()?;

        let width = overrides
            .width
            .or(from_image.map(|(w, _)| w))
            .or(self.width);
        let height = overrides
            .height
            .or(from_image.map(|(_, h)| h))
            .or(self.height);

        match (width, height) {
            (Some(width), Some(height)) => Ok(PageMetadata::new(width, height)),
            _ => bail!(
                "Page dimensions unknown: pass --width and --height, --image, \
                 or record \"width\"/\"height\" in the input file"
            ),
        }
    }
}
