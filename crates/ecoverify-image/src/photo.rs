//! Decoded photo model and the decoder seam
use crate::pixel::PixelGrid;
use ecoverify_core::{GeoPoint, VerifyError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container encoding of the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Unknown,
}

impl PhotoFormat {
    /// Encodings the classifier accepts
    pub fn is_allowed(&self) -> bool {
        matches!(self, PhotoFormat::Jpeg | PhotoFormat::Png)
    }

    /// Helper for decoder implementations working from file names
    pub fn from_extension(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("jpg") | Some("jpeg") => PhotoFormat::Jpeg,
            Some("png") => PhotoFormat::Png,
            Some("gif") => PhotoFormat::Gif,
            Some("bmp") => PhotoFormat::Bmp,
            Some("webp") => PhotoFormat::Webp,
            _ => PhotoFormat::Unknown,
        }
    }
}

/// Container-level facts a decoder surfaces alongside the pixels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// Source carried an alpha channel (RGBA/LA modes)
    pub has_transparency: bool,
    /// Transparency chunk present in the container metadata
    pub has_transparency_chunk: bool,
    pub has_thumbnail: bool,
    #[serde(default)]
    pub editing_software: Option<String>,
}

/// A fully decoded submission: pixels, container facts, and any embedded,
/// sign-corrected GPS coordinate
#[derive(Debug, Clone)]
pub struct Photo {
    pub pixels: PixelGrid,
    pub format: PhotoFormat,
    pub metadata: PhotoMetadata,
    pub gps: Option<GeoPoint>,
}

impl Photo {
    pub fn new(pixels: PixelGrid, format: PhotoFormat) -> Self {
        Self {
            pixels,
            format,
            metadata: PhotoMetadata::default(),
            gps: None,
        }
    }

    pub fn with_gps(mut self, point: GeoPoint) -> Self {
        self.gps = Some(point);
        self
    }

    pub fn with_metadata(mut self, metadata: PhotoMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Decode collaborator: file bytes to RGB pixel grid, pure from the core's
/// perspective. Implementations live outside this workspace.
pub trait PhotoDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<Photo, VerifyError>;
}
