//! Traits for the external collaborators the engine consults.
//!
//! The glyph rasterizer and the image codec live outside this crate; the
//! engine only needs the narrow answers defined here.

use pagerecon_core::{EncodedImage, ImageMetadata};

use crate::error::ImageEncodeError;
use crate::font_record::FontDescriptor;

/// Last-resort emptiness oracle for glyph outlines.
pub trait GlyphOutlineSource {
    /// Number of sub-paths in the outline of `code`, or `None` when the
    /// outline cannot be loaded.
    fn subpath_count(&self, font: &FontDescriptor, code: u32) -> Option<usize>;
}

/// Outline source for setups without a rasterizer: every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOutlines;

impl GlyphOutlineSource for NoOutlines {
    fn subpath_count(&self, _font: &FontDescriptor, _code: u32) -> Option<usize> {
        None
    }
}

impl<F> GlyphOutlineSource for F
where
    F: Fn(&FontDescriptor, u32) -> Option<usize>,
{
    fn subpath_count(&self, font: &FontDescriptor, code: u32) -> Option<usize> {
        self(font, code)
    }
}

/// Image codec turning decoded samples into an encoded blob.
pub trait ImageEncoder {
    fn encode(
        &self,
        samples: &[u8],
        metadata: &ImageMetadata,
    ) -> Result<EncodedImage, ImageEncodeError>;
}

/// Encoder that stores the decoded samples unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSamples;

impl ImageEncoder for RawSamples {
    fn encode(
        &self,
        samples: &[u8],
        metadata: &ImageMetadata,
    ) -> Result<EncodedImage, ImageEncodeError> {
        if metadata.width == 0 || metadata.height == 0 {
            return Err(ImageEncodeError(format!(
                "empty image {}x{}",
                metadata.width, metadata.height
            )));
        }
        Ok(EncodedImage {
            mime_type: "application/octet-stream".to_string(),
            data: samples.to_vec(),
            width: metadata.width,
            height: metadata.height,
        })
    }
}
