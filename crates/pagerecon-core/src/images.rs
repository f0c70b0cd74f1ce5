//! Image records and placement.
//!
//! Images are placed in a 1×1 unit square that the CTM maps onto the page.
//! Pixel decoding and encoding belong to an external codec; this module only
//! carries its output.

use crate::geometry::{BBox, Ctm, Point};

/// SHA-256 digest of decoded image samples.
pub type ContentHash = [u8; 32];

/// Stream metadata handed to the image codec together with the samples.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageMetadata {
    /// Pixel width of the image.
    pub width: u32,
    /// Pixel height of the image.
    pub height: u32,
    /// Bits per component (e.g., 8).
    pub bits_per_component: Option<u32>,
    /// Color space name (e.g., "DeviceRGB", "DeviceGray").
    pub color_space: Option<String>,
    /// Stream filter the samples were decoded from (e.g., "DCTDecode").
    pub filter: Option<String>,
    /// Image mask (stencil) flag.
    pub is_mask: bool,
}

/// Opaque blob produced by the image codec.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodedImage {
    /// MIME type of `data` (e.g., "image/png").
    pub mime_type: String,
    pub data: Vec<u8>,
    /// Dimensions of the encoded image, which the codec may change.
    pub width: u32,
    pub height: u32,
}

/// A deduplicated image resource.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageRecord {
    /// Resource id: the explicit object id, or a negative synthetic id for
    /// inline images.
    pub id: i64,
    pub hash: ContentHash,
    pub width: u32,
    pub height: u32,
    pub blob: EncodedImage,
    /// Number of placements referencing this record; always ≥ 1.
    pub ref_count: u32,
}

impl ImageRecord {
    pub fn is_inline(&self) -> bool {
        self.id < 0
    }
}

/// Bounds of an image placed by `ctm`: the unit square's four corners
/// transformed into page space.
pub fn image_bbox_from_ctm(ctm: &Ctm) -> BBox {
    let corners = [
        ctm.transform_point(Point::new(0.0, 0.0)),
        ctm.transform_point(Point::new(1.0, 0.0)),
        ctm.transform_point(Point::new(0.0, 1.0)),
        ctm.transform_point(Point::new(1.0, 1.0)),
    ];
    BBox::from_points(&corners).unwrap_or(BBox::new(ctm.e, ctm.f, ctm.e, ctm.f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_bbox_scaled() {
        let ctm = Ctm::new(200.0, 0.0, 0.0, 150.0, 100.0, 300.0);
        assert_eq!(image_bbox_from_ctm(&ctm), BBox::new(100.0, 300.0, 300.0, 450.0));
    }

    #[test]
    fn test_image_bbox_flipped() {
        let ctm = Ctm::new(50.0, 0.0, 0.0, -40.0, 10.0, 100.0);
        assert_eq!(image_bbox_from_ctm(&ctm), BBox::new(10.0, 60.0, 60.0, 100.0));
    }

    #[test]
    fn test_inline_detection() {
        let record = ImageRecord {
            id: -1,
            hash: [0; 32],
            width: 1,
            height: 1,
            blob: EncodedImage {
                mime_type: "image/png".to_string(),
                data: vec![],
                width: 1,
                height: 1,
            },
            ref_count: 1,
        };
        assert!(record.is_inline());
    }
}
