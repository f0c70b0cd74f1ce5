//! Drawn graphics items in page drawing order.

use crate::geometry::{BBox, Ctm};
use crate::intern::{ClipRef, ColorId, ImageHandle};
use crate::painting::{BlendMode, LineStyle};
use crate::path::Path;

/// A stroked and/or filled path as it was painted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawnPath {
    pub path: Path,
    /// Tracked bounds: `path.bbox`, shrunk to the clip when partially clipped.
    pub bbox: BBox,
    pub clip: ClipRef,
    pub fill_color: Option<ColorId>,
    pub stroke_color: Option<ColorId>,
    pub line_style: LineStyle,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    pub blend_mode: BlendMode,
    pub overprint: bool,
}

impl DrawnPath {
    /// A fill that hides whatever lies beneath it.
    pub fn is_opaque_rect_fill(&self) -> bool {
        self.path.kind.fills()
            && self.fill_opacity >= 1.0
            && self.blend_mode == BlendMode::Normal
            && self.path.is_rectangle()
    }
}

/// An image placement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedImage {
    pub image: ImageHandle,
    pub bbox: BBox,
    pub clip: ClipRef,
    /// Matrix mapping the unit square onto the page.
    pub transform: Ctm,
    pub opacity: f64,
}

/// A drawn item, in drawing order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GraphicsItem {
    Path(DrawnPath),
    Image(PlacedImage),
}

impl GraphicsItem {
    pub fn bbox(&self) -> BBox {
        match self {
            GraphicsItem::Path(p) => p.bbox,
            GraphicsItem::Image(i) => i.bbox,
        }
    }

    pub fn clip(&self) -> ClipRef {
        match self {
            GraphicsItem::Path(p) => p.clip,
            GraphicsItem::Image(i) => i.clip,
        }
    }
}
