//! pagerecon-core: page model types and the algorithms that operate on them.
//!
//! This crate provides geometry (BBox, Ctm), characters and text spans,
//! paths, colors, image records, diagnostics, the per-page resource
//! interning caches, the reading-order comparator and the standard simple-font
//! encodings. It does not know about content streams; `pagerecon-parse`
//! drives these types from drawing events.

pub mod encoding;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod hyperlink;
pub mod images;
pub mod intern;
pub mod painting;
pub mod path;
pub mod reading_order;
pub mod text;

pub use encoding::{FontEncoding, StandardEncoding, glyph_name_to_char};
pub use error::{Diagnostic, DiagnosticCode, ExtractOptions, ExtractResult, PdfError, Severity};
pub use geometry::{BBox, Ctm, Point, is_right_angle, normalize_degrees};
pub use graphics::{DrawnPath, GraphicsItem, PlacedImage};
pub use hyperlink::{Link, link_at};
pub use images::{ContentHash, EncodedImage, ImageMetadata, ImageRecord, image_bbox_from_ctm};
pub use intern::{
    CachedImage, ClipPath, ClipRef, ClipTable, ColorId, ColorTable, FontHandle, ImageCache,
    ImageHandle, LinkId, PageFont, PageFontTable,
};
pub use painting::{BlendMode, Color, DashPattern, FillRule, LineCap, LineJoin, LineStyle};
pub use path::{Path, PathBuilder, PathCommand, PathKind};
pub use reading_order::{Bounded, compare_reading_order, insert_ordered};
pub use text::{CharAttributes, CharId, Character, GlyphTier, TextSpan, is_span_whitespace};
