//! pagerecon: reconstruct text spans, clipped graphics and deduplicated page
//! resources from the drawing events of a PDF content stream interpreter.
//!
//! # Architecture
//!
//! The library is split into crates:
//!
//! - **pagerecon-core**: page model (geometry, characters, spans, paths,
//!   colors, images), diagnostics, interning caches, reading order and the
//!   standard encodings
//! - **pagerecon-parse**: font map, glyph resolution cascade, span assembly,
//!   clip handling and the [`ContentHandler`] driven page assembler
//! - **pagerecon** (this crate): public facade re-exporting both
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use pagerecon::{
//!     ContentHandler, Ctm, Document, ExtractOptions, FontDescriptor, FontEncoding, FontKind,
//!     FontMap, StandardEncoding,
//! };
//! use pagerecon::{CharEvent, Point};
//!
//! let mut doc = Document::new(Arc::new(FontMap::empty()), ExtractOptions::default());
//! let font = doc.register_font(
//!     FontDescriptor::new("Helvetica", FontKind::Type1)
//!         .with_encoding(FontEncoding::standard(StandardEncoding::WinAnsi)),
//! );
//!
//! let mut page = doc.begin_page(0, 612.0, 792.0, 0.0);
//! page.set_font(font, 12.0);
//! for (i, ch) in "Hi".chars().enumerate() {
//!     page.on_char(CharEvent {
//!         code: ch as u32,
//!         unicode: Some(ch),
//!         origin: Point::new(72.0 + 7.0 * i as f64, 100.0),
//!         advance: 7.0,
//!         transform: Ctm::new(1.0, 0.0, 0.0, -1.0, 0.0, 0.0),
//!         visible: true,
//!         outline: false,
//!     });
//! }
//! page.end_text_object();
//! let page = page.finish();
//! assert_eq!(page.text(), "Hi");
//! ```

pub use pagerecon_core;
pub use pagerecon_parse;

pub use pagerecon_core::{
    BBox, BlendMode, CachedImage, CharAttributes, CharId, Character, ClipPath, ClipRef, Color,
    ColorId, Ctm, Diagnostic, DiagnosticCode, DrawnPath, EncodedImage, ExtractOptions,
    ExtractResult, FillRule, FontEncoding, FontHandle, GlyphTier, GraphicsItem, ImageHandle,
    ImageMetadata, ImageRecord, LineStyle, Link, PageFont, Path, PathBuilder, PathCommand,
    PathKind, PdfError, PlacedImage, Point, Severity, StandardEncoding, TextSpan,
};
pub use pagerecon_parse::{
    CharEvent, ClipEvent, ClipStatus, ContentHandler, Document, DocumentReport, FontDescriptor,
    FontId, FontKind, FontMap, FontMapError, FontStatus, FontSummary, GlyphOutlineSource,
    ImageEncodeError, ImageEncoder, ImageEvent, LinkEvent, NoOutlines, OutputItem, Page,
    PageAssembler, PathEvent, RawSamples, UnmappedCodes,
};
