//! pagerecon-parse: glyph resolution and incremental page assembly.
//!
//! This crate consumes the drawing events of an external content stream
//! interpreter through [`ContentHandler`] and builds a [`Page`] from them:
//! glyphs resolved through the font map and standard encodings, characters
//! merged into spans in reading order, clip and occlusion handling, and
//! deduplicated resource tables. It depends on pagerecon-core for the page
//! model.

#[macro_use]
mod log;

pub mod clip;
pub mod collaborators;
pub mod document;
pub mod error;
pub mod font_map;
pub mod font_record;
pub mod glyph;
pub mod graphics_state;
pub mod handler;
pub mod page;
pub mod span_assembler;

pub use clip::{ClipStatus, Clipped, classify};
pub use collaborators::{GlyphOutlineSource, ImageEncoder, NoOutlines, RawSamples};
pub use document::{Document, DocumentReport, FontStatus, FontSummary};
pub use error::{FontMapError, ImageEncodeError};
pub use font_map::{CleanedName, EntityTable, FontMap, FontMapEntry, FontMatch, clean_font_name};
pub use font_record::{FontDescriptor, FontId, FontKind, FontRecord};
pub use glyph::{GlyphFailure, ResolvedGlyph, UnmappedCodes, resolve_glyph};
pub use graphics_state::{GraphicsState, GraphicsStateStack};
pub use handler::{CharEvent, ClipEvent, ContentHandler, ImageEvent, LinkEvent, PathEvent};
pub use page::{OutputItem, Page, PageAssembler};
pub use span_assembler::{SpanAssembler, SpanContext, continues_span};
pub use pagerecon_core;
