//! Per-page assembly: turns content handler events into a [`Page`].
//!
//! [`PageAssembler`] implements [`ContentHandler`]. Each event is validated,
//! classified against the active clip, interned into the page's resource
//! tables and handed to the span assembler or the graphics list. Nothing
//! here fails: bad input is dropped with a diagnostic.

use pagerecon_core::reading_order::BASELINE_TOLERANCE;
use pagerecon_core::{
    BBox, BlendMode, CharAttributes, CharId, Character, ClipPath, ClipRef, ClipTable, Color,
    ColorTable, Ctm, Diagnostic, DiagnosticCode, DrawnPath, GlyphTier, GraphicsItem, ImageCache,
    ImageRecord, Link, LineStyle, PageFont, PageFontTable, Path, PathKind, PlacedImage, Point,
    TextSpan, image_bbox_from_ctm, link_at,
};

use crate::clip;
use crate::document::Document;
use crate::font_record::FontId;
use crate::glyph::GlyphFailure;
use crate::graphics_state::GraphicsStateStack;
use crate::handler::{CharEvent, ClipEvent, ContentHandler, ImageEvent, LinkEvent, PathEvent};
use crate::span_assembler::{SpanAssembler, SpanContext};

/// A finished page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    /// Page number (0-based).
    pub number: usize,
    pub width: f64,
    pub height: f64,
    /// Page rotation in degrees, as declared by the document.
    pub rotation: f64,
    /// Character arena; spans index into it.
    pub chars: Vec<Character>,
    /// Text spans in reading order.
    pub spans: Vec<TextSpan>,
    /// Drawn paths and images in drawing order.
    pub graphics: Vec<GraphicsItem>,
    pub colors: Vec<Color>,
    pub fonts: Vec<PageFont>,
    pub images: Vec<ImageRecord>,
    pub clips: Vec<ClipPath>,
    pub links: Vec<Link>,
    /// Union of the tracked bounds of every drawn item.
    pub graphics_bounds: Option<BBox>,
    pub diagnostics: Vec<Diagnostic>,
}

/// One entry of the page's graphics output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputItem<'a> {
    Clip(ClipRef, &'a ClipPath),
    Drawn(&'a GraphicsItem),
}

impl Page {
    /// Bounds of the page.
    pub fn viewport(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width, self.height)
    }

    /// Clip paths first, in handle order, then drawn items in drawing order.
    pub fn output_items(&self) -> impl Iterator<Item = OutputItem<'_>> {
        self.clips
            .iter()
            .enumerate()
            .map(|(i, c)| OutputItem::Clip(ClipRef::from_index(i), c))
            .chain(self.graphics.iter().map(OutputItem::Drawn))
    }

    /// Text of the span at `index` in reading order.
    pub fn span_text(&self, index: usize) -> Option<String> {
        self.spans.get(index).map(|s| s.text(&self.chars))
    }

    /// Plain text: spans on one line joined by a space, lines by newlines.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut prev: Option<&TextSpan> = None;
        for span in &self.spans {
            if let Some(p) = prev {
                let tolerance = p.font_size.max(span.font_size) * BASELINE_TOLERANCE;
                if (p.bbox.bottom - span.bbox.bottom).abs() < tolerance {
                    out.push(' ');
                } else {
                    out.push('\n');
                }
            }
            out.push_str(&span.text(&self.chars));
            prev = Some(span);
        }
        out
    }

    pub fn color(&self, id: usize) -> Option<&Color> {
        self.colors.get(id)
    }

    pub fn clip(&self, clip: ClipRef) -> Option<&ClipPath> {
        clip.index().and_then(|i| self.clips.get(i))
    }

    pub fn image(&self, handle: usize) -> Option<&ImageRecord> {
        self.images.get(handle)
    }
}

/// Builds one page from content handler events.
///
/// Created by [`Document::begin_page`]; call [`finish`](Self::finish) after
/// the last event.
#[derive(Debug)]
pub struct PageAssembler<'a> {
    doc: &'a mut Document,
    number: usize,
    width: f64,
    height: f64,
    rotation: f64,
    viewport: BBox,
    state: GraphicsStateStack,
    chars: Vec<Character>,
    spans: SpanAssembler,
    graphics: Vec<GraphicsItem>,
    colors: ColorTable,
    fonts: PageFontTable,
    images: ImageCache,
    clips: ClipTable,
    links: Vec<Link>,
    graphics_bounds: Option<BBox>,
    diagnostics: Vec<Diagnostic>,
    char_limit_hit: bool,
    graphics_limit_hit: bool,
}

impl<'a> PageAssembler<'a> {
    pub(crate) fn new(
        doc: &'a mut Document,
        number: usize,
        width: f64,
        height: f64,
        rotation: f64,
    ) -> Self {
        Self {
            doc,
            number,
            width,
            height,
            rotation,
            viewport: BBox::new(0.0, 0.0, width, height),
            state: GraphicsStateStack::new(),
            chars: Vec::new(),
            spans: SpanAssembler::new(),
            graphics: Vec::new(),
            colors: ColorTable::new(),
            fonts: PageFontTable::new(),
            images: ImageCache::new(),
            clips: ClipTable::new(),
            links: Vec::new(),
            graphics_bounds: None,
            diagnostics: Vec::new(),
            char_limit_hit: false,
            graphics_limit_hit: false,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// Characters placed so far.
    pub fn chars(&self) -> &[Character] {
        &self.chars
    }

    /// Spans closed so far, in reading order.
    pub fn spans(&self) -> &[TextSpan] {
        self.spans.spans()
    }

    pub fn state(&self) -> &GraphicsStateStack {
        &self.state
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        if let Some(d) = self.doc.track(diagnostic.on_page(self.number)) {
            self.diagnostics.push(d);
        }
    }

    /// NaN never compares equal, so a non-finite color would defeat interning.
    /// The previous color stays current.
    fn accept_color(&mut self, color: Color, which: &str) -> bool {
        if color.is_finite() {
            return true;
        }
        self.emit(
            Diagnostic::error(
                DiagnosticCode::NonFiniteColor,
                format!("non-finite {which} color ignored"),
            )
            .with_element(format!("{color:?}")),
        );
        false
    }

    fn font_name(&self, font: FontId) -> String {
        self.doc
            .font(font)
            .map(|f| f.name().to_string())
            .unwrap_or_else(|| format!("#{font}"))
    }

    fn close_span(&mut self) {
        let ctx = SpanContext {
            arena: &self.chars,
            clips: &self.clips,
            viewport: self.viewport,
        };
        self.spans.close(&ctx);
    }

    /// Returns `false` once the per-page graphics limit is reached.
    fn accept_graphic(&mut self) -> bool {
        let limit = self.doc.options().max_graphics_per_page;
        if self.graphics.len() < limit {
            return true;
        }
        if !self.graphics_limit_hit {
            self.graphics_limit_hit = true;
            self.emit(
                Diagnostic::warning(
                    DiagnosticCode::ResourceLimitReached,
                    format!("more than {limit} paths and images; the rest are dropped"),
                )
                .with_element("max_graphics_per_page"),
            );
        }
        false
    }

    fn push_graphic(&mut self, item: GraphicsItem) {
        let bbox = item.bbox();
        self.graphics_bounds = Some(match self.graphics_bounds {
            Some(b) => b.union(&bbox),
            None => bbox,
        });
        self.graphics.push(item);
    }

    /// Approximate glyph bounds in page space.
    ///
    /// Upright glyphs get ascent-to-descent boxes. Rotated glyphs only get
    /// the baseline segment; the span assembler widens it later.
    fn glyph_bbox(
        event: &CharEvent,
        rotation: f64,
        size: f64,
        ascent: f64,
        descent: f64,
    ) -> Option<BBox> {
        let Point { x, y } = event.origin;
        if rotation == 0.0 {
            return Some(BBox::new(x, y - ascent * size, x + event.advance, y - descent * size));
        }
        let (sin, cos) = rotation.to_radians().sin_cos();
        let end = Point::new(x + event.advance * cos, y + event.advance * sin);
        BBox::from_points(&[event.origin, end])
    }

    /// Close the open span and return the finished page.
    pub fn finish(mut self) -> Page {
        let ctx = SpanContext {
            arena: &self.chars,
            clips: &self.clips,
            viewport: self.viewport,
        };
        let spans = self.spans.finish(&ctx);
        self.doc.page_finished();
        log_debug!(
            "page {} finished: {} chars, {} spans, {} graphics",
            self.number,
            self.chars.len(),
            spans.len(),
            self.graphics.len()
        );
        Page {
            number: self.number,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            chars: self.chars,
            spans,
            graphics: self.graphics,
            colors: self.colors.into_vec(),
            fonts: self.fonts.into_vec(),
            images: self.images.into_vec(),
            clips: self.clips.into_vec(),
            links: self.links,
            graphics_bounds: self.graphics_bounds,
            diagnostics: self.diagnostics,
        }
    }
}

impl ContentHandler for PageAssembler<'_> {
    fn save_state(&mut self) {
        self.state.save();
    }

    fn restore_state(&mut self) {
        if !self.state.restore() {
            log_trace!("page {}: unbalanced restore ignored", self.number);
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.accept_color(color, "fill") {
            self.state.current_mut().fill_color = color;
        }
    }

    fn set_stroke_color(&mut self, color: Color) {
        if self.accept_color(color, "stroke") {
            self.state.current_mut().stroke_color = color;
        }
    }

    fn set_fill_opacity(&mut self, opacity: f64) {
        self.state.current_mut().fill_opacity = opacity;
    }

    fn set_stroke_opacity(&mut self, opacity: f64) {
        self.state.current_mut().stroke_opacity = opacity;
    }

    fn set_overprint(&mut self, fill: bool, stroke: bool) {
        let gs = self.state.current_mut();
        gs.fill_overprint = fill;
        gs.stroke_overprint = stroke;
    }

    fn set_line_style(&mut self, style: LineStyle) {
        self.state.current_mut().line_style = style;
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state.current_mut().blend_mode = mode;
    }

    fn set_font(&mut self, font: FontId, size: f64) {
        let gs = self.state.current_mut();
        gs.font = Some(font);
        gs.font_size = size;
    }

    fn set_horizontal_scaling(&mut self, scaling: f64) {
        self.state.current_mut().horizontal_scaling = scaling;
    }

    fn on_clip(&mut self, event: ClipEvent) {
        let Some(path) = Path::new(PathKind::Clip, event.fill_rule, event.commands) else {
            return;
        };
        if !path.is_finite() {
            self.emit(Diagnostic::error(
                DiagnosticCode::NonFiniteTransform,
                "clip path with non-finite coordinates dropped",
            ));
            return;
        }
        let active = self.state.current().clip;
        let clip = clip::push_clip(&mut self.clips, active, path);
        log_trace!("page {}: clip {} active", self.number, clip.raw());
        self.state.current_mut().clip = clip;
    }

    fn on_path_painted(&mut self, event: PathEvent) {
        if event.kind == PathKind::Clip {
            return;
        }
        if !self.accept_graphic() {
            return;
        }
        let Some(path) = Path::new(event.kind, event.fill_rule, event.commands) else {
            return;
        };
        if !path.is_finite() {
            self.emit(Diagnostic::error(
                DiagnosticCode::NonFiniteTransform,
                "path with non-finite coordinates dropped",
            ));
            return;
        }
        let gs = self.state.current();
        let Some(placed) = clip::apply(&self.clips, gs.clip, path.bbox) else {
            log_trace!("page {}: path fully clipped", self.number);
            return;
        };

        let fills = path.kind.fills();
        let strokes = matches!(path.kind, PathKind::Stroke | PathKind::FillStroke);
        let drawn = DrawnPath {
            bbox: placed.bbox,
            clip: placed.clip,
            fill_color: fills.then(|| self.colors.intern(gs.fill_color)),
            stroke_color: strokes.then(|| self.colors.intern(gs.stroke_color)),
            line_style: gs.line_style.clone(),
            fill_opacity: gs.fill_opacity,
            stroke_opacity: gs.stroke_opacity,
            blend_mode: gs.blend_mode,
            overprint: (fills && gs.fill_overprint) || (strokes && gs.stroke_overprint),
            path,
        };

        if drawn.is_opaque_rect_fill() {
            let ctx = SpanContext {
                arena: &self.chars,
                clips: &self.clips,
                viewport: self.viewport,
            };
            self.spans.occlude(&drawn.bbox, &ctx);
        }
        self.push_graphic(GraphicsItem::Path(drawn));
    }

    fn on_char(&mut self, event: CharEvent) {
        let gs = self.state.current();
        let Some(font) = gs.font else {
            self.emit(
                Diagnostic::error(
                    DiagnosticCode::MissingFont,
                    "character drawn before any font was set",
                )
                .with_element(format!("code {:#x}", event.code)),
            );
            return;
        };
        let font_size = gs.font_size;
        let horizontal_scaling = gs.horizontal_scaling;

        let limit = self.doc.options().max_chars_per_page;
        if self.chars.len() >= limit {
            if !self.char_limit_hit {
                self.char_limit_hit = true;
                self.emit(
                    Diagnostic::warning(
                        DiagnosticCode::ResourceLimitReached,
                        format!("more than {limit} characters; the rest are dropped"),
                    )
                    .with_element("max_chars_per_page"),
                );
            }
            return;
        }

        if !event.origin.is_finite()
            || !event.transform.is_finite()
            || !event.advance.is_finite()
            || !font_size.is_finite()
        {
            self.emit(
                Diagnostic::error(
                    DiagnosticCode::NonFiniteTransform,
                    "character with non-finite transform dropped",
                )
                .with_font(self.font_name(font))
                .with_element(format!("code {:#x}", event.code)),
            );
            return;
        }
        if !event.visible && !self.doc.options().keep_invisible_text {
            return;
        }

        let Some(resolved) = self.doc.resolve(font, event.code, event.unicode) else {
            self.emit(
                Diagnostic::error(
                    DiagnosticCode::MissingFont,
                    "character drawn with an unregistered font",
                )
                .with_element(format!("code {:#x}", event.code)),
            );
            return;
        };
        let glyph = match resolved {
            Ok(glyph) => glyph,
            Err(failure) => {
                if failure == GlyphFailure::NullHint {
                    self.emit(
                        Diagnostic::error(
                            DiagnosticCode::UnresolvedGlyph,
                            "glyph resolved to U+0000",
                        )
                        .with_font(self.font_name(font))
                        .with_element(format!("code {:#x}", event.code)),
                    );
                }
                failure.placeholder()
            }
        };

        let Some(record) = self.doc.font(font) else {
            return;
        };
        let handle = self.fonts.intern(font, &record.family, record.bold, record.italic);
        let (ascent, descent) = (record.descriptor.ascent, record.descriptor.descent);

        let size = font_size * event.transform.c.hypot(event.transform.d);
        let rotation = event.transform.rotation_degrees();
        let Some(bbox) = Self::glyph_bbox(&event, rotation, size, ascent, descent) else {
            return;
        };

        let gs = self.state.current();
        let Some(placed) = clip::apply(&self.clips, gs.clip, bbox) else {
            log_trace!("page {}: char {:#x} fully clipped", self.number, event.code);
            return;
        };
        let attrs = CharAttributes {
            fill_color: self.colors.intern(gs.fill_color),
            stroke_color: self.colors.intern(gs.stroke_color),
            opacity: if event.outline { gs.stroke_opacity } else { gs.fill_opacity },
            clip: placed.clip,
        };

        let id: CharId = self.chars.len();
        self.chars.push(Character {
            ch: glyph.ch,
            code: event.code,
            tier: glyph.tier,
            font: handle,
            font_size: size,
            horizontal_scaling,
            bbox,
            transform: Ctm {
                e: 0.0,
                f: 0.0,
                ..event.transform
            },
            rotation,
            attrs,
            outline: event.outline,
            visible: event.visible,
            link: link_at(&self.links, bbox.center()),
        });
        if glyph.tier == GlyphTier::Replacement {
            log_trace!("page {}: code {:#x} placed as U+FFFD", self.number, event.code);
        }

        let ctx = SpanContext {
            arena: &self.chars,
            clips: &self.clips,
            viewport: self.viewport,
        };
        self.spans.push_char(id, &ctx);
    }

    fn on_image(&mut self, event: ImageEvent) {
        if !self.accept_graphic() {
            return;
        }
        if !event.transform.is_finite() {
            self.emit(Diagnostic::error(
                DiagnosticCode::NonFiniteTransform,
                "image with non-finite transform dropped",
            ));
            return;
        }
        let gs = self.state.current();
        let bbox = image_bbox_from_ctm(&event.transform);
        let Some(placed) = clip::apply(&self.clips, gs.clip, bbox) else {
            log_trace!("page {}: image fully clipped", self.number);
            return;
        };
        let opacity = gs.fill_opacity;

        let encoder = &self.doc.encoder;
        let cached = self.images.get_or_encode(event.resource_id, &event.samples, || {
            encoder.encode(&event.samples, &event.metadata)
        });
        let cached = match cached {
            Ok(cached) => cached,
            Err(err) => {
                let mut diagnostic =
                    Diagnostic::error(DiagnosticCode::ImageEncodingFailed, err.to_string());
                if let Some(id) = event.resource_id {
                    diagnostic = diagnostic.with_element(format!("image {id}"));
                }
                self.emit(diagnostic);
                return;
            }
        };
        if cached.reused {
            log_trace!("page {}: image {} reused", self.number, cached.handle);
        }

        self.push_graphic(GraphicsItem::Image(PlacedImage {
            image: cached.handle,
            bbox: placed.bbox,
            clip: placed.clip,
            transform: event.transform,
            opacity,
        }));
    }

    fn on_link(&mut self, event: LinkEvent) {
        if !event.bbox.is_finite() {
            return;
        }
        self.links.push(Link {
            bbox: event.bbox,
            uri: event.uri,
        });
    }

    fn end_text_object(&mut self) {
        self.close_span();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::font_map::FontMap;
    use crate::font_record::{FontDescriptor, FontKind};
    use pagerecon_core::{ExtractOptions, FillRule, FontEncoding, PathCommand, StandardEncoding};

    fn doc_with(options: ExtractOptions) -> (Document, FontId) {
        let mut doc = Document::new(Arc::new(FontMap::empty()), options);
        let font = doc.register_font(
            FontDescriptor::new("Helvetica", FontKind::Type1)
                .with_encoding(FontEncoding::standard(StandardEncoding::WinAnsi)),
        );
        (doc, font)
    }

    fn doc() -> (Document, FontId) {
        doc_with(ExtractOptions::default())
    }

    /// Upright text: y-down page space, so the text matrix flips y.
    fn upright() -> Ctm {
        Ctm::new(1.0, 0.0, 0.0, -1.0, 0.0, 0.0)
    }

    fn char_at(ch: char, x: f64, y: f64) -> CharEvent {
        CharEvent {
            code: ch as u32,
            unicode: Some(ch),
            origin: Point::new(x, y),
            advance: 6.0,
            transform: upright(),
            visible: true,
            outline: false,
        }
    }

    fn rect(x0: f64, top: f64, x1: f64, bottom: f64) -> Vec<PathCommand> {
        vec![
            PathCommand::MoveTo(Point::new(x0, top)),
            PathCommand::LineTo(Point::new(x1, top)),
            PathCommand::LineTo(Point::new(x1, bottom)),
            PathCommand::LineTo(Point::new(x0, bottom)),
            PathCommand::Close,
        ]
    }

    fn show(page: &mut PageAssembler<'_>, text: &str, x: f64, y: f64) {
        for (i, ch) in text.chars().enumerate() {
            page.on_char(char_at(ch, x + 6.0 * i as f64, y));
        }
        page.end_text_object();
    }

    #[test]
    fn test_chars_merge_into_spans() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        show(&mut page, "Hello", 72.0, 100.0);
        show(&mut page, "World", 72.0, 120.0);
        let page = page.finish();
        assert_eq!(page.spans.len(), 2);
        assert_eq!(page.text(), "Hello\nWorld");
        assert_eq!(page.chars.len(), 10);
        assert_eq!(page.chars[0].bbox, BBox::new(72.0, 92.0, 78.0, 102.0));
        assert_eq!(page.chars[0].rotation, 0.0);
    }

    #[test]
    fn test_same_line_spans_join_with_space() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        show(&mut page, "left", 72.0, 100.0);
        show(&mut page, "right", 300.0, 100.0);
        assert_eq!(page.finish().text(), "left right");
    }

    #[test]
    fn test_char_without_font_is_dropped() {
        let (mut doc, _) = doc();
        let mut page = doc.begin_page(3, 600.0, 800.0, 0.0);
        page.on_char(char_at('A', 0.0, 10.0));
        let page = page.finish();
        assert!(page.chars.is_empty());
        assert_eq!(page.diagnostics.len(), 1);
        assert_eq!(page.diagnostics[0].code, DiagnosticCode::MissingFont);
        assert_eq!(page.diagnostics[0].page, Some(3));
    }

    #[test]
    fn test_non_finite_char_is_dropped() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        let mut event = char_at('A', 0.0, 10.0);
        event.transform.a = f64::NAN;
        page.on_char(event);
        let page = page.finish();
        assert!(page.chars.is_empty());
        assert_eq!(page.diagnostics[0].code, DiagnosticCode::NonFiniteTransform);
    }

    #[test]
    fn test_invisible_text_respects_option() {
        let options = ExtractOptions {
            keep_invisible_text: false,
            ..ExtractOptions::default()
        };
        let (mut doc, font) = doc_with(options);
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        let mut event = char_at('A', 0.0, 10.0);
        event.visible = false;
        page.on_char(event);
        assert!(page.finish().chars.is_empty());
    }

    #[test]
    fn test_char_limit_reported_once() {
        let options = ExtractOptions {
            max_chars_per_page: 2,
            ..ExtractOptions::default()
        };
        let (mut doc, font) = doc_with(options);
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        show(&mut page, "abcd", 0.0, 10.0);
        let page = page.finish();
        assert_eq!(page.chars.len(), 2);
        let limits = page
            .diagnostics
            .iter()
            .filter(|d| d.code == DiagnosticCode::ResourceLimitReached)
            .count();
        assert_eq!(limits, 1);
    }

    #[test]
    fn test_colors_are_interned() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        page.set_fill_color(Color::new(1.0, 0.0, 0.0));
        show(&mut page, "red", 0.0, 10.0);
        page.set_fill_color(Color::black());
        show(&mut page, "black", 0.0, 30.0);
        page.set_fill_color(Color::new(1.0, 0.0, 0.0));
        show(&mut page, "red", 0.0, 50.0);
        let page = page.finish();
        // red fill, black stroke, black fill shares the stroke entry
        assert_eq!(page.colors.len(), 2);
        assert_eq!(page.chars[0].attrs.fill_color, page.chars[8].attrs.fill_color);
    }

    #[test]
    fn test_non_finite_color_keeps_previous() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        page.set_fill_color(Color::new(1.0, 0.0, 0.0));
        page.set_fill_color(Color::new(f64::NAN, 0.0, 0.0));
        page.set_stroke_color(Color::new(0.0, f64::INFINITY, 0.0));
        show(&mut page, "AB", 0.0, 10.0);
        let page = page.finish();
        // red fill, black stroke
        assert_eq!(page.colors.len(), 2);
        assert_eq!(page.spans.len(), 1);
        assert_eq!(page.color(page.chars[0].attrs.fill_color), Some(&Color::new(1.0, 0.0, 0.0)));
        assert_eq!(page.chars[0].attrs.fill_color, page.chars[1].attrs.fill_color);
        let codes: Vec<_> = page.diagnostics.iter().map(|d| d.code.clone()).collect();
        assert_eq!(codes, vec![DiagnosticCode::NonFiniteColor; 2]);
        assert!(page.diagnostics.iter().all(|d| d.is_error()));
    }

    #[test]
    fn test_state_restores_clip() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        page.save_state();
        page.on_clip(ClipEvent {
            commands: rect(0.0, 0.0, 50.0, 50.0),
            fill_rule: FillRule::NonZeroWinding,
        });
        show(&mut page, "in", 10.0, 20.0);
        show(&mut page, "out", 100.0, 100.0);
        page.restore_state();
        show(&mut page, "free", 100.0, 200.0);
        page.restore_state();
        let page = page.finish();
        assert_eq!(page.text(), "in\nfree");
        assert!(page.chars.iter().all(|c| c.attrs.clip == ClipRef::NONE));
    }

    #[test]
    fn test_partially_clipped_char_keeps_clip() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        page.on_clip(ClipEvent {
            commands: rect(0.0, 0.0, 13.0, 50.0),
            fill_rule: FillRule::NonZeroWinding,
        });
        show(&mut page, "ab", 10.0, 20.0);
        let page = page.finish();
        assert_eq!(page.chars.len(), 1);
        assert_eq!(page.chars[0].attrs.clip, ClipRef::from_index(0));
        assert_eq!(page.spans[0].bbox.x1, 13.0);
    }

    #[test]
    fn test_opaque_fill_hides_text_below() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        show(&mut page, "secret", 10.0, 20.0);
        page.set_fill_color(Color::white());
        page.on_path_painted(PathEvent {
            commands: rect(0.0, 0.0, 100.0, 40.0),
            kind: PathKind::Fill,
            fill_rule: FillRule::NonZeroWinding,
        });
        show(&mut page, "shown", 10.0, 60.0);
        let page = page.finish();
        assert_eq!(page.text(), "shown");
        assert_eq!(page.graphics.len(), 1);
        assert_eq!(page.graphics_bounds, Some(BBox::new(0.0, 0.0, 100.0, 40.0)));
    }

    #[test]
    fn test_translucent_fill_keeps_text() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        show(&mut page, "kept", 10.0, 20.0);
        page.set_fill_opacity(0.5);
        page.on_path_painted(PathEvent {
            commands: rect(0.0, 0.0, 100.0, 40.0),
            kind: PathKind::Fill,
            fill_rule: FillRule::NonZeroWinding,
        });
        assert_eq!(page.finish().text(), "kept");
    }

    #[test]
    fn test_stroke_paths_record_stroke_color_only() {
        let (mut doc, _) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_stroke_color(Color::new(0.0, 0.0, 1.0));
        page.on_path_painted(PathEvent {
            commands: vec![
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 10.0)),
            ],
            kind: PathKind::Stroke,
            fill_rule: FillRule::NonZeroWinding,
        });
        let page = page.finish();
        let GraphicsItem::Path(path) = &page.graphics[0] else {
            panic!("expected a path");
        };
        assert_eq!(path.fill_color, None);
        assert_eq!(page.color(path.stroke_color.unwrap()), Some(&Color::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_output_items_list_clips_first() {
        let (mut doc, _) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.on_path_painted(PathEvent {
            commands: rect(0.0, 0.0, 10.0, 10.0),
            kind: PathKind::Stroke,
            fill_rule: FillRule::NonZeroWinding,
        });
        page.on_clip(ClipEvent {
            commands: rect(0.0, 0.0, 100.0, 100.0),
            fill_rule: FillRule::EvenOdd,
        });
        let page = page.finish();
        let items: Vec<_> = page.output_items().collect();
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], OutputItem::Clip(c, _) if c == ClipRef::from_index(0)));
        assert!(matches!(items[1], OutputItem::Drawn(GraphicsItem::Path(_))));
    }

    #[test]
    fn test_chars_inherit_links_by_centre() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        page.on_link(LinkEvent {
            bbox: BBox::new(0.0, 0.0, 20.0, 30.0),
            uri: "https://example.com".to_string(),
        });
        show(&mut page, "abcdef", 0.0, 20.0);
        let page = page.finish();
        assert_eq!(page.chars[0].link, Some(0));
        assert_eq!(page.chars[5].link, None);
    }

    #[test]
    fn test_rotated_chars_use_baseline_segment() {
        let (mut doc, font) = doc();
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        let mut event = char_at('A', 100.0, 100.0);
        event.transform = Ctm::new(0.0, 1.0, 1.0, 0.0, 0.0, 0.0);
        page.on_char(event);
        let page = page.finish();
        let c = &page.chars[0];
        assert_eq!(c.rotation, 90.0);
        assert!((c.bbox.bottom - 106.0).abs() < 1e-9);
        assert_eq!(page.spans.len(), 1);
    }

    #[test]
    fn test_null_hint_places_replacement() {
        let mut doc = Document::new(Arc::new(FontMap::empty()), ExtractOptions::default());
        let font = doc.register_font(
            FontDescriptor::new("ABCDEF+Embedded", FontKind::TrueType).embedded(true),
        );
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        page.set_font(font, 10.0);
        let mut event = char_at('x', 10.0, 20.0);
        event.unicode = Some('\0');
        page.on_char(event);
        let page = page.finish();
        assert_eq!(page.chars[0].ch, '\u{FFFD}');
        assert_eq!(page.chars[0].tier, GlyphTier::Replacement);
        assert!(
            page.diagnostics
                .iter()
                .any(|d| d.code == DiagnosticCode::UnresolvedGlyph && d.is_error())
        );
    }

    #[test]
    fn test_page_fonts_group_by_family() {
        let mut doc = Document::new(Arc::new(FontMap::empty()), ExtractOptions::default());
        let mut register = |name: &str, kind: FontKind, obj: u32| {
            doc.register_font(FontDescriptor::new(name, kind).with_object_id(obj))
        };
        let a = register("Helvetica", FontKind::Type1, 1);
        let b = register("ABCDEF+Helvetica", FontKind::TrueType, 2);
        let c = register("Helvetica-Bold", FontKind::Type1, 3);
        let mut page = doc.begin_page(0, 600.0, 800.0, 0.0);
        for (i, font) in [a, b, c].into_iter().enumerate() {
            page.set_font(font, 10.0);
            show(&mut page, "x", 10.0, 20.0 + 20.0 * i as f64);
        }
        let page = page.finish();
        assert_eq!(page.fonts.len(), 2);
        assert_eq!(page.fonts[0].members, vec![a, b]);
        assert_eq!(page.chars[0].font, page.chars[1].font);
        assert_ne!(page.chars[0].font, page.chars[2].font);
    }
}
