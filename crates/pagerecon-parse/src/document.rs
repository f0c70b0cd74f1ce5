//! Document-level state shared by every page.
//!
//! A [`Document`] owns the font records, the per-font unmapped-code sets and
//! the external collaborators. Pages borrow it mutably while they are
//! assembled, because font records are created and updated on first use.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use pagerecon_core::{Diagnostic, DiagnosticCode, ExtractOptions, ExtractResult, PdfError};

use crate::collaborators::{GlyphOutlineSource, ImageEncoder, NoOutlines, RawSamples};
use crate::font_map::{FontMap, FontMatch};
use crate::font_record::{FontDescriptor, FontId, FontRecord};
use crate::glyph::{GlyphFailure, ResolvedGlyph, UnmappedCodes, resolve_glyph};
use crate::page::PageAssembler;

/// How a document font was matched against the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontStatus {
    /// Matched a substitution entry by name and hash.
    Mapped,
    /// Matched a substitution entry by name only.
    DuplicateMapping,
    /// Recognized system font, substituted by family.
    System,
    Unknown,
}

/// Summary of one document font.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontSummary {
    pub id: FontId,
    pub name: String,
    pub family: String,
    pub bold: bool,
    pub italic: bool,
    pub status: FontStatus,
    /// Whether any character was placed with this font.
    pub used: bool,
    /// Codes the glyph cascade could not map, ascending.
    pub unmapped_codes: Vec<u32>,
}

/// Document-wide findings returned by [`Document::finish`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentReport {
    /// Number of pages assembled.
    pub pages: usize,
    pub fonts: Vec<FontSummary>,
    pub unknown_fonts: Vec<String>,
    pub duplicate_mapping_fonts: Vec<String>,
    /// Used fonts that needed a substitution table and had none.
    pub fonts_without_table: Vec<String>,
}

/// Document state: font records, collaborators and options.
pub struct Document {
    font_map: Arc<FontMap>,
    options: ExtractOptions,
    fonts: Vec<FontRecord>,
    unmapped: Vec<UnmappedCodes>,
    by_object: HashMap<u32, FontId>,
    outlines: Box<dyn GlyphOutlineSource>,
    pub(crate) encoder: Box<dyn ImageEncoder>,
    diagnostics: Vec<Diagnostic>,
    first_error: Option<Diagnostic>,
    pages: usize,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("fonts", &self.fonts.len())
            .field("pages", &self.pages)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Document {
    pub fn new(font_map: Arc<FontMap>, options: ExtractOptions) -> Self {
        Self {
            font_map,
            options,
            fonts: Vec::new(),
            unmapped: Vec::new(),
            by_object: HashMap::new(),
            outlines: Box::new(NoOutlines),
            encoder: Box::new(RawSamples),
            diagnostics: Vec::new(),
            first_error: None,
            pages: 0,
        }
    }

    /// Use `source` as the glyph outline oracle.
    pub fn with_outline_source(mut self, source: Box<dyn GlyphOutlineSource>) -> Self {
        self.outlines = source;
        self
    }

    /// Use `encoder` as the image codec.
    pub fn with_image_encoder(mut self, encoder: Box<dyn ImageEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn font_map(&self) -> &FontMap {
        &self.font_map
    }

    /// Register a font resource and return its id.
    ///
    /// A font with an object id already seen returns the existing id.
    pub fn register_font(&mut self, descriptor: FontDescriptor) -> FontId {
        if let Some(&id) = descriptor.object_id.and_then(|obj| self.by_object.get(&obj)) {
            return id;
        }
        let id = FontId::try_from(self.fonts.len()).unwrap_or(FontId::MAX);
        let record = FontRecord::new(id, descriptor, &self.font_map);
        log_debug!(
            "registered font {} as {} (family {})",
            record.name(),
            id,
            record.family
        );

        if record.is_duplicate_mapping() {
            self.report(
                Diagnostic::warning(
                    DiagnosticCode::DuplicateMapping,
                    "font matched a substitution entry by name but not by glyph table hash",
                )
                .with_font(record.name()),
            );
        } else if record.is_unknown() {
            self.report(
                Diagnostic::warning(
                    DiagnosticCode::UnknownFont,
                    "font matches no substitution entry and no system font",
                )
                .with_font(record.name()),
            );
        }

        if let Some(obj) = record.descriptor.object_id {
            self.by_object.insert(obj, id);
        }
        self.fonts.push(record);
        self.unmapped.push(UnmappedCodes::new());
        id
    }

    pub fn font(&self, id: FontId) -> Option<&FontRecord> {
        self.fonts.get(usize::try_from(id).ok()?)
    }

    pub fn fonts(&self) -> &[FontRecord] {
        &self.fonts
    }

    /// Codes `id` has failed to map so far.
    pub fn unmapped_codes(&self, id: FontId) -> Option<&UnmappedCodes> {
        self.unmapped.get(usize::try_from(id).ok()?)
    }

    /// Run the glyph cascade for a character drawn with font `id`.
    /// `None` if the font was never registered.
    pub fn resolve(
        &mut self,
        id: FontId,
        code: u32,
        hint: Option<char>,
    ) -> Option<Result<ResolvedGlyph, GlyphFailure>> {
        let idx = usize::try_from(id).ok()?;
        let record = self.fonts.get_mut(idx)?;
        let unmapped = self.unmapped.get_mut(idx)?;
        record.used = true;
        Some(resolve_glyph(
            &self.font_map,
            record,
            code,
            hint,
            self.outlines.as_ref(),
            unmapped,
        ))
    }

    /// Start assembling a page. `rotation` is the page's /Rotate value in
    /// degrees; `width` and `height` bound the viewport.
    pub fn begin_page(
        &mut self,
        number: usize,
        width: f64,
        height: f64,
        rotation: f64,
    ) -> PageAssembler<'_> {
        log_debug!("begin page {} ({}x{}, rotation {})", number, width, height, rotation);
        PageAssembler::new(self, number, width, height, rotation)
    }

    pub(crate) fn page_finished(&mut self) {
        self.pages += 1;
    }

    /// Log a diagnostic and remember it for strict mode. Returns it back
    /// when diagnostics are being collected.
    pub(crate) fn track(&mut self, diagnostic: Diagnostic) -> Option<Diagnostic> {
        log_diagnostic!(&diagnostic);
        if diagnostic.is_error() && self.first_error.is_none() {
            self.first_error = Some(diagnostic.clone());
        }
        self.options.collect_diagnostics.then_some(diagnostic)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        if let Some(d) = self.track(diagnostic) {
            self.diagnostics.push(d);
        }
    }

    /// Emit the aggregate font warnings and build the document report.
    ///
    /// In strict mode, the first error diagnostic seen on any page fails
    /// the document.
    pub fn finish(mut self) -> Result<ExtractResult<DocumentReport>, PdfError> {
        let mut report = DocumentReport {
            pages: self.pages,
            ..DocumentReport::default()
        };
        let mut aggregate = Vec::new();

        for (record, unmapped) in self.fonts.iter().zip(&self.unmapped) {
            let status = match record.font_match {
                FontMatch::Mapped {
                    duplicate: false, ..
                } => FontStatus::Mapped,
                FontMatch::Mapped { duplicate: true, .. } => FontStatus::DuplicateMapping,
                FontMatch::System { .. } => FontStatus::System,
                FontMatch::Unknown => FontStatus::Unknown,
            };
            match status {
                FontStatus::Unknown => report.unknown_fonts.push(record.name().to_string()),
                FontStatus::DuplicateMapping => {
                    report.duplicate_mapping_fonts.push(record.name().to_string())
                }
                _ => {}
            }

            if !unmapped.is_empty() {
                aggregate.push(
                    Diagnostic::warning(
                        DiagnosticCode::UnmappedCodes,
                        format!("{} code(s) could not be mapped", unmapped.len()),
                    )
                    .with_font(record.name())
                    .with_element(unmapped.to_string()),
                );
            }
            if record.used && record.needs_substitution_table() && record.map_entry().is_none() {
                report.fonts_without_table.push(record.name().to_string());
                aggregate.push(
                    Diagnostic::warning(
                        DiagnosticCode::NoSubstitutionTable,
                        "embedded font without a unicode map or standard encoding \
                         has no substitution table",
                    )
                    .with_font(record.name()),
                );
            }

            report.fonts.push(FontSummary {
                id: record.id,
                name: record.name().to_string(),
                family: record.family.clone(),
                bold: record.bold,
                italic: record.italic,
                status,
                used: record.used,
                unmapped_codes: unmapped.iter().collect(),
            });
        }

        for diagnostic in aggregate {
            self.report(diagnostic);
        }

        if self.options.strict_mode {
            if let Some(first) = &self.first_error {
                return Err(first.to_error());
            }
        }
        Ok(ExtractResult::with_diagnostics(report, self.diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_record::FontKind;
    use pagerecon_core::{FontEncoding, GlyphTier, StandardEncoding};

    fn doc() -> Document {
        Document::new(Arc::new(FontMap::empty()), ExtractOptions::default())
    }

    #[test]
    fn test_fonts_dedupe_by_object_id() {
        let mut d = doc();
        let helvetica = |obj| FontDescriptor::new("Helvetica", FontKind::Type1).with_object_id(obj);
        let a = d.register_font(helvetica(5));
        let b = d.register_font(helvetica(5));
        let c = d.register_font(helvetica(6));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(d.fonts().len(), 2);
    }

    #[test]
    fn test_unknown_font_reported_once() {
        let mut d = doc();
        d.register_font(FontDescriptor::new("QWERTY+F1", FontKind::TrueType).with_object_id(1));
        d.register_font(FontDescriptor::new("QWERTY+F1", FontKind::TrueType).with_object_id(1));
        let result = d.finish().unwrap();
        let unknown: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|diag| diag.code == DiagnosticCode::UnknownFont)
            .collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(result.value.unknown_fonts, vec!["QWERTY+F1".to_string()]);
    }

    #[test]
    fn test_resolve_marks_font_used() {
        let mut d = doc();
        let id = d.register_font(
            FontDescriptor::new("Helvetica", FontKind::Type1)
                .with_encoding(FontEncoding::standard(StandardEncoding::WinAnsi)),
        );
        let r = d.resolve(id, 0x41, None).unwrap().unwrap();
        assert_eq!(r.ch, 'A');
        assert_eq!(r.tier, GlyphTier::Encoding);
        assert!(d.font(id).unwrap().used);
        assert!(d.resolve(99, 0x41, None).is_none());
    }

    #[test]
    fn test_finish_aggregates_unmapped_codes() {
        let mut d = doc();
        let id = d.register_font(
            FontDescriptor::new("ABCDEF+Custom", FontKind::TrueType).embedded(true),
        );
        for code in [7, 3, 7] {
            let _ = d.resolve(id, code, None);
        }
        assert_eq!(d.unmapped_codes(id).unwrap().len(), 2);
        let result = d.finish().unwrap();
        let diag = result
            .diagnostics
            .iter()
            .find(|diag| diag.code == DiagnosticCode::UnmappedCodes)
            .unwrap();
        assert_eq!(diag.element.as_deref(), Some("0x3, 0x7"));
        assert_eq!(result.value.fonts[0].unmapped_codes, vec![3, 7]);
        assert_eq!(result.value.fonts_without_table, vec!["ABCDEF+Custom".to_string()]);
        assert!(
            result
                .diagnostics
                .iter()
                .any(|diag| diag.code == DiagnosticCode::NoSubstitutionTable)
        );
    }

    #[test]
    fn test_unused_fonts_do_not_need_tables() {
        let mut d = doc();
        d.register_font(FontDescriptor::new("ABCDEF+Custom", FontKind::TrueType).embedded(true));
        let result = d.finish().unwrap();
        assert!(result.value.fonts_without_table.is_empty());
    }

    #[test]
    fn test_strict_mode_fails_on_error() {
        let options = ExtractOptions {
            strict_mode: true,
            ..ExtractOptions::default()
        };
        let mut d = Document::new(Arc::new(FontMap::empty()), options);
        d.report(Diagnostic::error(DiagnosticCode::MissingFont, "no font"));
        let err = d.finish().unwrap_err();
        assert!(matches!(
            err,
            PdfError::Escalated(ref diag) if diag.code == DiagnosticCode::MissingFont
        ));
    }

    #[test]
    fn test_strict_mode_ignores_warnings() {
        let options = ExtractOptions {
            strict_mode: true,
            ..ExtractOptions::default()
        };
        let mut d = Document::new(Arc::new(FontMap::empty()), options);
        d.register_font(FontDescriptor::new("QWERTY+F1", FontKind::TrueType));
        assert!(d.finish().is_ok());
    }

    #[test]
    fn test_disabled_collection_still_tracks_errors() {
        let options = ExtractOptions {
            collect_diagnostics: false,
            strict_mode: true,
            ..ExtractOptions::default()
        };
        let mut d = Document::new(Arc::new(FontMap::empty()), options);
        assert!(d.track(Diagnostic::error(DiagnosticCode::MissingFont, "x")).is_none());
        assert!(d.finish().is_err());
    }
}
