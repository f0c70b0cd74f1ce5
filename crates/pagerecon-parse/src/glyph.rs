//! Glyph resolution cascade.
//!
//! Decides which code point a raw font code stands for. Tiers are tried in
//! a fixed order and the first success wins:
//!
//! 1. the configured substitution table of the font's map entry,
//! 2. the font's standard encoding and the standard glyph list,
//! 3. the interpreter's unicode hint, with the outline oracle consulted for
//!    embedded fonts without a recognized encoding.
//!
//! User tables always beat generic encodings, and generic encodings always
//! beat an embedded font's own hint table.

use std::collections::BTreeSet;
use std::fmt;

use pagerecon_core::{GlyphTier, glyph_name_to_char};

use crate::collaborators::GlyphOutlineSource;
use crate::font_map::FontMap;
use crate::font_record::FontRecord;

/// Code point placed when resolution fails.
pub const REPLACEMENT: char = '\u{FFFD}';

/// A successfully resolved glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGlyph {
    pub ch: char,
    pub tier: GlyphTier,
}

impl ResolvedGlyph {
    fn new(ch: char, tier: GlyphTier) -> Self {
        Self { ch, tier }
    }
}

/// Why resolution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphFailure {
    /// The interpreter's hint was U+0000; reported as an error.
    NullHint,
    /// No tier produced a candidate and there was no hint.
    NoCandidate,
}

impl GlyphFailure {
    /// The character placed in place of the unresolved glyph.
    pub fn placeholder(&self) -> ResolvedGlyph {
        ResolvedGlyph::new(REPLACEMENT, GlyphTier::Replacement)
    }
}

/// Codes a font could not map, collected for one aggregate warning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnmappedCodes {
    codes: BTreeSet<u32>,
}

impl UnmappedCodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, code: u32) {
        self.codes.insert(code);
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: u32) -> bool {
        self.codes.contains(&code)
    }

    /// Codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.codes.iter().copied()
    }
}

impl fmt::Display for UnmappedCodes {
    /// Up to 16 codes in hex, then an ellipsis.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.codes.iter().take(16).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{code:#x}")?;
        }
        if self.codes.len() > 16 {
            f.write_str(", …")?;
        }
        Ok(())
    }
}

/// Fixed-width substitution key of a TrueType/CID code (`0x41` → `"0041"`).
pub fn hex_key(code: u32) -> String {
    format!("{code:04X}")
}

/// Resolve `code` for `font`.
///
/// Deterministic given the font state, the code and the hint. The only side
/// effects are recording `code` in `unmapped` and filling the font's outline
/// cache.
pub fn resolve_glyph(
    font_map: &FontMap,
    font: &mut FontRecord,
    code: u32,
    hint: Option<char>,
    outlines: &dyn GlyphOutlineSource,
    unmapped: &mut UnmappedCodes,
) -> Result<ResolvedGlyph, GlyphFailure> {
    if let Some(ch) = user_map(font_map, font, code, hint) {
        return Ok(ResolvedGlyph::new(ch, GlyphTier::UserMap));
    }
    if let Some(ch) = standard_encoding(font, code) {
        return Ok(ResolvedGlyph::new(ch, GlyphTier::Encoding));
    }
    let Some(hint) = hint else {
        unmapped.record(code);
        return Err(GlyphFailure::NoCandidate);
    };

    if !font.descriptor.embedded {
        let ch = if font.kind().keys_by_glyph_name() && (hint as u32) < 0x21 {
            ' '
        } else {
            hint
        };
        return Ok(ResolvedGlyph::new(ch, GlyphTier::Hint));
    }

    let recognized_encoding = font
        .descriptor
        .encoding
        .as_ref()
        .is_some_and(|e| e.base.is_some());
    if !recognized_encoding {
        if font.outline_subpaths(code, outlines) == Some(0) {
            return Ok(ResolvedGlyph::new(' ', GlyphTier::Outline));
        }
    }

    unmapped.record(code);
    match hint {
        '\0' => Err(GlyphFailure::NullHint),
        h if (h as u32) < 0x21 => Ok(ResolvedGlyph::new(' ', GlyphTier::Hint)),
        h => Ok(ResolvedGlyph::new(h, GlyphTier::Hint)),
    }
}

fn user_map(font_map: &FontMap, font: &FontRecord, code: u32, hint: Option<char>) -> Option<char> {
    let entry = font.map_entry()?;
    if font.kind().keys_by_glyph_name() {
        let code = u8::try_from(code).ok()?;
        let name = font.descriptor.encoding.as_ref()?.glyph_name(code)?;
        return font_map.lookup(entry, name);
    }
    if let Some(ch) = font_map.lookup(entry, &hex_key(code)) {
        return Some(ch);
    }
    match hint {
        Some(h) if h != REPLACEMENT => font_map.lookup(entry, &hex_key(h as u32)),
        _ => None,
    }
}

fn standard_encoding(font: &FontRecord, code: u32) -> Option<char> {
    let encoding = font.descriptor.encoding.as_ref()?;
    if !encoding.is_standard() {
        return None;
    }
    let base = encoding.base?;
    let code = u8::try_from(code).ok()?;
    if base.is_alphabetic() {
        match code {
            0x00..=0x1F => return Some('\u{00A0}'),
            0x20..=0x7F => return Some(char::from(code)),
            _ => {}
        }
    }
    base.glyph_name(code).and_then(glyph_name_to_char)
}
