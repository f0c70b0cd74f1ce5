//! Document-level font records.
//!
//! A [`FontRecord`] is created the first time a font resource is seen and
//! carries everything the glyph cascade needs for that font.

use std::collections::HashMap;

use pagerecon_core::FontEncoding;
use sha2::{Digest, Sha256};

use crate::collaborators::GlyphOutlineSource;
use crate::font_map::{FontMap, FontMatch, clean_font_name};

/// Document font identifier, assigned by
/// [`Document::register_font`](crate::Document::register_font).
pub type FontId = u32;

/// Font program flavor, as far as glyph resolution cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontKind {
    Type1,
    Type3,
    TrueType,
    /// Composite (Type0/CID) font.
    Cid,
}

impl FontKind {
    /// Fonts whose substitution tables are keyed by glyph name.
    pub fn keys_by_glyph_name(&self) -> bool {
        matches!(self, FontKind::Type1 | FontKind::Type3)
    }
}

/// Font information supplied by the content-stream interpreter.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Raw font name, possibly with a subset tag (e.g., "ABCDEF+Arial-BoldMT").
    pub name: String,
    pub kind: FontKind,
    /// Object number of the font resource, used to recognize repeat registrations.
    pub object_id: Option<u32>,
    pub encoding: Option<FontEncoding>,
    pub embedded: bool,
    pub has_to_unicode: bool,
    /// Style flags from the font descriptor; name suffixes are added to these.
    pub bold: bool,
    pub italic: bool,
    /// Ascent as a fraction of the em square.
    pub ascent: f64,
    /// Descent as a fraction of the em square, negative below the baseline.
    pub descent: f64,
    /// Code → glyph index table of an embedded font, if known.
    pub glyph_map: Vec<(u32, u32)>,
}

impl FontDescriptor {
    pub fn new(name: impl Into<String>, kind: FontKind) -> Self {
        Self {
            name: name.into(),
            kind,
            object_id: None,
            encoding: None,
            embedded: false,
            has_to_unicode: false,
            bold: false,
            italic: false,
            ascent: 0.8,
            descent: -0.2,
            glyph_map: Vec::new(),
        }
    }

    pub fn with_object_id(mut self, id: u32) -> Self {
        self.object_id = Some(id);
        self
    }

    pub fn with_encoding(mut self, encoding: FontEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    pub fn with_to_unicode(mut self, has_to_unicode: bool) -> Self {
        self.has_to_unicode = has_to_unicode;
        self
    }

    pub fn with_style(mut self, bold: bool, italic: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self
    }

    pub fn with_metrics(mut self, ascent: f64, descent: f64) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    pub fn with_glyph_map(mut self, glyph_map: Vec<(u32, u32)>) -> Self {
        self.glyph_map = glyph_map;
        self
    }

    /// Hex SHA-256 of the code → glyph-index table, `None` when the table
    /// is unknown. Entries are hashed in code order.
    pub fn glyph_map_hash(&self) -> Option<String> {
        glyph_map_hash(&self.glyph_map)
    }

    /// The encoding is one of the standard named encodings, unmodified.
    pub fn has_standard_encoding(&self) -> bool {
        self.encoding.as_ref().is_some_and(|e| e.is_standard())
    }
}

/// Hex SHA-256 of a code → glyph-index table, hashed in code order.
pub fn glyph_map_hash(glyph_map: &[(u32, u32)]) -> Option<String> {
    if glyph_map.is_empty() {
        return None;
    }
    let mut pairs = glyph_map.to_vec();
    pairs.sort_unstable();
    let mut hasher = Sha256::new();
    for (code, gid) in pairs {
        hasher.update(code.to_be_bytes());
        hasher.update(gid.to_be_bytes());
    }
    let digest = hasher.finalize();
    Some(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// Resolution state of one document font.
#[derive(Debug, Clone)]
pub struct FontRecord {
    pub id: FontId,
    pub descriptor: FontDescriptor,
    pub font_match: FontMatch,
    /// Family used to group page fonts.
    pub family: String,
    pub bold: bool,
    pub italic: bool,
    /// Sub-path count per code, filled lazily from the outline source.
    outline_cache: HashMap<u32, Option<usize>>,
    /// Set once any character has been placed with this font.
    pub used: bool,
}

impl FontRecord {
    /// Build a record, matching the font against `font_map`.
    pub fn new(id: FontId, descriptor: FontDescriptor, font_map: &FontMap) -> Self {
        let cleaned = clean_font_name(&descriptor.name);
        let hash = descriptor.glyph_map_hash();
        let font_match = font_map.match_font(&descriptor.name, hash.as_deref());
        let mut bold = descriptor.bold || cleaned.bold;
        let mut italic = descriptor.italic || cleaned.italic;
        let family = match &font_match {
            FontMatch::Mapped { entry, .. } => match font_map.entry(*entry) {
                Some(e) => {
                    bold |= e.bold;
                    italic |= e.italic;
                    e.family.clone()
                }
                None => cleaned.name.clone(),
            },
            FontMatch::System { family } => family.clone(),
            FontMatch::Unknown => cleaned.name.clone(),
        };
        Self {
            id,
            descriptor,
            font_match,
            family,
            bold,
            italic,
            outline_cache: HashMap::new(),
            used: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn kind(&self) -> FontKind {
        self.descriptor.kind
    }

    /// Index of the matched substitution entry.
    pub fn map_entry(&self) -> Option<usize> {
        self.font_match.entry()
    }

    pub fn is_unknown(&self) -> bool {
        self.font_match == FontMatch::Unknown
    }

    pub fn is_duplicate_mapping(&self) -> bool {
        matches!(
            self.font_match,
            FontMatch::Mapped {
                duplicate: true,
                ..
            }
        )
    }

    /// An embedded font with no Unicode map and no standard encoding can
    /// only be decoded reliably through a substitution table.
    pub fn needs_substitution_table(&self) -> bool {
        self.descriptor.embedded
            && !self.descriptor.has_to_unicode
            && !self.descriptor.has_standard_encoding()
    }

    /// Sub-path count for `code`, asking `source` only on the first request.
    pub fn outline_subpaths(
        &mut self,
        code: u32,
        source: &dyn GlyphOutlineSource,
    ) -> Option<usize> {
        let descriptor = &self.descriptor;
        *self
            .outline_cache
            .entry(code)
            .or_insert_with(|| source.subpath_count(descriptor, code))
    }

    pub fn cached_outlines(&self) -> usize {
        self.outline_cache.len()
    }
}
