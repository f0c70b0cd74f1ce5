//! Characters and text spans.
//!
//! A page owns its characters in an arena (`Vec<Character>`); spans refer to
//! them by [`CharId`]. Deleting a span, or some of its characters, never
//! invalidates another span's indices.

use crate::geometry::{BBox, Ctm, is_right_angle};
use crate::intern::{ClipRef, ColorId, FontHandle, LinkId};
use crate::reading_order::Bounded;

/// Index of a character in the page arena.
pub type CharId = usize;

/// Which tier of the glyph resolution cascade produced a code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlyphTier {
    /// Document-supplied substitution table.
    UserMap,
    /// Standard encoding and the standard glyph table.
    Encoding,
    /// The interpreter's unicode hint.
    Hint,
    /// Empty glyph outline, resolved to a space.
    Outline,
    /// Resolution failed; the replacement character was used.
    Replacement,
}

/// Graphics attributes captured when a character is placed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharAttributes {
    pub fill_color: ColorId,
    pub stroke_color: ColorId,
    pub opacity: f64,
    pub clip: ClipRef,
}

/// A resolved, positioned glyph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    /// Resolved code point.
    pub ch: char,
    /// Raw code from the content stream.
    pub code: u32,
    pub tier: GlyphTier,
    /// Page-local font group.
    pub font: FontHandle,
    pub font_size: f64,
    /// Horizontal scaling as a fraction (100% = 1.0).
    pub horizontal_scaling: f64,
    /// Approximate bounds in page space.
    pub bbox: BBox,
    /// Text rendering transform without translation.
    pub transform: Ctm,
    /// Rotation of the baseline in degrees, `[0, 360)`.
    pub rotation: f64,
    pub attrs: CharAttributes,
    /// Glyph drawn as an outline (stroke-only render mode).
    pub outline: bool,
    pub visible: bool,
    pub link: Option<LinkId>,
}

impl Character {
    pub fn is_whitespace(&self) -> bool {
        is_span_whitespace(self.ch)
    }

    /// Returns `true` when the baseline is horizontal, left to right.
    pub fn is_upright(&self) -> bool {
        self.rotation == 0.0
    }

    /// Bounds expressed in the text's own horizontal frame: the page is
    /// rotated back by the character's rotation so the baseline runs along
    /// +x. Only meaningful for right-angle rotations.
    pub fn frame_bbox(&self) -> BBox {
        if self.rotation == 0.0 {
            self.bbox
        } else {
            self.bbox.rotated(-self.rotation)
        }
    }

    pub fn has_right_angle_rotation(&self) -> bool {
        is_right_angle(self.rotation)
    }
}

/// Whitespace for span trimming and gap rules: Unicode whitespace plus the
/// no-break space that low control codes resolve to.
pub fn is_span_whitespace(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{00A0}'
}

/// An ordered run of characters sharing one attribute set and rotation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextSpan {
    /// Character indices into the page arena, in drawing order.
    pub chars: Vec<CharId>,
    pub bbox: BBox,
    pub font: FontHandle,
    pub font_size: f64,
    pub rotation: f64,
    pub attrs: CharAttributes,
    /// Set when the first character sits inside a link region.
    pub link: Option<LinkId>,
}

impl TextSpan {
    /// Start a span from its first character.
    pub fn start(id: CharId, first: &Character) -> Self {
        Self {
            chars: vec![id],
            bbox: first.bbox,
            font: first.font,
            font_size: first.font_size,
            rotation: first.rotation,
            attrs: first.attrs,
            link: first.link,
        }
    }

    /// Append a character, growing the running bounds.
    pub fn push(&mut self, id: CharId, ch: &Character) {
        self.chars.push(id);
        self.bbox = self.bbox.union(&ch.bbox);
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation != 0.0
    }

    /// Concatenate the characters' code points.
    pub fn text(&self, arena: &[Character]) -> String {
        self.chars.iter().filter_map(|&id| arena.get(id)).map(|c| c.ch).collect()
    }
}

impl Bounded for TextSpan {
    fn bounds(&self) -> BBox {
        self.bbox
    }

    fn nominal_size(&self) -> f64 {
        self.font_size
    }
}
