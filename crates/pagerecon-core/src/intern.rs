//! Per-page resource interning caches.
//!
//! Every cache is append-only: a handle, once returned, stays valid and
//! keeps referring to the same value for the lifetime of the page.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::geometry::BBox;
use crate::images::{ContentHash, EncodedImage, ImageRecord};
use crate::painting::{Color, FillRule};
use crate::path::{Path, PathCommand, PathKind};

/// Index into the page color table.
pub type ColorId = usize;
/// Index into the page font table.
pub type FontHandle = usize;
/// Index into the page image table.
pub type ImageHandle = usize;
/// Index into the page link table.
pub type LinkId = usize;

/// Reference to a clip path, with `-1` meaning the root page clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct ClipRef(i32);

impl ClipRef {
    /// No clip / root page clip.
    pub const NONE: ClipRef = ClipRef(-1);

    pub fn from_index(index: usize) -> Self {
        ClipRef(i32::try_from(index).unwrap_or(i32::MAX))
    }

    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    pub fn is_none(&self) -> bool {
        self.0 < 0
    }

    pub fn raw(&self) -> i32 {
        self.0
    }
}

impl Default for ClipRef {
    fn default() -> Self {
        Self::NONE
    }
}

/// Append-only RGB color table.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    colors: Vec<Color>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `color`, appending it on first sight.
    ///
    /// Linear search over a small table; exact component equality.
    pub fn intern(&mut self, color: Color) -> ColorId {
        if let Some(idx) = self.colors.iter().position(|c| *c == color) {
            return idx;
        }
        self.colors.push(color);
        self.colors.len() - 1
    }

    pub fn get(&self, id: ColorId) -> Option<&Color> {
        self.colors.get(id)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    pub fn into_vec(self) -> Vec<Color> {
        self.colors
    }
}

/// A deduplicated clipping path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipPath {
    pub kind: PathKind,
    pub fill_rule: FillRule,
    pub commands: Vec<PathCommand>,
    /// Tracked bounds: the path bounds, shrunk by any enclosing clip.
    pub bbox: BBox,
}

impl ClipPath {
    pub fn from_path(path: Path, tracked: BBox) -> Self {
        Self {
            kind: path.kind,
            fill_rule: path.fill_rule,
            commands: path.commands,
            bbox: tracked,
        }
    }

    /// Structural equality, comparing commands from the last one back so
    /// paths sharing a common prefix are rejected early.
    pub fn same_geometry(&self, other: &ClipPath) -> bool {
        self.kind == other.kind
            && self.fill_rule == other.fill_rule
            && self.bbox == other.bbox
            && self.commands.len() == other.commands.len()
            && self
                .commands
                .iter()
                .rev()
                .zip(other.commands.iter().rev())
                .all(|(a, b)| a == b)
    }
}

/// Append-only clip path table.
#[derive(Debug, Clone, Default)]
pub struct ClipTable {
    clips: Vec<ClipPath>,
}

impl ClipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle of an equal clip, inserting `clip` if none exists.
    pub fn intern(&mut self, clip: ClipPath) -> ClipRef {
        if let Some(idx) = self.clips.iter().position(|c| c.same_geometry(&clip)) {
            return ClipRef::from_index(idx);
        }
        self.clips.push(clip);
        ClipRef::from_index(self.clips.len() - 1)
    }

    pub fn get(&self, clip: ClipRef) -> Option<&ClipPath> {
        clip.index().and_then(|i| self.clips.get(i))
    }

    /// Bounds of `clip`, `None` for the root clip.
    pub fn bbox(&self, clip: ClipRef) -> Option<BBox> {
        self.get(clip).map(|c| c.bbox)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn as_slice(&self) -> &[ClipPath] {
        &self.clips
    }

    pub fn into_vec(self) -> Vec<ClipPath> {
        self.clips
    }
}

/// Result of an image cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedImage {
    pub handle: ImageHandle,
    /// `true` if the image was already cached and only its count changed.
    pub reused: bool,
}

/// Image table deduplicating by resource id, or by content hash for inline
/// streams.
#[derive(Debug, Clone)]
pub struct ImageCache {
    records: Vec<ImageRecord>,
    by_id: HashMap<i64, ImageHandle>,
    by_hash: HashMap<ContentHash, ImageHandle>,
    next_synthetic_id: i64,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            by_id: HashMap::new(),
            by_hash: HashMap::new(),
            next_synthetic_id: -1,
        }
    }
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// SHA-256 of decoded samples.
    pub fn content_hash(samples: &[u8]) -> ContentHash {
        let digest = Sha256::digest(samples);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&digest);
        hash
    }

    /// Look up an image, running `encode` only on a cache miss.
    ///
    /// With a `resource_id`, the id alone identifies the image. Without one,
    /// the content hash of `samples` does. A hit increments the reference
    /// count. A failed `encode` leaves the cache untouched.
    pub fn get_or_encode<E>(
        &mut self,
        resource_id: Option<i64>,
        samples: &[u8],
        encode: impl FnOnce() -> Result<EncodedImage, E>,
    ) -> Result<CachedImage, E> {
        let hit = match resource_id {
            Some(id) => self.by_id.get(&id).copied(),
            None => {
                let hash = Self::content_hash(samples);
                self.by_hash.get(&hash).copied()
            }
        };
        if let Some(handle) = hit {
            if let Some(record) = self.records.get_mut(handle) {
                record.ref_count += 1;
            }
            return Ok(CachedImage {
                handle,
                reused: true,
            });
        }

        let blob = encode()?;
        let hash = Self::content_hash(samples);
        let id = match resource_id {
            Some(id) => id,
            None => {
                let id = self.next_synthetic_id;
                self.next_synthetic_id -= 1;
                id
            }
        };
        let handle = self.records.len();
        self.records.push(ImageRecord {
            id,
            hash,
            width: blob.width,
            height: blob.height,
            blob,
            ref_count: 1,
        });
        match resource_id {
            Some(id) => {
                self.by_id.insert(id, handle);
            }
            None => {
                self.by_hash.insert(hash, handle);
            }
        }
        Ok(CachedImage {
            handle,
            reused: false,
        })
    }

    pub fn get(&self, handle: ImageHandle) -> Option<&ImageRecord> {
        self.records.get(handle)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<ImageRecord> {
        self.records
    }
}

/// A page-local font group: document fonts with the same family and style.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageFont {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
    /// Document font ids folded into this group, in order of first use.
    pub members: Vec<u32>,
}

/// Page-local font table keyed by (bold, italic, family).
#[derive(Debug, Clone, Default)]
pub struct PageFontTable {
    fonts: Vec<PageFont>,
    by_doc_font: HashMap<u32, FontHandle>,
}

impl PageFontTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a document font to its page group, creating the group on first
    /// sight of its (bold, italic, family) triple.
    pub fn intern(&mut self, doc_font: u32, family: &str, bold: bool, italic: bool) -> FontHandle {
        if let Some(&handle) = self.by_doc_font.get(&doc_font) {
            return handle;
        }
        let handle = match self
            .fonts
            .iter()
            .position(|f| f.bold == bold && f.italic == italic && f.family == family)
        {
            Some(idx) => {
                self.fonts[idx].members.push(doc_font);
                idx
            }
            None => {
                self.fonts.push(PageFont {
                    family: family.to_string(),
                    bold,
                    italic,
                    members: vec![doc_font],
                });
                self.fonts.len() - 1
            }
        };
        self.by_doc_font.insert(doc_font, handle);
        handle
    }

    /// The group a document font was folded into, if seen on this page.
    pub fn handle_of(&self, doc_font: u32) -> Option<FontHandle> {
        self.by_doc_font.get(&doc_font).copied()
    }

    pub fn get(&self, handle: FontHandle) -> Option<&PageFont> {
        self.fonts.get(handle)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn into_vec(self) -> Vec<PageFont> {
        self.fonts
    }
}
