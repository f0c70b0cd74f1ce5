//! Text span assembly.
//!
//! Characters arrive one at a time in drawing order. The assembler keeps at
//! most one open span; each new character either extends it or closes it
//! and starts another. Closed spans are finalized (trimmed, measured,
//! clipped) and inserted into the page's span list in reading order, where
//! they may occlude earlier spans drawn in the same place.

use pagerecon_core::{BBox, CharId, Character, ClipTable, TextSpan, insert_ordered};

/// Maximum difference between the tops of adjacent characters on one line.
pub const TOP_TOLERANCE: f64 = 0.001;

/// Gap, in multiples of the scaled font size, that always ends a span.
pub const MAX_GAP_FACTOR: f64 = 2.0;

/// Gap, in multiples of the scaled font size, that ends a span between two
/// non-whitespace characters.
pub const MIN_WORD_GAP_FACTOR: f64 = 0.2;

/// A new span removes stored spans it covers by more than this fraction.
pub const REDRAW_OVERLAP: f64 = 0.75;

/// Spans covered by an opaque fill below this fraction are kept whole.
pub const FILL_IGNORE_OVERLAP: f64 = 0.25;

/// Spans covered by an opaque fill above this fraction are removed.
pub const FILL_DELETE_OVERLAP: f64 = 0.80;

/// Page state the assembler reads while finalizing spans.
#[derive(Debug, Clone, Copy)]
pub struct SpanContext<'a> {
    pub arena: &'a [Character],
    pub clips: &'a ClipTable,
    /// Page bounds; spans entirely outside are dropped.
    pub viewport: BBox,
}

/// Returns `true` if `next` continues the span ending with `prev`.
///
/// Geometry is compared in the characters' rotated frame, where the
/// baseline runs left to right.
pub fn continues_span(prev: &Character, next: &Character) -> bool {
    if !prev.has_right_angle_rotation() || prev.rotation != next.rotation {
        return false;
    }
    if next.outline {
        return false;
    }
    let (p, n) = (prev.frame_bbox(), next.frame_bbox());
    if p.x1 > n.x1 || (p.top - n.top).abs() > TOP_TOLERANCE {
        return false;
    }
    if prev.font != next.font
        || prev.font_size != next.font_size
        || prev.attrs.fill_color != next.attrs.fill_color
        || prev.attrs.clip != next.attrs.clip
    {
        return false;
    }

    let scaling = prev.font_size * prev.horizontal_scaling;
    let max_gap = MAX_GAP_FACTOR * scaling;
    let min_word_gap = MIN_WORD_GAP_FACTOR * scaling;
    let gap = n.x0 - p.x1;
    let (prev_ws, next_ws) = (prev.is_whitespace(), next.is_whitespace());
    let same_link = prev.link.is_some() && prev.link == next.link;

    if prev_ws && p.width() > max_gap {
        return false;
    }
    if gap > max_gap {
        return false;
    }
    !(gap > min_word_gap && !prev_ws && !next_ws && !same_link)
}

/// Finalize a closed span: trim whitespace at both ends, recompute bounds,
/// apply the rotation heuristic, the viewport and the clip. Returns `None`
/// when nothing visible remains.
///
/// Spans built by [`SpanAssembler::push_char`] never start with whitespace,
/// but a span cut by an opaque fill can.
pub fn finalize_span(mut span: TextSpan, ctx: &SpanContext<'_>) -> Option<TextSpan> {
    let visible = |id: &CharId| ctx.arena.get(*id).is_some_and(|c| !c.is_whitespace());
    let end = span.chars.iter().rposition(visible).map_or(0, |i| i + 1);
    span.chars.truncate(end);
    let start = span.chars.iter().position(visible).unwrap_or(span.chars.len());
    span.chars.drain(..start);
    let mut bbox = span
        .chars
        .iter()
        .filter_map(|&id| ctx.arena.get(id))
        .map(|c| c.bbox)
        .reduce(|acc, b| acc.union(&b))?;

    // Rotated glyph boxes only cover the baseline; rebuild the box in the
    // text frame with one font size of height.
    if span.is_rotated() {
        let mut frame = bbox.rotated(-span.rotation);
        frame.top -= span.font_size;
        bbox = frame.rotated(span.rotation);
    }

    if bbox.is_disjoint(&ctx.viewport) {
        log_trace!("dropping span outside the page at {:?}", bbox);
        return None;
    }
    if let Some(clip) = ctx.clips.bbox(span.attrs.clip) {
        bbox = bbox.intersect(&clip);
    }
    span.bbox = bbox;
    Some(span)
}

/// Per-page span state machine.
#[derive(Debug, Clone, Default)]
pub struct SpanAssembler {
    open: Option<TextSpan>,
    spans: Vec<TextSpan>,
}

impl SpanAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored spans in reading order. The open span is not included.
    pub fn spans(&self) -> &[TextSpan] {
        &self.spans
    }

    pub fn open_span(&self) -> Option<&TextSpan> {
        self.open.as_ref()
    }

    /// Feed the character stored at `id` in the arena.
    pub fn push_char(&mut self, id: CharId, ctx: &SpanContext<'_>) {
        let Some(ch) = ctx.arena.get(id) else {
            return;
        };
        if let Some(open) = self.open.as_mut() {
            let prev = open.chars.last().and_then(|&last| ctx.arena.get(last));
            if prev.is_some_and(|prev| continues_span(prev, ch)) {
                open.push(id, ch);
                return;
            }
            self.close(ctx);
        }
        if ch.is_whitespace() {
            return;
        }
        self.open = Some(TextSpan::start(id, ch));
    }

    /// Close the open span, if any, and store it.
    pub fn close(&mut self, ctx: &SpanContext<'_>) {
        if let Some(span) = self.open.take().and_then(|s| finalize_span(s, ctx)) {
            self.insert(span);
        }
    }

    /// Store a finalized span. A non-rotated span removes the non-rotated
    /// spans it mostly covers, since text drawn twice at one position shows
    /// only the last drawing.
    fn insert(&mut self, span: TextSpan) {
        if !span.is_rotated() {
            let before = self.spans.len();
            self.spans.retain(|old| {
                old.is_rotated() || span.bbox.overlap_ratio(&old.bbox) <= REDRAW_OVERLAP
            });
            let removed = before - self.spans.len();
            if removed > 0 {
                log_debug!("span at {:?} replaced {} earlier span(s)", span.bbox, removed);
            }
        }
        insert_ordered(&mut self.spans, span);
    }

    /// Hide text under an opaque rectangular fill.
    ///
    /// Spans mostly covered are removed. Spans partly covered lose the
    /// characters under the fill, unless the fill spans their whole width.
    pub fn occlude(&mut self, fill: &BBox, ctx: &SpanContext<'_>) {
        self.close(ctx);
        let stored = std::mem::take(&mut self.spans);
        let mut trimmed = Vec::new();
        for mut span in stored {
            if span.is_rotated() {
                self.spans.push(span);
                continue;
            }
            let ratio = span.bbox.overlap_ratio(fill);
            if ratio < FILL_IGNORE_OVERLAP {
                self.spans.push(span);
            } else if ratio > FILL_DELETE_OVERLAP {
                log_debug!("fill at {:?} hides span at {:?}", fill, span.bbox);
            } else if fill.x0 <= span.bbox.x0 && fill.x1 >= span.bbox.x1 {
                self.spans.push(span);
            } else {
                span.chars.retain(|&id| {
                    ctx.arena
                        .get(id)
                        .is_some_and(|c| c.bbox.x1 <= fill.x0 || c.bbox.x0 >= fill.x1)
                });
                match finalize_span(span, ctx) {
                    Some(rest) => trimmed.push(rest),
                    None => log_debug!("fill at {:?} hides every character of a span", fill),
                }
            }
        }
        for span in trimmed {
            insert_ordered(&mut self.spans, span);
        }
    }

    /// Close the open span and return the stored spans.
    pub fn finish(mut self, ctx: &SpanContext<'_>) -> Vec<TextSpan> {
        self.close(ctx);
        self.spans
    }
}
