//! Clip classification and clip path registration.

use pagerecon_core::{BBox, ClipPath, ClipRef, ClipTable, Path};

/// Relationship of a drawn item to the active clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipStatus {
    /// Inside the clip (inclusive) or no clip active.
    NotClipped,
    /// Straddles the clip edge.
    PartiallyClipped,
    /// No positive-area overlap; the item is discarded.
    FullyClipped,
}

/// Classify `bbox` against the active clip bounds.
pub fn classify(bbox: &BBox, clip: Option<&BBox>) -> ClipStatus {
    let Some(clip) = clip else {
        return ClipStatus::NotClipped;
    };
    if clip.contains(bbox) {
        ClipStatus::NotClipped
    } else if clip.area() <= 0.0 || clip.is_disjoint(bbox) {
        ClipStatus::FullyClipped
    } else {
        ClipStatus::PartiallyClipped
    }
}

/// Outcome of placing an item under the active clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clipped {
    /// Tracked bounds, shrunk to the clip when partially clipped.
    pub bbox: BBox,
    /// Clip to record on the item; [`ClipRef::NONE`] when fully inside.
    pub clip: ClipRef,
}

/// Apply the active clip to an item's bounds. `None` means the item is
/// fully clipped and must be dropped.
pub fn apply(clips: &ClipTable, active: ClipRef, bbox: BBox) -> Option<Clipped> {
    let clip_bbox = clips.bbox(active);
    match classify(&bbox, clip_bbox.as_ref()) {
        ClipStatus::NotClipped => Some(Clipped {
            bbox,
            clip: ClipRef::NONE,
        }),
        ClipStatus::FullyClipped => None,
        ClipStatus::PartiallyClipped => Some(Clipped {
            bbox: clip_bbox.map_or(bbox, |c| bbox.intersect(&c)),
            clip: active,
        }),
    }
}

/// Register a new clip path nested in `active` and return its handle.
///
/// The tracked bounds are the path bounds intersected with the enclosing
/// clip, so equal geometry under different parents stays distinct only when
/// the visible region differs.
pub fn push_clip(clips: &mut ClipTable, active: ClipRef, path: Path) -> ClipRef {
    let tracked = match clips.bbox(active) {
        Some(parent) => path.bbox.intersect(&parent),
        None => path.bbox,
    };
    clips.intern(ClipPath::from_path(path, tracked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagerecon_core::{Ctm, FillRule, PathBuilder, PathKind};

    fn rect_path(x: f64, y: f64, w: f64, h: f64) -> Path {
        let mut b = PathBuilder::new(Ctm::identity());
        b.rectangle(x, y, w, h);
        b.build(PathKind::Clip, FillRule::NonZeroWinding).unwrap()
    }

    #[test]
    fn test_no_clip_is_not_clipped() {
        assert_eq!(classify(&BBox::new(0.0, 0.0, 5.0, 5.0), None), ClipStatus::NotClipped);
    }

    #[test]
    fn test_equal_bbox_is_not_clipped() {
        let b = BBox::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(classify(&b, Some(&b)), ClipStatus::NotClipped);
    }

    #[test]
    fn test_edge_contact_is_fully_clipped() {
        let clip = BBox::new(0.0, 0.0, 10.0, 10.0);
        let right = BBox::new(10.0, 0.0, 20.0, 10.0);
        let below = BBox::new(0.0, 10.0, 10.0, 20.0);
        assert_eq!(classify(&right, Some(&clip)), ClipStatus::FullyClipped);
        assert_eq!(classify(&below, Some(&clip)), ClipStatus::FullyClipped);
    }

    #[test]
    fn test_straddling_is_partial() {
        let clip = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 15.0, 8.0);
        assert_eq!(classify(&b, Some(&clip)), ClipStatus::PartiallyClipped);
    }

    #[test]
    fn test_zero_area_clip_hides_everything() {
        let clip = BBox::new(0.0, 0.0, 10.0, 0.0);
        let b = BBox::new(2.0, -1.0, 3.0, 1.0);
        assert_eq!(classify(&b, Some(&clip)), ClipStatus::FullyClipped);
    }

    #[test]
    fn test_apply_shrinks_partial_items() {
        let mut clips = ClipTable::new();
        let clip = push_clip(&mut clips, ClipRef::NONE, rect_path(0.0, 0.0, 10.0, 10.0));
        let out = apply(&clips, clip, BBox::new(5.0, 5.0, 15.0, 8.0)).unwrap();
        assert_eq!(out.bbox, BBox::new(5.0, 5.0, 10.0, 8.0));
        assert_eq!(out.clip, clip);

        let inside = apply(&clips, clip, BBox::new(1.0, 1.0, 2.0, 2.0)).unwrap();
        assert_eq!(inside.clip, ClipRef::NONE);
        assert!(apply(&clips, clip, BBox::new(20.0, 20.0, 30.0, 30.0)).is_none());
    }

    #[test]
    fn test_nested_clip_tracks_intersection() {
        let mut clips = ClipTable::new();
        let outer = push_clip(&mut clips, ClipRef::NONE, rect_path(0.0, 0.0, 10.0, 10.0));
        let inner = push_clip(&mut clips, outer, rect_path(5.0, 5.0, 10.0, 10.0));
        assert_eq!(clips.bbox(inner), Some(BBox::new(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_identical_clips_dedupe() {
        let mut clips = ClipTable::new();
        let a = push_clip(&mut clips, ClipRef::NONE, rect_path(0.0, 0.0, 10.0, 10.0));
        let b = push_clip(&mut clips, ClipRef::NONE, rect_path(20.0, 0.0, 10.0, 10.0));
        let c = push_clip(&mut clips, ClipRef::NONE, rect_path(0.0, 0.0, 10.0, 10.0));
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(clips.len(), 2);
    }
}
