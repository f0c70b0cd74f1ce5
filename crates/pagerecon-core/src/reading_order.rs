//! Reading-order comparison for bounded page items.

use std::cmp::Ordering;

use crate::geometry::BBox;

/// Relative tolerance on the bottom edge for two items to share a line.
pub const BASELINE_TOLERANCE: f64 = 0.05;

/// An item with page-space bounds and a nominal text size.
pub trait Bounded {
    fn bounds(&self) -> BBox;

    /// Size used to scale the same-line tolerance; zero for non-text items.
    fn nominal_size(&self) -> f64 {
        0.0
    }
}

impl Bounded for BBox {
    fn bounds(&self) -> BBox {
        *self
    }
}

/// Two items are on the same line when their bottoms differ by less than
/// 5% of the larger size. Same-line items order left to right, others top
/// to bottom.
pub fn compare_reading_order<A: Bounded + ?Sized, B: Bounded + ?Sized>(a: &A, b: &B) -> Ordering {
    let (ba, bb) = (a.bounds(), b.bounds());
    let threshold = a.nominal_size().max(b.nominal_size()) * BASELINE_TOLERANCE;
    if (ba.bottom - bb.bottom).abs() < threshold {
        ba.x0.total_cmp(&bb.x0)
    } else {
        ba.bottom.total_cmp(&bb.bottom)
    }
}

/// Insert `item` after every element that does not sort after it and return
/// its index.
///
/// The comparator is not transitive, so the collection is maintained by
/// insertion rather than re-sorted.
pub fn insert_ordered<T: Bounded>(items: &mut Vec<T>, item: T) -> usize {
    let idx = items
        .iter()
        .position(|existing| compare_reading_order(&item, existing) == Ordering::Less)
        .unwrap_or(items.len());
    items.insert(idx, item);
    idx
}
