//! Page-space geometry: points, affine matrices and bounding boxes.
//!
//! All coordinates handed to the engine are already in a single page space
//! with a top-left origin: `x` grows to the right and `y` grows downwards.

/// A point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rotate this point about the origin by `degrees`.
    pub fn rotated(&self, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

/// A 2D affine transformation matrix `[a b c d e f]`.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Pure rotation by `degrees` (no scale, no translation).
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Build from a `[a, b, c, d, e, f]` array.
    pub fn from_array(m: [f64; 6]) -> Self {
        Self::new(m[0], m[1], m[2], m[3], m[4], m[5])
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Concatenate: the result applies `self` first, then `other`.
    pub fn concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Returns `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Rotation angle of the x axis in degrees, normalized to `[0, 360)`.
    pub fn rotation_degrees(&self) -> f64 {
        normalize_degrees(self.b.atan2(self.a).to_degrees())
    }
}

/// Normalize an angle to `[0, 360)`, snapping values within 1e-6 of a
/// multiple of 90 onto it.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let mut deg = degrees.rem_euclid(360.0);
    let nearest = (deg / 90.0).round() * 90.0;
    if (deg - nearest).abs() < 1e-6 {
        deg = nearest;
    }
    if deg >= 360.0 { deg - 360.0 } else { deg }
}

/// Returns `true` if `degrees` is an exact multiple of 90.
pub fn is_right_angle(degrees: f64) -> bool {
    degrees.rem_euclid(90.0) == 0.0
}

/// Bounding box with top-left origin coordinate system.
///
/// - `x0`: left edge
/// - `top`: top edge
/// - `x1`: right edge
/// - `bottom`: bottom edge
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Smallest box containing every point. `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<BBox> {
        let first = points.first()?;
        let mut bbox = BBox::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            bbox.x0 = bbox.x0.min(p.x);
            bbox.top = bbox.top.min(p.y);
            bbox.x1 = bbox.x1.max(p.x);
            bbox.bottom = bbox.bottom.max(p.y);
        }
        Some(bbox)
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Area; zero for degenerate or inverted boxes.
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite()
            && self.top.is_finite()
            && self.x1.is_finite()
            && self.bottom.is_finite()
    }

    /// The four corners, clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x0, self.top),
            Point::new(self.x1, self.top),
            Point::new(self.x1, self.bottom),
            Point::new(self.x0, self.bottom),
        ]
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Intersection clamped to `other`. May be degenerate if the boxes do
    /// not overlap; check [`BBox::area`] when that matters.
    pub fn intersect(&self, other: &BBox) -> BBox {
        let x0 = self.x0.max(other.x0);
        let top = self.top.max(other.top);
        BBox {
            x0,
            top,
            x1: self.x1.min(other.x1).max(x0),
            bottom: self.bottom.min(other.bottom).max(top),
        }
    }

    /// Area shared with `other`.
    pub fn intersection_area(&self, other: &BBox) -> f64 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.bottom.min(other.bottom) - self.top.max(other.top);
        if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
    }

    /// Fraction of `self`'s area covered by `other`. Zero-area boxes yield 0.
    pub fn overlap_ratio(&self, other: &BBox) -> f64 {
        let area = self.area();
        if area > 0.0 {
            self.intersection_area(other) / area
        } else {
            0.0
        }
    }

    /// Inclusive containment of `other` inside `self`.
    pub fn contains(&self, other: &BBox) -> bool {
        other.x0 >= self.x0
            && other.x1 <= self.x1
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.top && p.y <= self.bottom
    }

    /// Returns `true` when the boxes share no positive-area region.
    /// Boxes touching along an edge are disjoint.
    pub fn is_disjoint(&self, other: &BBox) -> bool {
        self.x1 <= other.x0
            || self.x0 >= other.x1
            || self.bottom <= other.top
            || self.top >= other.bottom
    }

    /// Axis-aligned box of this box's corners after rotation about the
    /// origin by `degrees`.
    pub fn rotated(&self, degrees: f64) -> BBox {
        let corners = self.corners().map(|p| p.rotated(degrees));
        // corners is non-empty, from_points only fails on an empty slice
        BBox::from_points(&corners).unwrap_or(*self)
    }
}
