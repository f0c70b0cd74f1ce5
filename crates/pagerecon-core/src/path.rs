//! Path commands and path construction.
//!
//! Sub-path commands form a closed enum; a [`Path`] carries its commands,
//! the paint kind and the computed bounding box.

use crate::geometry::{BBox, Ctm, Point};
use crate::painting::FillRule;

/// A single sub-path drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathCommand {
    /// Move to a new point (starts a new subpath).
    MoveTo(Point),
    /// Straight line from current point to target.
    LineTo(Point),
    /// Cubic Bezier curve with two control points and an endpoint.
    CurveTo {
        /// First control point.
        cp1: Point,
        /// Second control point.
        cp2: Point,
        /// Endpoint of the curve.
        end: Point,
    },
    /// Close the current subpath (line back to the subpath start).
    Close,
}

impl PathCommand {
    /// Points referenced by this command, control points included.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let pts: [Option<Point>; 3] = match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => [Some(p), None, None],
            PathCommand::CurveTo { cp1, cp2, end } => [Some(cp1), Some(cp2), Some(end)],
            PathCommand::Close => [None, None, None],
        };
        pts.into_iter().flatten()
    }
}

/// How a path is used by the painting operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathKind {
    /// Clipping path (`W`/`W*`).
    Clip,
    /// Stroked outline.
    Stroke,
    /// Filled interior.
    Fill,
    /// Filled then stroked.
    FillStroke,
}

impl PathKind {
    pub fn fills(&self) -> bool {
        matches!(self, PathKind::Fill | PathKind::FillStroke)
    }
}

/// A complete path: ordered commands, paint kind and bounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub kind: PathKind,
    pub fill_rule: FillRule,
    pub commands: Vec<PathCommand>,
    /// Bounds of all command points. Clipping may later shrink the tracked
    /// bounds held by the owner; this field always reflects the geometry.
    pub bbox: BBox,
}

impl Path {
    /// Build a path, computing its bounds. Returns `None` for a path with
    /// no points.
    pub fn new(kind: PathKind, fill_rule: FillRule, commands: Vec<PathCommand>) -> Option<Self> {
        let points: Vec<Point> = commands.iter().flat_map(|c| c.points()).collect();
        let bbox = BBox::from_points(&points)?;
        Some(Self {
            kind,
            fill_rule,
            commands,
            bbox,
        })
    }

    pub fn is_even_odd(&self) -> bool {
        self.fill_rule == FillRule::EvenOdd
    }

    /// Returns `true` if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.commands.iter().flat_map(|c| c.points()).all(|p| p.is_finite())
    }

    /// Returns `true` if the path is a single axis-aligned rectangle:
    /// a move followed by three or four lines (the last one possibly
    /// returning to the start) and an optional close.
    pub fn is_rectangle(&self) -> bool {
        let mut cmds: &[PathCommand] = &self.commands;
        if let Some((PathCommand::Close, rest)) = cmds.split_last() {
            cmds = rest;
        }
        let Some((PathCommand::MoveTo(start), lines)) = cmds.split_first() else {
            return false;
        };
        let mut pts = vec![*start];
        for cmd in lines {
            match cmd {
                PathCommand::LineTo(p) => pts.push(*p),
                _ => return false,
            }
        }
        if pts.len() == 5 && pts[4] == pts[0] {
            pts.pop();
        }
        if pts.len() != 4 {
            return false;
        }
        (0..4).all(|i| {
            let a = pts[i];
            let b = pts[(i + 1) % 4];
            a.x == b.x || a.y == b.y
        }) && self.bbox.area() > 0.0
    }
}

/// Builder for constructing paths from path operators.
///
/// Coordinates are transformed through the CTM before storage.
#[derive(Debug, Clone)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
    current_point: Option<Point>,
    subpath_start: Option<Point>,
    ctm: Ctm,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new(Ctm::identity())
    }
}

impl PathBuilder {
    /// Create a new PathBuilder with the given CTM.
    pub fn new(ctm: Ctm) -> Self {
        Self {
            commands: Vec::new(),
            current_point: None,
            subpath_start: None,
            ctm,
        }
    }

    /// `m` operator: move to a new point, starting a new subpath.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        let p = self.ctm.transform_point(Point::new(x, y));
        self.commands.push(PathCommand::MoveTo(p));
        self.current_point = Some(p);
        self.subpath_start = Some(p);
        self
    }

    /// `l` operator: straight line from current point to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        let p = self.ctm.transform_point(Point::new(x, y));
        self.commands.push(PathCommand::LineTo(p));
        self.current_point = Some(p);
        self
    }

    /// `c` operator: cubic Bezier curve with three coordinate pairs.
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        let cp1 = self.ctm.transform_point(Point::new(x1, y1));
        let cp2 = self.ctm.transform_point(Point::new(x2, y2));
        let end = self.ctm.transform_point(Point::new(x3, y3));
        self.commands.push(PathCommand::CurveTo { cp1, cp2, end });
        self.current_point = Some(end);
        self
    }

    /// `h` operator: close the current subpath.
    pub fn close_path(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        if let Some(start) = self.subpath_start {
            self.current_point = Some(start);
        }
        self
    }

    /// `re` operator: append a rectangle as moveto + 3 lineto + closepath.
    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.move_to(x, y)
            .line_to(x + width, y)
            .line_to(x + width, y + height)
            .line_to(x, y + height)
            .close_path()
    }

    /// Get the current point (already CTM-transformed).
    pub fn current_point(&self) -> Option<Point> {
        self.current_point
    }

    /// Check if the builder has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Finish the path with the given paint kind. `None` if no points were added.
    pub fn build(&mut self, kind: PathKind, fill_rule: FillRule) -> Option<Path> {
        let commands = std::mem::take(&mut self.commands);
        self.current_point = None;
        self.subpath_start = None;
        Path::new(kind, fill_rule, commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_path(kind: PathKind) -> Path {
        PathBuilder::default()
            .rectangle(10.0, 20.0, 100.0, 50.0)
            .build(kind, FillRule::NonZeroWinding)
            .unwrap()
    }

    #[test]
    fn test_new_builder_is_empty() {
        let builder = PathBuilder::default();
        assert!(builder.is_empty());
        assert!(builder.current_point().is_none());
    }

    #[test]
    fn test_close_returns_to_subpath_start() {
        let mut builder = PathBuilder::default();
        builder.move_to(10.0, 20.0).line_to(30.0, 40.0).close_path();
        assert_eq!(builder.current_point(), Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_ctm_applied_to_points() {
        let mut builder = PathBuilder::new(Ctm::new(2.0, 0.0, 0.0, 2.0, 5.0, 5.0));
        builder.move_to(1.0, 1.0);
        assert_eq!(builder.current_point(), Some(Point::new(7.0, 7.0)));
    }

    #[test]
    fn test_rectangle_bbox() {
        let path = rect_path(PathKind::Fill);
        assert_eq!(path.commands.len(), 5);
        assert_eq!(path.bbox, BBox::new(10.0, 20.0, 110.0, 70.0));
        assert!(path.is_rectangle());
    }

    #[test]
    fn test_curve_bbox_includes_control_points() {
        let path = PathBuilder::default()
            .move_to(0.0, 0.0)
            .curve_to(0.0, 50.0, 100.0, 50.0, 100.0, 0.0)
            .build(PathKind::Stroke, FillRule::NonZeroWinding)
            .unwrap();
        assert_eq!(path.bbox, BBox::new(0.0, 0.0, 100.0, 50.0));
        assert!(!path.is_rectangle());
    }

    #[test]
    fn test_empty_builder_builds_nothing() {
        assert!(
            PathBuilder::default()
                .build(PathKind::Fill, FillRule::NonZeroWinding)
                .is_none()
        );
    }

    #[test]
    fn test_rectangle_with_explicit_return_line() {
        let path = PathBuilder::default()
            .move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .line_to(0.0, 10.0)
            .line_to(0.0, 0.0)
            .build(PathKind::Fill, FillRule::NonZeroWinding)
            .unwrap();
        assert!(path.is_rectangle());
    }

    #[test]
    fn test_skewed_quad_is_not_rectangle() {
        let path = PathBuilder::default()
            .move_to(0.0, 0.0)
            .line_to(10.0, 2.0)
            .line_to(10.0, 10.0)
            .line_to(0.0, 10.0)
            .close_path()
            .build(PathKind::Fill, FillRule::NonZeroWinding)
            .unwrap();
        assert!(!path.is_rectangle());
    }

    #[test]
    fn test_non_finite_path_detected() {
        let path = PathBuilder::default()
            .move_to(0.0, 0.0)
            .line_to(f64::INFINITY, 1.0)
            .build(PathKind::Stroke, FillRule::NonZeroWinding)
            .unwrap();
        assert!(!path.is_finite());
    }
}
