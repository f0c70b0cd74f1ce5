//! Graphics state stack for page assembly.
//!
//! The interpreter reports `q`/`Q` as [`save`](GraphicsStateStack::save) and
//! [`restore`](GraphicsStateStack::restore); attribute setters modify the
//! top of the stack.

use pagerecon_core::{BlendMode, ClipRef, Color, LineStyle};

use crate::font_record::FontId;

/// Attributes captured by characters, paths and images when placed.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    pub fill_overprint: bool,
    pub stroke_overprint: bool,
    pub line_style: LineStyle,
    pub blend_mode: BlendMode,
    /// Active clip; [`ClipRef::NONE`] is the page itself.
    pub clip: ClipRef,
    pub font: Option<FontId>,
    pub font_size: f64,
    /// Horizontal scaling as a fraction (100% = 1.0).
    pub horizontal_scaling: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill_color: Color::black(),
            stroke_color: Color::black(),
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            fill_overprint: false,
            stroke_overprint: false,
            line_style: LineStyle::default(),
            blend_mode: BlendMode::Normal,
            clip: ClipRef::NONE,
            font: None,
            font_size: 0.0,
            horizontal_scaling: 1.0,
        }
    }
}

/// The current graphics state plus the states saved by `q`.
#[derive(Debug, Clone, Default)]
pub struct GraphicsStateStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl GraphicsStateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut GraphicsState {
        &mut self.current
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// `q`: push a copy of the current state.
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// `Q`: pop the most recently saved state.
    ///
    /// Returns `false` and leaves the state untouched on an unbalanced `Q`.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let stack = GraphicsStateStack::new();
        let gs = stack.current();
        assert_eq!(gs.fill_color, Color::black());
        assert_eq!(gs.fill_opacity, 1.0);
        assert_eq!(gs.clip, ClipRef::NONE);
        assert_eq!(gs.font, None);
        assert_eq!(gs.horizontal_scaling, 1.0);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_save_restore_round_trip() {
        let mut stack = GraphicsStateStack::new();
        stack.current_mut().fill_color = Color::new(1.0, 0.0, 0.0);
        stack.save();
        stack.current_mut().fill_color = Color::new(0.0, 0.0, 1.0);
        stack.current_mut().clip = ClipRef::from_index(3);
        stack.current_mut().font = Some(7);
        assert_eq!(stack.depth(), 1);

        assert!(stack.restore());
        assert_eq!(stack.current().fill_color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(stack.current().clip, ClipRef::NONE);
        assert_eq!(stack.current().font, None);
    }

    #[test]
    fn test_nested_saves_unwind_in_order() {
        let mut stack = GraphicsStateStack::new();
        for i in 1..=3 {
            stack.save();
            stack.current_mut().font_size = f64::from(i);
        }
        assert_eq!(stack.depth(), 3);
        assert!(stack.restore());
        assert_eq!(stack.current().font_size, 2.0);
        assert!(stack.restore());
        assert!(stack.restore());
        assert_eq!(stack.current().font_size, 0.0);
    }

    #[test]
    fn test_unbalanced_restore_is_noop() {
        let mut stack = GraphicsStateStack::new();
        stack.current_mut().fill_opacity = 0.5;
        assert!(!stack.restore());
        assert_eq!(stack.current().fill_opacity, 0.5);
    }
}
