//! Content handler callback trait for page assembly.
//!
//! The external content stream interpreter calls [`ContentHandler`] methods
//! in drawing order, one page at a time. All coordinates are page space
//! (origin top-left, y down); the interpreter has already applied the CTM.

use pagerecon_core::{
    BBox, BlendMode, Color, Ctm, FillRule, ImageMetadata, LineStyle, PathCommand, PathKind, Point,
};

use crate::font_record::FontId;

/// A clipping path set by `W`/`W*` and the following path operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipEvent {
    pub commands: Vec<PathCommand>,
    pub fill_rule: FillRule,
}

/// A path painted by a stroke and/or fill operator.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEvent {
    pub commands: Vec<PathCommand>,
    /// Paint kind; [`PathKind::Clip`] is not valid here.
    pub kind: PathKind,
    pub fill_rule: FillRule,
}

/// A glyph placed by a text showing operator.
#[derive(Debug, Clone, PartialEq)]
pub struct CharEvent {
    /// Raw character code from the content stream.
    pub code: u32,
    /// Unicode value the interpreter derived (e.g. from a ToUnicode map).
    pub unicode: Option<char>,
    /// Glyph origin on the baseline.
    pub origin: Point,
    /// Advance width in page units, scaling included.
    pub advance: f64,
    /// Text rendering matrix without translation and font size.
    pub transform: Ctm,
    /// `false` for render mode 3 (invisible) and its clip-only variant.
    pub visible: bool,
    /// Drawn as a stroked outline (render mode 1).
    pub outline: bool,
}

/// An image XObject or inline image placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEvent {
    /// Object number of the image XObject; `None` for inline images.
    pub resource_id: Option<i64>,
    /// Matrix mapping the unit square onto the page.
    pub transform: Ctm,
    /// Decoded samples, used for content hashing and encoding.
    pub samples: Vec<u8>,
    pub metadata: ImageMetadata,
}

/// A link annotation area.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEvent {
    pub bbox: BBox,
    pub uri: String,
}

/// Callback handler for content stream events.
///
/// All methods have default no-op implementations, allowing handlers to
/// subscribe only to the events they care about.
pub trait ContentHandler {
    /// `q`
    fn save_state(&mut self) {}

    /// `Q`; an unbalanced restore is ignored.
    fn restore_state(&mut self) {}

    fn set_fill_color(&mut self, _color: Color) {}

    fn set_stroke_color(&mut self, _color: Color) {}

    fn set_fill_opacity(&mut self, _opacity: f64) {}

    fn set_stroke_opacity(&mut self, _opacity: f64) {}

    fn set_overprint(&mut self, _fill: bool, _stroke: bool) {}

    fn set_line_style(&mut self, _style: LineStyle) {}

    fn set_blend_mode(&mut self, _mode: BlendMode) {}

    /// `Tf` with a font registered through the document.
    fn set_font(&mut self, _font: FontId, _size: f64) {}

    /// `Tz`, as a fraction (100% = 1.0).
    fn set_horizontal_scaling(&mut self, _scaling: f64) {}

    /// Intersect the current clip with a new path.
    fn on_clip(&mut self, _event: ClipEvent) {}

    fn on_path_painted(&mut self, _event: PathEvent) {}

    fn on_char(&mut self, _event: CharEvent) {}

    fn on_image(&mut self, _event: ImageEvent) {}

    fn on_link(&mut self, _event: LinkEvent) {}

    /// `ET`: no span continues across text objects.
    fn end_text_object(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ContentHandler for Recorder {
        fn save_state(&mut self) {
            self.events.push("q".to_string());
        }

        fn restore_state(&mut self) {
            self.events.push("Q".to_string());
        }

        fn on_char(&mut self, event: CharEvent) {
            self.events.push(format!("char {:#x}", event.code));
        }
    }

    struct Noop;
    impl ContentHandler for Noop {}

    fn char_event(code: u32) -> CharEvent {
        CharEvent {
            code,
            unicode: char::from_u32(code),
            origin: Point::new(10.0, 20.0),
            advance: 6.0,
            transform: Ctm::identity(),
            visible: true,
            outline: false,
        }
    }

    #[test]
    fn test_default_methods_are_noops() {
        let mut h = Noop;
        h.save_state();
        h.set_fill_color(Color::white());
        h.set_font(0, 12.0);
        h.on_char(char_event(0x41));
        h.on_path_painted(PathEvent {
            commands: vec![PathCommand::MoveTo(Point::new(0.0, 0.0))],
            kind: PathKind::Stroke,
            fill_rule: FillRule::NonZeroWinding,
        });
        h.end_text_object();
        h.restore_state();
    }

    #[test]
    fn test_overridden_methods_receive_events() {
        let mut h = Recorder::default();
        h.save_state();
        h.on_char(char_event(0x41));
        h.set_blend_mode(BlendMode::Multiply);
        h.restore_state();
        assert_eq!(h.events, vec!["q", "char 0x41", "Q"]);
    }

    #[test]
    fn test_handler_as_trait_object() {
        let mut h = Recorder::default();
        let dyn_h: &mut dyn ContentHandler = &mut h;
        dyn_h.on_char(char_event(0x42));
        assert_eq!(h.events.len(), 1);
    }
}
