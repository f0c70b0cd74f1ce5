//! Colors and graphics attributes.
//!
//! Colors are normalized to RGB before interning; gray and CMYK inputs are
//! converted with the naive device formulas.

/// Simple RGB color with components in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Create a new RGB color with values in [0.0, 1.0].
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Black color (0, 0, 0).
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// White color (1, 1, 1).
    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// DeviceGray to RGB.
    pub fn from_gray(gray: f64) -> Self {
        let g = clamp_unit(gray);
        Self::new(g, g, g)
    }

    /// DeviceCMYK to RGB.
    pub fn from_cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        let k = clamp_unit(k);
        Self::new(
            (1.0 - clamp_unit(c)) * (1.0 - k),
            (1.0 - clamp_unit(m)) * (1.0 - k),
            (1.0 - clamp_unit(y)) * (1.0 - k),
        )
    }

    /// Infer the color space from the component count (1 = gray, 3 = RGB,
    /// 4 = CMYK). Other counts yield `None`.
    pub fn from_components(components: &[f64]) -> Option<Self> {
        match *components {
            [g] => Some(Self::from_gray(g)),
            [r, g, b] => Some(Self::new(clamp_unit(r), clamp_unit(g), clamp_unit(b))),
            [c, m, y, k] => Some(Self::from_cmyk(c, m, y, k)),
            _ => None,
        }
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// Hex string `RRGGBB` as written by most serializers.
    pub fn to_hex(&self) -> String {
        let byte = |v: f64| (clamp_unit(v) * 255.0).round() as u8;
        format!("{:02X}{:02X}{:02X}", byte(self.r), byte(self.g), byte(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Fill rule for path painting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
    /// Nonzero winding number rule (default).
    #[default]
    NonZeroWinding,
    /// Even-odd rule.
    EvenOdd,
}

/// Line cap style (`J` operator).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Line join style (`j` operator).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Dash pattern for stroking operations.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashPattern {
    /// Alternating dash and gap lengths. Empty means a solid line.
    pub dash_array: Vec<f64>,
    /// Offset into the pattern at which the dash starts.
    pub dash_phase: f64,
}

impl DashPattern {
    pub fn solid() -> Self {
        Self::default()
    }

    pub fn is_solid(&self) -> bool {
        self.dash_array.is_empty()
    }
}

/// Blend mode from the `/BM` entry of an ExtGState.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    Other,
}

/// Stroke attributes captured when a path is painted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineStyle {
    /// Current line width (default: 1.0).
    pub width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub dash: DashPattern,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::default(),
            join: LineJoin::default(),
            dash: DashPattern::solid(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        let c = Color::new(0.5, 0.6, 0.7);
        assert_eq!(c.r, 0.5);
        assert_eq!(c.g, 0.6);
        assert_eq!(c.b, 0.7);
    }

    #[test]
    fn test_color_default_is_black() {
        assert_eq!(Color::default(), Color::black());
    }

    #[test]
    fn test_gray_conversion() {
        assert_eq!(Color::from_gray(0.25), Color::new(0.25, 0.25, 0.25));
        assert_eq!(Color::from_gray(2.0), Color::white());
    }

    #[test]
    fn test_cmyk_conversion() {
        assert_eq!(Color::from_cmyk(0.0, 0.0, 0.0, 0.0), Color::white());
        assert_eq!(Color::from_cmyk(0.0, 0.0, 0.0, 1.0), Color::black());
        assert_eq!(Color::from_cmyk(1.0, 0.0, 0.0, 0.0), Color::new(0.0, 1.0, 1.0));
    }

    #[test]
    fn test_from_components_by_count() {
        assert_eq!(Color::from_components(&[0.0]), Some(Color::black()));
        assert_eq!(
            Color::from_components(&[1.0, 0.0, 0.0]),
            Some(Color::new(1.0, 0.0, 0.0))
        );
        assert_eq!(
            Color::from_components(&[0.0, 0.0, 0.0, 0.0]),
            Some(Color::white())
        );
        assert_eq!(Color::from_components(&[0.1, 0.2]), None);
    }

    #[test]
    fn test_nan_component_clamped_to_zero() {
        assert_eq!(Color::from_gray(f64::NAN), Color::black());
    }

    #[test]
    fn test_color_is_finite() {
        assert!(Color::new(0.2, 0.4, 1.0).is_finite());
        assert!(!Color::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Color::new(0.0, 0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_hex() {
        assert_eq!(Color::new(1.0, 0.0, 0.5).to_hex(), "FF0080");
    }

    #[test]
    fn test_line_style_default() {
        let style = LineStyle::default();
        assert_eq!(style.width, 1.0);
        assert!(style.dash.is_solid());
        assert_eq!(style.cap, LineCap::Butt);
        assert_eq!(style.join, LineJoin::Miter);
    }
}
