use std::path::PathBuf;

/// Constants used while decoding a gerber file, all lengths are in millimeters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserConfiguration {
    /// Raw coordinate literals are fixed-point integers, dividing by this yields millimeters.
    pub coordinate_divisor: f64,
    /// Diameter of the circular aperture bound to the empty identifier.
    pub default_aperture_diameter: f64,
    /// Stroke width used when a line is drawn with a non-circular aperture.
    pub fallback_stroke_width: f64,
    /// An arc whose end point is closer than this (on both axes) is treated as a full circle.
    pub arc_epsilon: f64,
    /// Diameter of the ellipse emitted in place of a full-circle arc.
    pub arc_placeholder_diameter: f64,
}

impl Default for ParserConfiguration {
    fn default() -> Self {
        Self {
            coordinate_divisor: 1000.0,
            default_aperture_diameter: 0.1,
            fallback_stroke_width: 0.1,
            arc_epsilon: 0.001,
            arc_placeholder_diameter: 0.4,
        }
    }
}

/// The gerber file for each layer of an assembly, `None` means 'not given'.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GerberFileSettings {
    pub mechanical_outline: Option<PathBuf>,
    pub top_overlay: Option<PathBuf>,
    pub top_paste: Option<PathBuf>,
    pub bottom_overlay: Option<PathBuf>,
    pub bottom_paste: Option<PathBuf>,
}
