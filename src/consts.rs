use crate::color::Rgb;

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Offset applied to reflected ray origins to avoid self-intersection
pub const REFLECT_EPSILON: f64 = 0.001;

// Deepest recursion level that still intersects the scene
pub const MAX_RECURSION_DEPTH: usize = 4;

// Initial "closest so far" distance, and the furthest hit considered valid
pub const FAR_SENTINEL: f64 = 1e8;
pub const HIT_CUTOFF: f64 = 10_000.0;

pub const BACKGROUND: Rgb = Rgb { r: 128, g: 200, b: 255 };

// Runtime defaults
pub const CANVAS_WIDTH: usize = 1024;
pub const CANVAS_HEIGHT: usize = 768;
pub const FIELD_OF_VIEW: f64 = std::f64::consts::FRAC_PI_2;
pub const OUT_FILE: &str = "./out.ppm";
