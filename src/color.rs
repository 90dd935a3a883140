use std::ops::{ Add, Mul };

use crate::feq;
use crate::vector::Vector3;

/// A color being accumulated.
///
/// Components use the 0 to 255 scale of the final image, but may leave that
/// range while light contributions are summed. Use `Color::to_rgb` to obtain
/// a displayable pixel.
///
/// # Examples
///
/// ```
/// # use sphere_tracer::color::{ Color, Rgb };
/// let c = Color::rgb(300.0, 127.9, -4.0);
/// assert_eq!(c.to_rgb(), Rgb { r: 255, g: 127, b: 0 });
/// ```
#[derive(Copy, Clone, Debug, Default, PartialOrd)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Colors are compared component-wise, allowing for floating point error.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        feq(self.r, other.r) &&
            feq(self.g, other.g) &&
            feq(self.b, other.b)
    }
}

/// A final pixel value, one byte per channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

impl Color {
    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    pub fn black() -> Color {
        Color::rgb(0.0, 0.0, 0.0)
    }

    /// Full intensity on every channel.
    pub fn white() -> Color {
        Color::rgb(255.0, 255.0, 255.0)
    }

    /// Clamps each channel to `[0, 255]` and truncates it to an integer.
    ///
    /// NaN channels become 0.
    pub fn to_rgb(&self) -> Rgb {
        Rgb {
            r: clamp_channel(self.r),
            g: clamp_channel(self.g),
            b: clamp_channel(self.b),
        }
    }
}

fn clamp_channel(c: f64) -> u8 {
    if c.is_nan() {
        return 0;
    }

    c.clamp(0.0, 255.0).trunc() as u8
}

/// Material diffuse colors are authored as vectors.
impl From<Vector3> for Color {
    fn from(v: Vector3) -> Color {
        Color::rgb(v.x, v.y, v.z)
    }
}

impl From<Rgb> for Color {
    fn from(p: Rgb) -> Color {
        Color::rgb(p.r as f64, p.g as f64, p.b as f64)
    }
}

impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

/// Multiplies a color by a scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// Component-wise (Hadamard) product of two colors.
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
        }
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(90.0, 60.0, 75.0);
    let c2 = Color::rgb(70.0, 10.0, 25.0);

    assert_eq!(c1 + c2, Color::rgb(160.0, 70.0, 100.0));
}

#[test]
fn multiply_color_by_scalar() {
    assert_eq!(Color::rgb(20.0, 30.0, 40.0) * 2.0, Color::rgb(40.0, 60.0, 80.0));
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(1.0, 0.5, 2.0);
    let c2 = Color::rgb(100.0, 100.0, 100.0);

    assert_eq!(c1 * c2, Color::rgb(100.0, 50.0, 200.0));
}

#[test]
fn to_rgb_clamps_high_and_low() {
    let c = Color::rgb(255.9, 1000.0, -0.5);

    assert_eq!(c.to_rgb(), Rgb::new(255, 255, 0));
}

#[test]
fn to_rgb_truncates() {
    assert_eq!(Color::rgb(12.99, 0.99, 200.5).to_rgb(), Rgb::new(12, 0, 200));
}

#[test]
fn to_rgb_nan_is_zero() {
    assert_eq!(Color::rgb(f64::NAN, 10.0, 10.0).to_rgb(), Rgb::new(0, 10, 10));
}

#[test]
fn rgb_round_trips_through_color() {
    let p = Rgb::new(128, 200, 255);

    assert_eq!(Color::from(p).to_rgb(), p);
}
