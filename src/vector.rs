use std::ops::{ Add, Sub, Neg, Mul };

use serde::{ Serialize, Deserialize };

use crate::feq;
use crate::error::Error;

/// A three component vector, used for points, directions and weights.
///
/// Serialized as a plain `[x, y, z]` array.
#[derive(Debug, Default, Copy, Clone, PartialOrd, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Vector3) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Vector3 {
        Vector3 { x: v[0], y: v[1], z: v[2] }
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> [f64; 3] {
        [v.x, v.y, v.z]
    }
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3 { x, y, z }
    }

    pub fn zero() -> Vector3 {
        Default::default()
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scales a vector to unit length.
    ///
    /// Zero-length vectors have no direction, so they are reported as
    /// `Error::DegenerateVector` instead of producing NaNs.
    ///
    /// ```
    /// # use sphere_tracer::vector::Vector3;
    /// assert!(Vector3::zero().normalize().is_err());
    /// assert_eq!(Vector3::new(0.0, 3.0, 0.0).normalize().unwrap(),
    ///     Vector3::new(0.0, 1.0, 0.0));
    /// ```
    pub fn normalize(&self) -> Result<Vector3, Error> {
        let mag = self.magnitude();
        if mag == 0.0 || !mag.is_finite() {
            return Err(Error::DegenerateVector);
        }

        Ok(*self * (1.0 / mag))
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    /// Multiplies two vectors component by component.
    pub fn hadamard(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }
}

/// Reflects `incident` about `normal`.
///
/// `normal` must be unit length. `incident` points toward the surface, so a
/// ray heading straight down onto an upward normal bounces straight up.
///
/// ```
/// # use sphere_tracer::vector::{ Vector3, reflect };
/// let v = Vector3::new(1.0, -1.0, 0.0);
/// let n = Vector3::new(0.0, 1.0, 0.0);
/// assert_eq!(reflect(&v, &n), Vector3::new(1.0, 1.0, 0.0));
/// ```
pub fn reflect(incident: &Vector3, normal: &Vector3) -> Vector3 {
    *incident - *normal * 2.0 * incident.dot(normal)
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Scalar right-multiplication, `v * s`.
impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Scalar left-multiplication, `s * v`.
impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, other: Vector3) -> Vector3 {
        other * self
    }
}

/* Tests */

#[test]
fn add_vectors() {
    let a = Vector3::new(3.0, -2.0, 5.0);
    let b = Vector3::new(-2.0, 3.0, 1.0);

    assert_eq!(a + b, Vector3::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_vectors() {
    let a = Vector3::new(3.0, 2.0, 1.0);
    let b = Vector3::new(5.0, 6.0, 7.0);

    assert_eq!(a - b, Vector3::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_vector() {
    assert_eq!(-Vector3::new(1.0, -2.0, 3.0), Vector3::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_scalar_both_sides() {
    let a = Vector3::new(1.0, -2.0, 3.0);

    assert_eq!(a * 3.5, Vector3::new(3.5, -7.0, 10.5));
    assert_eq!(0.5 * a, Vector3::new(0.5, -1.0, 1.5));
}

#[test]
fn magnitude_neg() {
    let v = Vector3::new(-1.0, -2.0, -3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_dirty() {
    let v = Vector3::new(1.0, 2.0, 3.0);
    let e = Vector3::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalize().unwrap(), e);
}

#[test]
fn normalize_zero_is_degenerate() {
    assert!(matches!(Vector3::zero().normalize(), Err(Error::DegenerateVector)));
}

#[test]
fn normalize_infinite_is_degenerate() {
    let v = Vector3::new(f64::INFINITY, 0.0, 0.0);

    assert!(matches!(v.normalize(), Err(Error::DegenerateVector)));
}

#[test]
fn dot_vectors() {
    let a = Vector3::new(1.0, 2.0, 3.0);
    let b = Vector3::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn hadamard_vectors() {
    let a = Vector3::new(1.0, 2.0, 3.0);
    let b = Vector3::new(2.0, 0.5, -1.0);

    assert_eq!(a.hadamard(&b), Vector3::new(2.0, 1.0, -3.0));
}

#[test]
fn reflect_off_slanted_surface() {
    let v = Vector3::new(0.0, -1.0, 0.0);
    let n = Vector3::new(2.0f64.sqrt() / 2.0, 2.0f64.sqrt() / 2.0, 0.0);

    assert_eq!(reflect(&v, &n), Vector3::new(1.0, 0.0, 0.0));
}

#[test]
fn reflect_is_self_inverse() {
    let n = Vector3::new(1.0, 2.0, -2.0).normalize().unwrap();
    let samples = [
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(-3.0, 4.5, 0.25),
        Vector3::new(0.0, -7.0, 11.0),
        n,
    ];

    for v in samples.iter() {
        assert_eq!(reflect(&reflect(v, &n), &n), *v);
    }
}

#[test]
fn deserialize_from_array() {
    let v: Vector3 = serde_json::from_str("[1.5, -2, 3]").unwrap();

    assert_eq!(v, Vector3::new(1.5, -2.0, 3.0));
}
