use std::fmt::Debug;

use crate::error::Error;
use crate::vector::Vector3;
use crate::ray::Ray;
use crate::light::Material;

/// A surface that rays can hit.
///
/// Every primitive supplies its own intersection test and surface normal;
/// material accessors are provided on top of `material`. New primitives
/// (planes, triangles) only need to implement this trait to join a `Scene`.
pub trait Geometry: Debug {
    /// Distance along `ray` to the nearest visible hit, if any.
    ///
    /// `max_distance` is the closest hit found so far by the caller. It is
    /// passed for symmetry across primitives; callers still compare the
    /// returned distance themselves.
    fn intersect(&self, ray: &Ray, max_distance: f64) -> Option<f64>;

    /// Unit surface normal at a point on the surface.
    fn normal_at(&self, point: Vector3) -> Result<Vector3, Error>;

    fn material(&self) -> &Material;

    /// Moves the primitive. Used by the animation step between frames.
    fn translate(&mut self, offset: Vector3);

    fn diffuse_color(&self) -> Vector3 {
        self.material().diffuse_color
    }

    fn specular_exponent(&self) -> f64 {
        self.material().specular_exponent
    }

    fn albedo(&self) -> Vector3 {
        self.material().albedo
    }
}

/// A sphere with a center, a radius and a material.
///
/// The squared radius is cached for intersection tests, so the radius itself
/// is only reachable through `radius` and `set_radius`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3,
    pub material: Material,

    radius: f64,
    radius2: f64,
}

impl Sphere {
    pub fn new(center: Vector3, radius: f64, material: Material) -> Sphere {
        Sphere { center, material, radius, radius2: radius * radius }
    }

    /// A sphere of radius one at the origin with the default material.
    pub fn unit() -> Sphere {
        Sphere::new(Vector3::zero(), 1.0, Default::default())
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
        self.radius2 = radius * radius;
    }
}

impl Geometry for Sphere {
    /// Geometric ray/sphere test.
    ///
    /// Projects the center onto the ray to find the closest approach `tca`,
    /// then steps back and forth by the half chord `thc`. The near root is
    /// used unless it lies behind the origin (the origin is inside the
    /// sphere), in which case the far root is used.
    fn intersect(&self, ray: &Ray, _max_distance: f64) -> Option<f64> {
        let l = self.center - ray.origin;
        let tca = l.dot(&ray.direction);
        let d2 = l.dot(&l) - tca * tca;

        if d2 > self.radius2 {
            return None;
        }

        let thc = (self.radius2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;

        let t = if t0 < 0.0 { t1 } else { t0 };
        if t < 0.0 {
            return None;
        }

        Some(t)
    }

    fn normal_at(&self, point: Vector3) -> Result<Vector3, Error> {
        (point - self.center).normalize()
    }

    fn material(&self) -> &Material {
        &self.material
    }

    fn translate(&mut self, offset: Vector3) {
        self.center = self.center + offset;
    }
}

#[cfg(test)]
fn toward_negative_z() -> Ray {
    Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0))
}

#[test]
fn ray_pierces_sphere() {
    let s = Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Default::default());

    assert_eq!(s.intersect(&toward_negative_z(), f64::MAX), Some(4.0));
}

#[test]
fn hit_distance_is_center_distance_minus_radius() {
    let r = toward_negative_z();

    for &(distance, radius) in [(5.0, 1.0), (16.0, 4.0), (100.0, 0.5)].iter() {
        let s = Sphere::new(Vector3::new(0.0, 0.0, -distance), radius,
            Default::default());
        let t = s.intersect(&r, f64::MAX).unwrap();

        assert!(crate::feq(t, distance - radius));
    }
}

#[test]
fn ray_is_tangent_to_sphere() {
    let r = Ray::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
    let s = Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Default::default());

    assert_eq!(s.intersect(&r, f64::MAX), Some(5.0));
}

#[test]
fn ray_misses_sphere() {
    let r = Ray::new(Vector3::new(0.0, 2.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
    let s = Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Default::default());

    assert_eq!(s.intersect(&r, f64::MAX), None);
}

#[test]
fn ray_is_inside_sphere() {
    let s = Sphere::unit();

    assert_eq!(s.intersect(&toward_negative_z(), f64::MAX), Some(1.0));
}

#[test]
fn sphere_is_behind_ray() {
    let s = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, Default::default());

    assert_eq!(s.intersect(&toward_negative_z(), f64::MAX), None);
}

#[test]
fn max_distance_does_not_reject_hits() {
    let s = Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Default::default());

    assert_eq!(s.intersect(&toward_negative_z(), 1.0), Some(4.0));
}

#[test]
fn set_radius_updates_cached_square() {
    let mut s = Sphere::unit();
    s.translate(Vector3::new(0.0, 0.0, -5.0));
    s.set_radius(2.0);

    assert_eq!(s.radius(), 2.0);
    assert_eq!(s.intersect(&toward_negative_z(), f64::MAX), Some(3.0));
}

#[test]
fn normal_on_sphere_nonaxial() {
    let s = Sphere::unit();
    let k = 3.0f64.sqrt() / 3.0;
    let n = s.normal_at(Vector3::new(k, k, k)).unwrap();

    assert_eq!(n, Vector3::new(k, k, k));
}

#[test]
fn normal_at_center_is_degenerate() {
    let s = Sphere::unit();

    assert!(s.normal_at(Vector3::zero()).is_err());
}

#[test]
fn material_accessors() {
    let m = crate::light::Material::new(
        Vector3::new(0.9, 0.1, 0.2),
        Vector3::new(255.0, 128.0, 255.0),
        10.0,
    );
    let s = Sphere::new(Vector3::zero(), 1.0, m);

    assert_eq!(s.albedo(), Vector3::new(0.9, 0.1, 0.2));
    assert_eq!(s.diffuse_color(), Vector3::new(255.0, 128.0, 255.0));
    assert_eq!(s.specular_exponent(), 10.0);
}
