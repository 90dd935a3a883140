use crate::error::Error;
use crate::vector::Vector3;
use crate::ray::Ray;

/// A pinhole camera at the origin looking down the negative Z axis.
///
/// Pixel rows run top to bottom while world Y points up, so the vertical
/// coordinate is flipped when projecting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// The horizontal size of the image, in pixels.
    pub width: usize,

    /// The vertical size of the image, in pixels.
    pub height: usize,

    /// Vertical field of view, in radians.
    pub field_of_view: f64,
}

impl Camera {
    pub fn new(width: usize, height: usize, field_of_view: f64) -> Camera {
        Camera { width, height, field_of_view }
    }

    /// Ray direction through centered pixel coordinates `(i, j)`.
    ///
    /// Coordinates range over `[-width/2, width/2)` and `[-height/2,
    /// height/2)`, and each pixel is sampled half a pixel past its
    /// coordinate, so the optical axis sits at `(-0.5, -0.5)`.
    pub fn direction_for(&self, i: f64, j: f64) -> Result<Vector3, Error> {
        let w = self.width as f64;
        let h = self.height as f64;
        let half_view = (self.field_of_view / 2.0).tan();

        let x = (2.0 * (i + 0.5)) / (w - 1.0) * half_view * w / h;
        let y = -(2.0 * (j + 0.5)) / (h - 1.0) * half_view;

        Vector3::new(x, y, -1.0).normalize()
    }

    /// Primary ray for the pixel at column `x`, row `y` (top-left origin).
    pub fn ray_for_pixel(&self, x: usize, y: usize) -> Result<Ray, Error> {
        let i = x as f64 - (self.width / 2) as f64;
        let j = y as f64 - (self.height / 2) as f64;

        Ok(Ray::new(Vector3::zero(), self.direction_for(i, j)?))
    }
}

#[test]
fn center_maps_to_optical_axis() {
    let cameras = [
        Camera::new(1024, 768, std::f64::consts::FRAC_PI_2),
        Camera::new(201, 101, std::f64::consts::FRAC_PI_3),
        Camera::new(16, 64, 0.25),
    ];

    for c in cameras.iter() {
        assert_eq!(c.direction_for(-0.5, -0.5).unwrap(),
            Vector3::new(0.0, 0.0, -1.0));
    }
}

#[test]
fn directions_are_unit_length() {
    let c = Camera::new(64, 48, std::f64::consts::FRAC_PI_2);

    for &(x, y) in [(0, 0), (63, 47), (10, 40), (32, 24)].iter() {
        let r = c.ray_for_pixel(x, y).unwrap();
        assert!(crate::feq(r.direction.magnitude(), 1.0));
        assert_eq!(r.origin, Vector3::zero());
    }
}

#[test]
fn top_left_looks_up_and_left() {
    let c = Camera::new(201, 101, std::f64::consts::FRAC_PI_2);
    let d = c.ray_for_pixel(0, 0).unwrap().direction;

    assert!(d.x < 0.0);
    assert!(d.y > 0.0);
    assert!(d.z < 0.0);
}

#[test]
fn opposite_pixels_mirror() {
    let c = Camera::new(64, 48, std::f64::consts::FRAC_PI_2);
    let a = c.direction_for(-32.0, -24.0).unwrap();
    let b = c.direction_for(31.0, 23.0).unwrap();

    assert_eq!(a, Vector3::new(-b.x, -b.y, b.z));
}

#[test]
fn edge_of_field_of_view() {
    // A square image with a 90 degree view spans 45 degrees either side at
    // the outermost sample.
    let c = Camera::new(3, 3, std::f64::consts::FRAC_PI_2);
    let d = c.direction_for(0.5, -0.5).unwrap();
    let k = 2.0f64.sqrt() / 2.0;

    assert_eq!(d, Vector3::new(k, 0.0, -k));
}
