use tracing::trace;

use crate::consts::{ BACKGROUND, MAX_RECURSION_DEPTH, REFLECT_EPSILON };
use crate::color::{ Color, Rgb };
use crate::ray::Ray;
use crate::scene::{ Scene, Hit };

pub use crate::vector::reflect;

/// Computes the color seen along a ray.
///
/// Misses and rays past `MAX_RECURSION_DEPTH` see the background. Otherwise
/// the hit is shaded with one mirrored bounce plus Phong-style diffuse and
/// specular terms summed over every light, each weighted by the surface's
/// albedo.
///
/// Recursion is plain call recursion, at most `MAX_RECURSION_DEPTH + 1`
/// levels deep. Nothing outside the arguments is read or written.
pub fn cast_ray(ray: &Ray, scene: &Scene, depth: usize) -> Rgb {
    if depth > MAX_RECURSION_DEPTH {
        return BACKGROUND;
    }

    let hit = match scene.intersect(ray) {
        Some(hit) => hit,
        None => return BACKGROUND,
    };

    let reflected = reflected_color(ray, &hit, scene, depth);
    let (diffuse, specular) = light_intensities(ray, &hit, scene);

    let obj = hit.object;
    let albedo = obj.albedo();

    let color = Color::from(obj.diffuse_color()) * diffuse * albedo.x
        + Color::white() * specular * albedo.y
        + Color::from(reflected) * albedo.z;

    color.to_rgb()
}

/// Follows the mirror bounce off a hit.
///
/// The bounce starts slightly off the surface, on whichever side the
/// reflected ray is heading, so it can't immediately hit the same surface.
fn reflected_color(ray: &Ray, hit: &Hit, scene: &Scene, depth: usize) -> Rgb {
    let direction = match reflect(&ray.direction, &hit.normal).normalize() {
        Ok(d) => d,
        Err(e) => {
            trace!(point = ?hit.point, "no reflection: {}", e);
            return BACKGROUND;
        }
    };

    let offset = hit.normal * REFLECT_EPSILON;
    let origin = if direction.dot(&hit.normal) < 0.0 {
        hit.point - offset
    } else {
        hit.point + offset
    };

    cast_ray(&Ray::new(origin, direction), scene, depth + 1)
}

/// Sums scalar diffuse and specular intensity over all lights.
///
/// A light sitting exactly on the hit point has no direction and adds
/// nothing.
fn light_intensities(ray: &Ray, hit: &Hit, scene: &Scene) -> (f64, f64) {
    let exponent = hit.object.specular_exponent();
    let mut diffuse = 0.0;
    let mut specular = 0.0;

    for light in scene.lights.iter() {
        let light_dir = match (light.position - hit.point).normalize() {
            Ok(d) => d,
            Err(e) => {
                trace!(light = ?light.position, "skipping light: {}", e);
                continue;
            }
        };

        diffuse += light.intensity * light_dir.dot(&hit.normal).max(0.0);

        let highlight = -reflect(&-light_dir, &hit.normal);
        specular += light.intensity
            * highlight.dot(&ray.direction).max(0.0).powf(exponent);
    }

    (diffuse, specular)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::Error;
    use crate::vector::Vector3;
    use crate::light::{ Light, Material };
    use crate::geometry::{ Geometry, Sphere };

    fn forward() -> Ray {
        Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0))
    }

    fn sphere(center: Vector3, radius: f64, material: Material)
        -> Box<dyn Geometry> {
        Box::new(Sphere::new(center, radius, material))
    }

    /// A sphere that counts how often it is intersected.
    #[derive(Debug)]
    struct CountingSphere {
        inner: Sphere,
        calls: Rc<Cell<usize>>,
    }

    impl Geometry for CountingSphere {
        fn intersect(&self, ray: &Ray, max_distance: f64) -> Option<f64> {
            self.calls.set(self.calls.get() + 1);
            self.inner.intersect(ray, max_distance)
        }

        fn normal_at(&self, point: Vector3) -> Result<Vector3, Error> {
            self.inner.normal_at(point)
        }

        fn material(&self) -> &Material {
            self.inner.material()
        }

        fn translate(&mut self, offset: Vector3) {
            self.inner.translate(offset)
        }
    }

    #[test]
    fn empty_scene_is_background() {
        let scene = Scene::empty();

        assert_eq!(cast_ray(&forward(), &scene, 0), BACKGROUND);
        assert_eq!(BACKGROUND, Rgb::new(128, 200, 255));
    }

    #[test]
    fn ray_away_from_geometry_is_background() {
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, Default::default())],
            vec![Light::new(Vector3::new(0.0, 5.0, 0.0), 1.0)],
        );
        let away = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

        assert_eq!(cast_ray(&away, &scene, 0), BACKGROUND);
    }

    #[test]
    fn beyond_max_depth_is_background() {
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, Default::default())],
            vec![Light::new(Vector3::zero(), 1.0)],
        );

        assert_eq!(cast_ray(&forward(), &scene, MAX_RECURSION_DEPTH + 1),
            BACKGROUND);
    }

    #[test]
    fn head_on_diffuse_only() {
        // Light behind the eye; the normal faces it exactly.
        let material = Material::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(200.0, 100.0, 50.0),
            50.0,
        );
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, material)],
            vec![Light::new(Vector3::zero(), 1.0)],
        );

        assert_eq!(cast_ray(&forward(), &scene, 0), Rgb::new(200, 100, 50));
    }

    #[test]
    fn head_on_specular_saturates() {
        let material = Material::new(
            Vector3::new(0.0, 1.0, 0.0), Vector3::zero(), 10.0,
        );
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, material)],
            vec![Light::new(Vector3::zero(), 0.5)],
        );

        assert_eq!(cast_ray(&forward(), &scene, 0), Rgb::new(127, 127, 127));
    }

    #[test]
    fn intensities_sum_across_lights() {
        let material = Material::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(100.0, 100.0, 100.0),
            50.0,
        );
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, material)],
            vec![
                Light::new(Vector3::zero(), 0.5),
                Light::new(Vector3::new(0.0, 0.0, 10.0), 0.75),
            ],
        );

        assert_eq!(cast_ray(&forward(), &scene, 0), Rgb::new(125, 125, 125));
    }

    #[test]
    fn light_behind_surface_adds_nothing() {
        let material = Material::new(
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(255.0, 255.0, 255.0),
            50.0,
        );
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, material)],
            vec![Light::new(Vector3::new(0.0, 0.0, -20.0), 1.0)],
        );

        assert_eq!(cast_ray(&forward(), &scene, 0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn light_on_hit_point_is_skipped() {
        let material = Material::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(255.0, 255.0, 255.0),
            50.0,
        );
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, material)],
            vec![
                Light::new(Vector3::new(0.0, 0.0, -4.0), 1.0),
                Light::new(Vector3::zero(), 0.5),
            ],
        );

        assert_eq!(cast_ray(&forward(), &scene, 0), Rgb::new(127, 127, 127));
    }

    #[test]
    fn mirror_shows_background() {
        // A pure mirror facing the eye reflects straight back into the sky.
        let material = Material::new(
            Vector3::new(0.0, 0.0, 1.0), Vector3::zero(), 50.0,
        );
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, material)],
            Vec::new(),
        );

        assert_eq!(cast_ray(&forward(), &scene, 0), BACKGROUND);
    }

    #[test]
    fn partial_mirror_scales_reflection() {
        let material = Material::new(
            Vector3::new(0.0, 0.0, 0.5), Vector3::zero(), 50.0,
        );
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, material)],
            Vec::new(),
        );

        assert_eq!(cast_ray(&forward(), &scene, 0), Rgb::new(64, 100, 127));
    }

    #[test]
    fn recursion_is_bounded_inside_a_mirror() {
        // Every bounce inside a closed mirror hits the wall again.
        let calls = Rc::new(Cell::new(0));
        let inner = Sphere::new(
            Vector3::zero(),
            10.0,
            Material::new(Vector3::new(0.0, 0.0, 1.0), Vector3::zero(), 50.0),
        );
        let counting: Box<dyn Geometry> =
            Box::new(CountingSphere { inner, calls: Rc::clone(&calls) });
        let scene = Scene::new(
            vec![counting],
            Vec::new(),
        );

        let color = cast_ray(&forward(), &scene, 0);

        assert_eq!(calls.get(), MAX_RECURSION_DEPTH + 1);
        assert_eq!(color, BACKGROUND);
    }

    #[test]
    fn components_never_exceed_255() {
        let material = Material::new(
            Vector3::new(3.0, 4.0, 2.0),
            Vector3::new(255.0, 255.0, 255.0),
            1.0,
        );
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, material)],
            vec![
                Light::new(Vector3::zero(), 5.0),
                Light::new(Vector3::new(2.0, 2.0, 0.0), 5.0),
            ],
        );

        let c = cast_ray(&forward(), &scene, 0);
        assert_eq!(c, Rgb::new(255, 255, 255));
    }

    #[test]
    fn negative_albedo_clamps_at_zero() {
        let material = Material::new(
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(255.0, 255.0, 255.0),
            50.0,
        );
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -5.0), 1.0, material)],
            vec![Light::new(Vector3::zero(), 1.0)],
        );

        assert_eq!(cast_ray(&forward(), &scene, 0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn hit_at_world_origin_is_shaded() {
        let material = Material::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(10.0, 20.0, 30.0),
            50.0,
        );
        let scene = Scene::new(
            vec![sphere(Vector3::new(0.0, 0.0, -1.0), 1.0, material)],
            vec![Light::new(Vector3::new(0.0, 0.0, 5.0), 1.0)],
        );
        let r = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));

        assert_eq!(cast_ray(&r, &scene, 0), Rgb::new(10, 20, 30));
    }
}
