use tracing::trace;

use crate::consts::{ FAR_SENTINEL, HIT_CUTOFF };
use crate::vector::Vector3;
use crate::ray::Ray;
use crate::light::Light;
use crate::geometry::Geometry;

/// The objects and lights visible to a render pass.
///
/// Object order matters only for ties: when two surfaces are hit at the same
/// distance, the one listed first wins. A scene is read-only while a frame
/// is being rendered.
#[derive(Debug, Default)]
pub struct Scene {
    pub objects: Vec<Box<dyn Geometry>>,
    pub lights: Vec<Light>,
}

/// The closest surface hit along a ray.
#[derive(Copy, Clone, Debug)]
pub struct Hit<'a> {
    pub distance: f64,
    pub point: Vector3,
    pub normal: Vector3,
    pub object: &'a dyn Geometry,
}

impl Scene {
    /// Creates a scene with no objects and no lights.
    pub fn empty() -> Scene {
        Default::default()
    }

    pub fn new(objects: Vec<Box<dyn Geometry>>, lights: Vec<Light>) -> Scene {
        Scene { objects, lights }
    }

    pub fn object_mut(&mut self, index: usize) -> Option<&mut dyn Geometry> {
        match self.objects.get_mut(index) {
            Some(obj) => Some(&mut **obj),
            None => None,
        }
    }

    /// Finds the nearest surface along a ray.
    ///
    /// Every object is tested in order. Hits beyond `HIT_CUTOFF` are treated
    /// as misses, as are hits whose surface normal can't be computed.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut min_distance = FAR_SENTINEL;

        for obj in self.objects.iter() {
            let distance = match obj.intersect(ray, min_distance) {
                Some(d) if d < min_distance => d,
                _ => continue,
            };

            let point = ray.position(distance);
            let normal = match obj.normal_at(point) {
                Ok(n) => n,
                Err(e) => {
                    trace!(?point, "skipping hit: {}", e);
                    continue;
                }
            };

            min_distance = distance;
            closest = Some(Hit { distance, point, normal, object: &**obj });
        }

        closest.filter(|hit| hit.distance < HIT_CUTOFF)
    }
}

#[cfg(test)]
use crate::geometry::Sphere;
#[cfg(test)]
use crate::light::Material;

#[cfg(test)]
fn tagged_sphere(z: f64, radius: f64, tag: f64) -> Box<dyn Geometry> {
    let material = Material::new(
        Vector3::new(tag, 0.0, 0.0), Vector3::zero(), 1.0
    );

    Box::new(Sphere::new(Vector3::new(0.0, 0.0, z), radius, material))
}

#[cfg(test)]
fn forward() -> Ray {
    Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0))
}

#[test]
fn empty_scene_is_never_hit() {
    assert!(Scene::empty().intersect(&forward()).is_none());
}

#[test]
fn single_sphere_hit() {
    let scene = Scene::new(
        vec![tagged_sphere(-5.0, 1.0, 1.0)],
        vec![Light::new(Vector3::zero(), 1.0)],
    );

    let hit = scene.intersect(&forward()).unwrap();
    assert_eq!(hit.distance, 4.0);
    assert_eq!(hit.point, Vector3::new(0.0, 0.0, -4.0));
    assert_eq!(hit.normal, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn nearest_wins_regardless_of_order() {
    let near_first = Scene::new(
        vec![tagged_sphere(-5.0, 1.0, 1.0), tagged_sphere(-10.0, 3.0, 2.0)],
        Vec::new(),
    );
    let far_first = Scene::new(
        vec![tagged_sphere(-10.0, 3.0, 2.0), tagged_sphere(-5.0, 1.0, 1.0)],
        Vec::new(),
    );

    for scene in [near_first, far_first].iter() {
        let hit = scene.intersect(&forward()).unwrap();
        assert_eq!(hit.distance, 4.0);
        assert_eq!(hit.object.albedo().x, 1.0);
    }
}

#[test]
fn closest_of_many() {
    let objects = (1..=8)
        .map(|i| tagged_sphere(-(i as f64) * 10.0, 1.0, i as f64))
        .rev()
        .collect();
    let scene = Scene::new(objects, Vec::new());

    let hit = scene.intersect(&forward()).unwrap();
    assert_eq!(hit.distance, 9.0);
    assert_eq!(hit.object.albedo().x, 1.0);
}

#[test]
fn equidistant_hits_keep_first_in_order() {
    let scene = Scene::new(
        vec![tagged_sphere(-5.0, 1.0, 1.0), tagged_sphere(-5.0, 1.0, 2.0)],
        Vec::new(),
    );

    let hit = scene.intersect(&forward()).unwrap();
    assert_eq!(hit.object.albedo().x, 1.0);
}

#[test]
fn hits_past_cutoff_are_misses() {
    let scene = Scene::new(vec![tagged_sphere(-20_000.0, 1.0, 1.0)], Vec::new());

    assert!(scene.intersect(&forward()).is_none());
}

#[test]
fn hit_at_world_origin_counts() {
    // The surface passes through the origin; a hit there is still a hit.
    let scene = Scene::new(vec![tagged_sphere(-1.0, 1.0, 1.0)], Vec::new());
    let r = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));

    let hit = scene.intersect(&r).unwrap();
    assert_eq!(hit.point, Vector3::zero());
}

#[test]
fn object_mut_allows_translation() {
    let mut scene = Scene::new(vec![tagged_sphere(-5.0, 1.0, 1.0)], Vec::new());
    scene.object_mut(0).unwrap().translate(Vector3::new(0.0, 0.0, -1.0));

    assert_eq!(scene.intersect(&forward()).unwrap().distance, 5.0);
    assert!(scene.object_mut(1).is_none());
}
