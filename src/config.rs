use std::fs;
use std::path::Path;

use serde::{ Serialize, Deserialize };
use tracing::debug;

use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, FIELD_OF_VIEW };
use crate::error::Error;
use crate::vector::Vector3;
use crate::light::{ Light, Material };
use crate::geometry::{ Geometry, Sphere };
use crate::scene::Scene;
use crate::camera::Camera;

/// A scene description, as read from JSON.
///
/// ```json
/// {
///   "width": 1024, "height": 768, "field_of_view": 1.5707963,
///   "objects": [
///     { "type": "sphere", "center": [-3, 0, -16], "radius": 4,
///       "material": { "albedo": [0, 0.4, 0.9],
///                     "diffuse_color": [255, 255, 255],
///                     "specular_exponent": 50 } }
///   ],
///   "lights": [ { "position": [-20, 20, 20], "intensity": 1.5 } ],
///   "animation": { "object": 0, "step": [1, 0, 0] }
/// }
/// ```
///
/// Everything but `objects` is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_width")]
    pub width: usize,

    #[serde(default = "default_height")]
    pub height: usize,

    /// Vertical field of view, in radians.
    #[serde(default = "default_field_of_view")]
    pub field_of_view: f64,

    pub objects: Vec<ObjectConfig>,

    #[serde(default)]
    pub lights: Vec<Light>,

    /// How the scene moves between frames. `null` keeps it still.
    #[serde(default = "default_animation")]
    pub animation: Option<Animation>,
}

/// One primitive in a scene description, tagged by `"type"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectConfig {
    Sphere {
        center: Vector3,
        radius: f64,
        material: Material,
    },
}

/// Translates one object by a fixed step after every frame.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub object: usize,
    pub step: Vector3,
}

impl Default for Animation {
    fn default() -> Animation {
        Animation { object: 0, step: Vector3::new(1.0, 0.0, 0.0) }
    }
}

fn default_width() -> usize { CANVAS_WIDTH }
fn default_height() -> usize { CANVAS_HEIGHT }
fn default_field_of_view() -> f64 { FIELD_OF_VIEW }
fn default_animation() -> Option<Animation> { Some(Default::default()) }

impl From<&ObjectConfig> for Box<dyn Geometry> {
    fn from(config: &ObjectConfig) -> Box<dyn Geometry> {
        match *config {
            ObjectConfig::Sphere { center, radius, material } =>
                Box::new(Sphere::new(center, radius, material)),
        }
    }
}

impl SceneConfig {
    /// Reads and validates a scene description file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<SceneConfig, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading scene");

        let content = fs::read_to_string(path)?;
        SceneConfig::from_json(&content)
    }

    /// Parses and validates a scene description.
    pub fn from_json(json: &str) -> Result<SceneConfig, Error> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    /// The three-sphere, three-light demonstration scene.
    pub fn demo() -> SceneConfig {
        let sphere = |center: [f64; 3], radius: f64, albedo: [f64; 3],
            diffuse_color: [f64; 3], specular_exponent: f64| {
            ObjectConfig::Sphere {
                center: center.into(),
                radius,
                material: Material::new(
                    albedo.into(), diffuse_color.into(), specular_exponent
                ),
            }
        };

        SceneConfig {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            field_of_view: FIELD_OF_VIEW,
            objects: vec![
                sphere([-3.0, 0.0, -16.0], 4.0, [0.0, 0.4, 0.9],
                    [255.0, 255.0, 255.0], 50.0),
                sphere([9.0, 1.0, -16.0], 7.0, [0.9, 0.1, 0.2],
                    [255.0, 128.0, 255.0], 10.0),
                sphere([-8.0, 5.0, -16.0], 2.0, [0.4, 0.5, 0.4],
                    [0.0, 128.0, 0.0], 100.0),
            ],
            lights: vec![
                Light::new(Vector3::new(-20.0, 20.0, 20.0), 1.5),
                Light::new(Vector3::new(30.0, 50.0, -25.0), 1.3),
                Light::new(Vector3::new(30.0, 20.0, 30.0), 0.7),
            ],
            animation: Some(Default::default()),
        }
    }

    /// Rejects values the renderer can't work with.
    ///
    /// The tracer itself never validates; this is the only gate.
    pub fn validate(&self) -> Result<(), Error> {
        if self.width < 2 || self.height < 2 {
            return Err(invalid(format!(
                "image must be at least 2x2, got {}x{}", self.width, self.height
            )));
        }

        if !(self.field_of_view > 0.0 && self.field_of_view < std::f64::consts::PI) {
            return Err(invalid(format!(
                "field of view must be between 0 and pi, got {}", self.field_of_view
            )));
        }

        for (i, obj) in self.objects.iter().enumerate() {
            match obj {
                ObjectConfig::Sphere { center, radius, material } => {
                    check_finite(center, &format!("object {} center", i))?;
                    if !(*radius > 0.0) || !radius.is_finite() {
                        return Err(invalid(format!(
                            "object {} radius must be positive, got {}", i, radius
                        )));
                    }
                    check_material(material, i)?;
                }
            }
        }

        for (i, light) in self.lights.iter().enumerate() {
            check_finite(&light.position, &format!("light {} position", i))?;
            if !(light.intensity >= 0.0) || !light.intensity.is_finite() {
                return Err(invalid(format!(
                    "light {} intensity must be non-negative, got {}",
                    i, light.intensity
                )));
            }
        }

        if let Some(anim) = self.animation {
            check_finite(&anim.step, "animation step")?;
            if !self.objects.is_empty() && anim.object >= self.objects.len() {
                return Err(invalid(format!(
                    "animation targets object {}, but there are only {}",
                    anim.object, self.objects.len()
                )));
            }
        }

        Ok(())
    }

    /// Builds the scene the renderer traces.
    pub fn scene(&self) -> Scene {
        Scene::new(
            self.objects.iter().map(Box::<dyn Geometry>::from).collect(),
            self.lights.clone(),
        )
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.width, self.height, self.field_of_view)
    }

    /// Applies one animation step to a scene built from this config.
    pub fn animate(&self, scene: &mut Scene) {
        if let Some(anim) = self.animation {
            if let Some(obj) = scene.object_mut(anim.object) {
                obj.translate(anim.step);
            }
        }
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidScene(msg)
}

fn check_finite(v: &Vector3, what: &str) -> Result<(), Error> {
    if v.x.is_finite() && v.y.is_finite() && v.z.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{} must be finite", what)))
    }
}

fn check_material(m: &Material, i: usize) -> Result<(), Error> {
    check_finite(&m.albedo, &format!("object {} albedo", i))?;
    check_finite(&m.diffuse_color, &format!("object {} diffuse color", i))?;

    if !(m.specular_exponent > 0.0) || !m.specular_exponent.is_finite() {
        return Err(invalid(format!(
            "object {} specular exponent must be positive, got {}",
            i, m.specular_exponent
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::Ray;

    const MINIMAL: &str = r#"{
        "objects": [
            { "type": "sphere", "center": [0, 0, -5], "radius": 1,
              "material": { "albedo": [1, 0, 0],
                            "diffuse_color": [255, 0, 0],
                            "specular_exponent": 50 } }
        ],
        "lights": [ { "position": [0, 0, 0], "intensity": 1 } ]
    }"#;

    #[test]
    fn minimal_scene_uses_defaults() {
        let config = SceneConfig::from_json(MINIMAL).unwrap();

        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 768);
        assert_eq!(config.field_of_view, std::f64::consts::FRAC_PI_2);
        assert_eq!(config.animation, Some(Animation::default()));
        assert_eq!(config.objects.len(), 1);
    }

    #[test]
    fn built_scene_is_traceable() {
        let scene = SceneConfig::from_json(MINIMAL).unwrap().scene();
        let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

        assert_eq!(scene.intersect(&r).unwrap().distance, 4.0);
        assert_eq!(scene.lights.len(), 1);
    }

    #[test]
    fn null_animation_keeps_scene_still() {
        let json = r#"{ "objects": [], "animation": null }"#;
        let config = SceneConfig::from_json(json).unwrap();

        assert_eq!(config.animation, None);
    }

    #[test]
    fn animate_translates_target_object() {
        let config = SceneConfig::from_json(MINIMAL).unwrap();
        let mut scene = config.scene();
        config.animate(&mut scene);
        config.animate(&mut scene);

        // The sphere slid two units right; a ray along the old axis misses.
        let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
        assert!(scene.intersect(&r).is_none());
    }

    #[test]
    fn unknown_object_type_is_rejected() {
        let json = r#"{ "objects": [ { "type": "torus" } ] }"#;

        assert!(matches!(SceneConfig::from_json(json), Err(Error::Json(_))));
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let json = MINIMAL.replace("\"radius\": 1", "\"radius\": 0");

        assert!(matches!(SceneConfig::from_json(&json),
            Err(Error::InvalidScene(_))));
    }

    #[test]
    fn non_positive_specular_exponent_is_rejected() {
        let json = MINIMAL.replace("\"specular_exponent\": 50",
            "\"specular_exponent\": -1");

        assert!(matches!(SceneConfig::from_json(&json),
            Err(Error::InvalidScene(_))));
    }

    #[test]
    fn negative_intensity_is_rejected() {
        let json = MINIMAL.replace("\"intensity\": 1", "\"intensity\": -0.5");

        assert!(matches!(SceneConfig::from_json(&json),
            Err(Error::InvalidScene(_))));
    }

    #[test]
    fn animation_out_of_range_is_rejected() {
        let mut config = SceneConfig::demo();
        config.animation = Some(Animation { object: 3, step: Vector3::zero() });

        assert!(matches!(config.validate(), Err(Error::InvalidScene(_))));
    }

    #[test]
    fn tiny_image_is_rejected() {
        let mut config = SceneConfig::demo();
        config.height = 1;

        assert!(matches!(config.validate(), Err(Error::InvalidScene(_))));
    }

    #[test]
    fn demo_scene_is_valid() {
        let config = SceneConfig::demo();

        assert!(config.validate().is_ok());
        assert_eq!(config.scene().objects.len(), 3);
        assert_eq!(config.camera(), Camera::new(1024, 768, FIELD_OF_VIEW));
    }

    #[test]
    fn demo_round_trips_through_json() {
        let config = SceneConfig::demo();
        let json = serde_json::to_string(&config).unwrap();

        assert_eq!(SceneConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn load_missing_file() {
        let result = SceneConfig::load("/nonexistent/scene.json");

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join("sphere_tracer_test_scene.json");
        std::fs::write(&path, MINIMAL).unwrap();

        let config = SceneConfig::load(&path).unwrap();
        assert_eq!(config.lights[0].intensity, 1.0);

        let _ = std::fs::remove_file(&path);
    }
}
