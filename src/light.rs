use serde::{ Serialize, Deserialize };

use crate::vector::Vector3;

/// A point light.
///
/// Light is emitted equally in all directions from `position`. Intensity is
/// a plain scalar; lights carry no color of their own.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: Vector3,
    pub intensity: f64,
}

impl Light {
    pub fn new(position: Vector3, intensity: f64) -> Light {
        Light { position, intensity }
    }
}

/// Surface reflectance properties.
///
/// `albedo` weights three contributions to the final color: `x` scales the
/// diffuse term, `y` the specular highlight and `z` the mirrored reflection.
/// The weights need not sum to one.
///
/// `diffuse_color` uses the 0 to 255 scale.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub albedo: Vector3,
    pub diffuse_color: Vector3,
    pub specular_exponent: f64,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            albedo: Vector3::new(1.0, 0.0, 0.0),
            diffuse_color: Vector3::new(255.0, 255.0, 255.0),
            specular_exponent: 50.0,
        }
    }
}

impl Material {
    pub fn new(albedo: Vector3, diffuse_color: Vector3,
        specular_exponent: f64) -> Material {
        Material { albedo, diffuse_color, specular_exponent }
    }
}

#[test]
fn deserialize_material() {
    let json = r#"{
        "albedo": [0.0, 0.4, 0.9],
        "diffuse_color": [255, 255, 255],
        "specular_exponent": 50
    }"#;

    let m: Material = serde_json::from_str(json).unwrap();
    assert_eq!(m, Material::new(
        Vector3::new(0.0, 0.4, 0.9),
        Vector3::new(255.0, 255.0, 255.0),
        50.0,
    ));
}

#[test]
fn deserialize_light() {
    let l: Light = serde_json::from_str(
        r#"{ "position": [-20, 20, 20], "intensity": 1.5 }"#
    ).unwrap();

    assert_eq!(l, Light::new(Vector3::new(-20.0, 20.0, 20.0), 1.5));
}
