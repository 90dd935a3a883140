pub mod consts;
pub mod error;

pub mod vector;
pub mod ray;
pub mod light;

pub mod geometry;
pub mod scene;
pub mod trace;
pub mod camera;

pub mod color;
pub mod canvas;
pub mod render;

pub mod config;

pub use error::Error;

use consts::FEQ_EPSILON;

/// Approximate floating point equality.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
