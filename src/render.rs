use std::time::Instant;

use tracing::{ debug, info };

use crate::error::Error;
use crate::camera::Camera;
use crate::canvas::PixelSink;
use crate::scene::Scene;
use crate::trace::cast_ray;

/// Polled once per frame to decide whether to keep rendering.
pub trait StopSignal {
    /// Called after each finished frame with the number of frames so far.
    fn should_stop(&mut self, frames_rendered: usize) -> bool;
}

/// Stops after a fixed number of frames.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameLimit(pub usize);

impl StopSignal for FrameLimit {
    fn should_stop(&mut self, frames_rendered: usize) -> bool {
        frames_rendered >= self.0
    }
}

/// Drives the per-pixel loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Renderer {
    pub camera: Camera,
}

impl Renderer {
    pub fn new(camera: Camera) -> Renderer {
        Renderer { camera }
    }

    /// Renders one frame in row-major order, then presents it.
    pub fn render_frame(&self, scene: &Scene, sink: &mut dyn PixelSink)
        -> Result<(), Error> {
        for y in 0..self.camera.height {
            for x in 0..self.camera.width {
                let ray = self.camera.ray_for_pixel(x, y)?;
                sink.set_pixel(x, y, cast_ray(&ray, scene, 0));
            }
        }

        sink.present()
    }

    /// Renders frames until `stop` says otherwise.
    ///
    /// `animate` runs between frames and is the only place the scene may
    /// change. The stop signal is checked after each complete frame; a frame
    /// in progress is never abandoned. Returns the number of frames rendered.
    pub fn run<F>(&self, scene: &mut Scene, sink: &mut dyn PixelSink,
        stop: &mut dyn StopSignal, mut animate: F) -> Result<usize, Error>
    where
        F: FnMut(&mut Scene),
    {
        let mut frames = 0;

        loop {
            debug!(frame = frames, "rendering frame");
            let start = Instant::now();

            self.render_frame(scene, sink)?;
            frames += 1;

            info!(frame = frames - 1, elapsed = ?start.elapsed(), "frame done");

            if stop.should_stop(frames) {
                break;
            }

            animate(scene);
        }

        Ok(frames)
    }
}
