//! Host-loop glue: one camera driving one progressive renderer.

use crate::camera::DragEvent;
use crate::config::{ConfigError, HorizonConfig};
use crate::{Camera, ImageBuffer, ProgressiveRenderer};

/// A running visualization: input goes in, a progressively refined frame comes out.
pub struct Session {
    camera: Camera,
    renderer: ProgressiveRenderer,
    rows_per_step: u32,
    parallel: bool,
}

impl Session {
    pub fn new(config: &HorizonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let camera = Camera::from_config(&config.camera, &config.scene)?;
        let renderer = ProgressiveRenderer::new(config.render.clone(), config.scene)?;

        Ok(Self {
            camera,
            renderer,
            rows_per_step: config.render.rows_per_step,
            parallel: false,
        })
    }

    /// Render each step's rows on the rayon pool instead of the calling thread.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn handle_event(&mut self, event: DragEvent) {
        self.camera.handle_event(event);
    }

    /// One host frame: restart on camera change, then render the next batch.
    ///
    /// Returns true when the frame buffer was written.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.camera.update(dt);

        if self.camera.consume_dirty() {
            self.renderer.start();
        }

        if !self.renderer.is_active() {
            return false;
        }

        if self.parallel {
            self.renderer.step_parallel(&self.camera, self.rows_per_step);
        } else {
            self.renderer.step(&self.camera, self.rows_per_step);
        }
        true
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &ProgressiveRenderer {
        &self.renderer
    }

    pub fn frame(&self) -> &ImageBuffer {
        self.renderer.frame()
    }
}
