//! Per-pixel ray casting and the whole-frame driver.
//!
//! Every driver (whole frame, progressive, parallel progressive) goes through
//! [`ScanlineTracer`], so they produce identical pixels for the same camera.

use horizon_math::{Ray, Vec3};

use crate::intersect::{intersect_disk, intersect_sphere};
use crate::shading::{shade_disk, HORIZON_COLOR};
use crate::{Basis, Camera, ImageBuffer, RenderConfig, Rgb, SceneConfig};

/// What a primary ray sees first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// Absorbed by the black hole
    Horizon,
    /// Hits the accretion disk at this point
    Disk(Vec3),
    /// Escapes the scene
    Background,
}

/// Resolve which surface a ray sees.
///
/// The black hole wins only when it is strictly nearer than the disk, so a
/// tie at equal distance shows the disk.
pub fn classify(ray: &Ray, scene: &SceneConfig) -> Surface {
    let t_bh = intersect_sphere(ray, scene.black_hole_radius);
    let t_disk = intersect_disk(ray, scene.disk_inner_radius, scene.disk_outer_radius);
    composite(ray, t_bh, t_disk)
}

/// Compositing rule over precomputed hit distances.
pub fn composite(ray: &Ray, t_bh: Option<f32>, t_disk: Option<f32>) -> Surface {
    match (t_bh, t_disk) {
        (Some(_), None) => Surface::Horizon,
        (Some(t_bh), Some(t_disk)) if t_bh < t_disk => Surface::Horizon,
        (_, Some(t_disk)) => Surface::Disk(ray.at(t_disk)),
        (None, None) => Surface::Background,
    }
}

/// Compute the color seen by a ray.
pub fn ray_color(ray: &Ray, scene: &SceneConfig, background: Rgb) -> Rgb {
    match classify(ray, scene) {
        Surface::Horizon => HORIZON_COLOR,
        Surface::Disk(point) => shade_disk(point, scene),
        Surface::Background => background,
    }
}

/// Render a single pixel of a `config.width x config.height` image.
pub fn render_pixel(
    camera: &Camera,
    scene: &SceneConfig,
    config: &RenderConfig,
    x: u32,
    y: u32,
) -> Rgb {
    let ray = camera.get_ray(x, y, config.width, config.height);
    ray_color(&ray, scene, config.background)
}

/// Camera state frozen for one batch of scanlines.
///
/// The position and basis are computed once per batch rather than per pixel.
pub(crate) struct ScanlineTracer<'a> {
    camera: &'a Camera,
    scene: &'a SceneConfig,
    basis: Basis,
    origin: Vec3,
    width: u32,
    height: u32,
    background: Rgb,
}

impl<'a> ScanlineTracer<'a> {
    pub(crate) fn new(camera: &'a Camera, scene: &'a SceneConfig, config: &RenderConfig) -> Self {
        Self {
            camera,
            scene,
            basis: camera.basis_vectors(),
            origin: camera.position(),
            width: config.width,
            height: config.height,
            background: config.background,
        }
    }

    pub(crate) fn trace_pixel(&self, x: u32, y: u32) -> Rgb {
        let direction = self
            .camera
            .ray_direction_in(&self.basis, x, y, self.width, self.height);
        ray_color(&Ray::new(self.origin, direction), self.scene, self.background)
    }

    /// Fill one scanline. `row.len()` must equal the image width.
    pub(crate) fn trace_row(&self, y: u32, row: &mut [Rgb]) {
        for (x, pixel) in row.iter_mut().enumerate() {
            *pixel = self.trace_pixel(x as u32, y);
        }
    }
}

/// Render the entire frame in one call.
///
/// This is the non-progressive entry point, used for stills and as the
/// reference the progressive renderer must match.
pub fn render(camera: &Camera, scene: &SceneConfig, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::filled(config.width, config.height, config.background);
    let tracer = ScanlineTracer::new(camera, scene, config);

    for y in 0..config.height {
        tracer.trace_row(y, image.row_mut(y));
    }

    image
}
