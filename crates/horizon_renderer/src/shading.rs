//! Colors for disk hits.

use horizon_math::{Interval, Vec3};

use crate::{Rgb, SceneConfig};

/// Pixels absorbed by the black hole.
pub const HORIZON_COLOR: Rgb = [0, 0, 0];

/// Warm radial gradient: bright near the inner edge, 20% brightness at the outer edge.
pub fn shade_disk(point: Vec3, scene: &SceneConfig) -> Rgb {
    let r = (point.x * point.x + point.z * point.z).sqrt();
    let band = Interval::new(scene.disk_inner_radius, scene.disk_outer_radius);
    let u = band.normalized(r);

    // Float-to-int casts truncate, matching the 8-bit quantization of the gradient
    let brightness = (255.0 * (1.0 - 0.8 * u)) as u8;
    let b = brightness as f32;
    [brightness, (b * 0.8) as u8, (b * 0.3) as u8]
}
