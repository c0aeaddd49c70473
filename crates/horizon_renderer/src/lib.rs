//! Horizon renderer - progressive CPU ray casting of a toy black hole.
//!
//! The scene is an opaque sphere at the origin and a flat accretion disk in
//! the y = 0 plane, seen from a camera orbiting the origin. Frames are built
//! a few scanlines per call so an interactive host stays responsive, and the
//! scan restarts whenever the camera moves.

mod camera;
mod config;
mod frame;
mod intersect;
mod overlay;
mod progressive;
mod renderer;
mod session;
mod shading;

/// An 8-bit RGB pixel.
pub type Rgb = [u8; 3];

pub use camera::{Basis, Camera, DragEvent, DragState, MouseButton};
pub use config::{CameraConfig, ConfigError, HorizonConfig, RenderConfig, SceneConfig};
pub use frame::ImageBuffer;
pub use intersect::{intersect_disk, intersect_sphere};
pub use overlay::{
    draw_disk_outline, draw_line, draw_polyline, ring_points, RING_COLOR, RING_SEGMENTS, RING_WIDTH,
};
pub use progressive::{ProgressiveRenderer, ScanState};
pub use renderer::{classify, composite, ray_color, render, render_pixel, Surface};
pub use session::Session;
pub use shading::{shade_disk, HORIZON_COLOR};

/// Re-export Vec3 and common math types from horizon_math
pub use horizon_math::{Interval, Ray, Vec3};

use thiserror::Error;

/// Errors from building a renderer or exporting its output.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;
