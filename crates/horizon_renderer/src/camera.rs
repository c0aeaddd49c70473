//! Orbit camera for ray generation and point projection.
//!
//! The camera sits on a sphere of fixed radius around the origin and always
//! looks at it. Mouse drags rotate it in azimuth (`theta`) and elevation
//! (`phi`). Ray generation and projection share one pixel mapping, so
//! `project` exactly inverts `ray_direction`.

use std::f32::consts::FRAC_PI_2;

use horizon_math::{Interval, Ray, Vec3, EPSILON};

use crate::config::{CameraConfig, ConfigError, SceneConfig};

/// Allowed elevation; the poles themselves are reachable.
const PHI_RANGE: Interval = Interval::new(-FRAC_PI_2, FRAC_PI_2);

/// Mouse buttons as reported by the host layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

/// Input the camera understands, already translated from platform events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Press { button: MouseButton },
    Release { button: MouseButton },
    /// Relative cursor motion in pixels
    Motion { dx: f32, dy: f32 },
}

/// Whether the primary button is currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Orthonormal camera frame in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Camera orbiting the world origin.
#[derive(Debug, Clone)]
pub struct Camera {
    radius: f32,
    theta: f32,
    phi: f32,
    fov: f32,
    sensitivity: f32,
    drag: DragState,
    dirty: bool,
}

impl Camera {
    /// Create a camera with the default orbit (radius 50, 60 degree fov).
    pub fn new() -> Self {
        Self::from_parts(CameraConfig::default())
    }

    /// Create a camera from configuration, checking it against the scene.
    pub fn from_config(config: &CameraConfig, scene: &SceneConfig) -> Result<Self, ConfigError> {
        config.validate(scene)?;
        Ok(Self::from_parts(*config))
    }

    fn from_parts(config: CameraConfig) -> Self {
        Self {
            radius: config.radius,
            theta: config.theta,
            phi: PHI_RANGE.clamp(config.phi),
            fov: config.fov_degrees.to_radians(),
            sensitivity: config.sensitivity,
            drag: DragState::Idle,
            dirty: false,
        }
    }

    /// Set the orbit directly (e.g. for scripted views), marking the camera dirty.
    pub fn with_orbit(mut self, radius: f32, theta: f32, phi: f32) -> Self {
        self.radius = radius;
        self.theta = theta;
        self.phi = PHI_RANGE.clamp(phi);
        self.dirty = true;
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    /// Field of view in radians.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Feed one input event through the drag state machine.
    pub fn handle_event(&mut self, event: DragEvent) {
        match (self.drag, event) {
            (DragState::Idle, DragEvent::Press { button: MouseButton::Primary }) => {
                self.drag = DragState::Dragging;
            }
            (DragState::Dragging, DragEvent::Release { button: MouseButton::Primary }) => {
                self.drag = DragState::Idle;
            }
            (DragState::Dragging, DragEvent::Motion { dx, dy }) => {
                self.theta += dx * self.sensitivity;
                // Screen y grows downward; dragging up should look up
                self.phi -= dy * self.sensitivity;
                self.phi = PHI_RANGE.clamp(self.phi);
                self.dirty = true;
            }
            _ => {}
        }
    }

    /// Per-frame time step. The orbit has no time-driven motion.
    pub fn update(&mut self, _dt: f32) {}

    /// Return whether the orientation changed since the last call, and clear it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Cartesian camera position from the spherical orbit.
    pub fn position(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(
            self.radius * cos_phi * cos_theta,
            self.radius * sin_phi,
            self.radius * cos_phi * sin_theta,
        )
    }

    /// Forward/right/up frame looking at the origin.
    ///
    /// At the poles `world_up x forward` vanishes; `right` then falls back to
    /// the azimuth tangent `(-sin theta, 0, cos theta)`, which is the limit of
    /// the regular formula as `phi` approaches +-pi/2.
    pub fn basis_vectors(&self) -> Basis {
        let forward = (-self.position()).normalize();

        let cross = Vec3::Y.cross(forward);
        let right = if cross.length() < EPSILON {
            let (sin_theta, cos_theta) = self.theta.sin_cos();
            Vec3::new(-sin_theta, 0.0, cos_theta)
        } else {
            cross.normalize()
        };

        let up = forward.cross(right);
        Basis { forward, right, up }
    }

    /// Perspective scale: 1 / tan(fov / 2).
    fn focal_scale(&self) -> f32 {
        1.0 / (self.fov / 2.0).tan()
    }

    /// World-space unit direction through the centre of pixel (x, y).
    pub fn ray_direction(&self, x: u32, y: u32, width: u32, height: u32) -> Vec3 {
        self.ray_direction_in(&self.basis_vectors(), x, y, width, height)
    }

    /// Same as [`Camera::ray_direction`] with a precomputed basis.
    pub fn ray_direction_in(&self, basis: &Basis, x: u32, y: u32, width: u32, height: u32) -> Vec3 {
        let x_ndc = 2.0 * (x as f32 + 0.5) / width as f32 - 1.0;
        let y_ndc = 1.0 - 2.0 * (y as f32 + 0.5) / height as f32;

        let scale = self.focal_scale();
        let x_cam = x_ndc / scale;
        let y_cam = y_ndc / scale;

        (basis.right * x_cam + basis.up * y_cam + basis.forward).normalize()
    }

    /// Primary ray for pixel (x, y).
    pub fn get_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        Ray::new(self.position(), self.ray_direction(x, y, width, height))
    }

    /// Project a world point to pixel coordinates (top-left origin).
    ///
    /// Returns `None` for points at or behind the camera plane.
    pub fn project(&self, point: Vec3, width: u32, height: u32) -> Option<(i32, i32)> {
        let basis = self.basis_vectors();
        let rel = point - self.position();

        let x_cam = rel.dot(basis.right);
        let y_cam = rel.dot(basis.up);
        let z_cam = rel.dot(basis.forward);

        if z_cam <= 0.0 {
            return None;
        }

        let scale = self.focal_scale();
        let x_ndc = x_cam / z_cam * scale;
        let y_ndc = y_cam / z_cam * scale;

        let screen_x = ((x_ndc + 1.0) * 0.5 * width as f32).floor();
        let screen_y = ((1.0 - y_ndc) * 0.5 * height as f32).floor();
        Some((screen_x as i32, screen_y as i32))
    }

    /// Overlay text describing the camera position.
    pub fn label(&self) -> String {
        let p = self.position();
        format!("Camera pos: [{:.2}, {:.2}, {:.2}]", p.x, p.y, p.z)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
