//! Startup configuration for the renderer, scene and camera.
//!
//! Every struct deserializes from JSON with per-field defaults, so a config
//! file only needs to name the values it overrides. Values are validated once
//! at construction time; nothing downstream re-checks them mid-scan.

use serde::Deserialize;
use thiserror::Error;

use crate::Rgb;

/// Errors raised when a configuration value cannot produce a valid renderer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image dimensions must be positive, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("image of {width}x{height} pixels is too large to allocate")]
    ImageTooLarge { width: u32, height: u32 },

    #[error("rows per step must be at least 1")]
    ZeroRowsPerStep,

    #[error("black hole radius must be a positive finite number, got {0}")]
    InvalidBlackHoleRadius(f32),

    #[error("disk radii must satisfy 0 <= inner < outer, got inner={inner} outer={outer}")]
    InvalidDiskRadii { inner: f32, outer: f32 },

    #[error("camera radius {radius} must lie outside the black hole (radius {horizon})")]
    CameraInsideHorizon { radius: f32, horizon: f32 },

    #[error("field of view must be within (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),

    #[error("mouse sensitivity must be positive, got {0}")]
    InvalidSensitivity(f32),
}

/// Output image and scan pacing settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Scanlines rendered per progressive step
    pub rows_per_step: u32,
    /// Color for rays that escape the scene
    pub background: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
            rows_per_step: 20,
            background: [25, 25, 45],
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        // The RGBA upload copy is the largest buffer built from these dimensions
        let bytes = self
            .width
            .checked_mul(self.height)
            .and_then(|pixels| usize::try_from(pixels).ok())
            .and_then(|pixels| pixels.checked_mul(4));
        if bytes.is_none() {
            return Err(ConfigError::ImageTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.rows_per_step == 0 {
            return Err(ConfigError::ZeroRowsPerStep);
        }
        Ok(())
    }
}

/// The fixed scene: a black hole at the origin and an accretion disk in y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub black_hole_radius: f32,
    pub disk_inner_radius: f32,
    pub disk_outer_radius: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            black_hole_radius: 1.5,
            disk_inner_radius: 5.0,
            disk_outer_radius: 8.0,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = self.black_hole_radius;
        if !(r.is_finite() && r > 0.0) {
            return Err(ConfigError::InvalidBlackHoleRadius(r));
        }

        let (inner, outer) = (self.disk_inner_radius, self.disk_outer_radius);
        // Written so that NaN radii also fail
        if !(inner >= 0.0 && inner < outer && outer.is_finite()) {
            return Err(ConfigError::InvalidDiskRadii { inner, outer });
        }
        Ok(())
    }
}

/// Initial orbit and input mapping for the camera.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the origin
    pub radius: f32,
    /// Initial azimuth in radians
    pub theta: f32,
    /// Initial polar angle in radians (clamped to [-pi/2, pi/2])
    pub phi: f32,
    /// Field of view in degrees
    pub fov_degrees: f32,
    /// Radians of rotation per pixel of mouse drag
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            theta: 0.0,
            phi: 0.0,
            fov_degrees: 60.0,
            sensitivity: 0.005,
        }
    }
}

impl CameraConfig {
    /// Validate against the scene so the camera never starts inside the sphere.
    pub fn validate(&self, scene: &SceneConfig) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > scene.black_hole_radius) {
            return Err(ConfigError::CameraInsideHorizon {
                radius: self.radius,
                horizon: scene.black_hole_radius,
            });
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidFieldOfView(self.fov_degrees));
        }
        if !(self.sensitivity > 0.0 && self.sensitivity.is_finite()) {
            return Err(ConfigError::InvalidSensitivity(self.sensitivity));
        }
        Ok(())
    }
}

/// Everything a session needs, as loaded from a config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HorizonConfig {
    pub render: RenderConfig,
    pub scene: SceneConfig,
    pub camera: CameraConfig,
}

impl HorizonConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.render.validate()?;
        self.scene.validate()?;
        self.camera.validate(&self.scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(HorizonConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_empty_image_rejected() {
        let config = RenderConfig {
            width: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyImage { width: 0, height: 150 })
        );
    }

    #[test]
    fn test_oversized_image_rejected() {
        let config = RenderConfig {
            width: 65536,
            height: 65536,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ImageTooLarge {
                width: 65536,
                height: 65536
            })
        );

        let config = RenderConfig {
            width: u32::MAX,
            height: 2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn test_zero_rows_rejected() {
        let config = RenderConfig {
            rows_per_step: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroRowsPerStep));
    }

    #[test]
    fn test_inverted_disk_rejected() {
        let scene = SceneConfig {
            disk_inner_radius: 8.0,
            disk_outer_radius: 8.0,
            ..Default::default()
        };
        assert!(matches!(
            scene.validate(),
            Err(ConfigError::InvalidDiskRadii { .. })
        ));

        let scene = SceneConfig {
            disk_inner_radius: f32::NAN,
            ..Default::default()
        };
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_black_hole_radius_rejected() {
        let scene = SceneConfig {
            black_hole_radius: -1.0,
            ..Default::default()
        };
        assert_eq!(
            scene.validate(),
            Err(ConfigError::InvalidBlackHoleRadius(-1.0))
        );
    }

    #[test]
    fn test_camera_inside_horizon_rejected() {
        let scene = SceneConfig::default();
        let camera = CameraConfig {
            radius: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            camera.validate(&scene),
            Err(ConfigError::CameraInsideHorizon { .. })
        ));
    }

    #[test]
    fn test_field_of_view_rejected() {
        let scene = SceneConfig::default();
        let camera = CameraConfig {
            fov_degrees: 180.0,
            ..Default::default()
        };
        assert_eq!(
            camera.validate(&scene),
            Err(ConfigError::InvalidFieldOfView(180.0))
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "render": { "width": 64 }, "scene": { "disk_outer_radius": 12.0 } }"#;
        let config: HorizonConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.render.width, 64);
        assert_eq!(config.render.height, 150);
        assert_eq!(config.scene.disk_outer_radius, 12.0);
        assert_eq!(config.scene.disk_inner_radius, 5.0);
        assert_eq!(config.camera, CameraConfig::default());
    }
}
