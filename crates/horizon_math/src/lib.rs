// Re-export glam for convenience
pub use glam::*;

// Horizon math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// Threshold below which distances and direction components count as zero.
pub const EPSILON: f32 = 1e-6;
