use crate::EPSILON;

/// A closed range of scalars, used for hit-distance windows and radial bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Position of x inside the interval, 0 at `min` and 1 at `max`, clamped.
    pub fn normalized(&self, x: f32) -> f32 {
        ((x - self.min) / self.size()).clamp(0.0, 1.0)
    }

    /// Valid hit distances: anything strictly past the self-intersection threshold.
    pub const FORWARD: Interval = Interval {
        min: EPSILON,
        max: f32::INFINITY,
    };
}
