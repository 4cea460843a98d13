//! glint math - vector algebra and ray primitives.
//!
//! Vectors and points share one type (`Vec3`); `Point3` and `Color` are
//! aliases that document intent at call sites.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// A position in 3D space.
pub type Point3 = Vec3;

/// Linear RGB color, channels nominally in [0, 1].
pub type Color = Vec3;
