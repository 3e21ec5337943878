// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod onb;
pub mod optics;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;

/// Smallest ray parameter accepted for secondary rays, avoids self intersection.
pub const T_MIN: f32 = 0.01;

/// Threshold below which a ray is treated as parallel to a triangle plane.
pub const SMALL_NUMBER: f32 = 0.0001;
