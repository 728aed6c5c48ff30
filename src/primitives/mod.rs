//! Floating-point geometric value types.
//!
//! These are the coordinate, offset and segment types every other module
//! builds on. All of them are `Copy` and generic over `f32` / `f64`.

mod point2;
mod segment2;
mod vec2;

pub use point2::Point2;
pub use segment2::Segment2;
pub use vec2::Vec2;
