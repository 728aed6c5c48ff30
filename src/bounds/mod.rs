//! Bounding envelopes.

mod aabb;

pub use aabb::Aabb2;
