mod aabb;
mod color;
mod ray;

pub use aabb::AABB;
pub use color::{rgb_from_hex, scale_rgb, to_rgba8};
pub use ray::{face_normal, intersect_aabb};
