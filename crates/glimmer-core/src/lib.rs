//! Glimmer Core - Core types shared across the glimmer crates
//!
//! This crate provides the small value types the decoder and renderer agree on:
//! - Mathematical primitives (re-exported from glam)
//! - Bounding spheres derived from vertex positions
//! - Mesh placement in view space

pub mod types;

pub use glam::{Mat4, Vec2, Vec3};
pub use types::{BoundingSphere, Placement};
