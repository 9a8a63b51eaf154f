//! Core types used throughout glimmer

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Approximate bounding sphere of a set of points.
///
/// The center is the midpoint of the axis-aligned bounds and the radius is the
/// distance from that center to the max corner. This always encloses every
/// point but is not the minimal enclosing sphere, so it suits view culling and
/// shader use rather than exact collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 0.0,
        }
    }
}

impl BoundingSphere {
    /// Compute the sphere around the given positions in a single pass.
    ///
    /// An empty input yields a sphere at the origin with zero radius.
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a [f32; 3]>) -> Self {
        let mut positions = positions.into_iter();

        let Some(first) = positions.next() else {
            return Self::default();
        };

        let (min, max) = positions.fold(
            (Vec3::from_array(*first), Vec3::from_array(*first)),
            |(min, max), p| {
                let p = Vec3::from_array(*p);
                (min.min(p), max.max(p))
            },
        );

        let center = (min + max) * 0.5;
        Self {
            center,
            radius: (max - center).length(),
        }
    }

    /// Whether a point lies inside the sphere, allowing `epsilon` of slack.
    pub fn contains(&self, point: Vec3, epsilon: f32) -> bool {
        point.distance(self.center) <= self.radius + epsilon
    }
}

/// Local placement of a mesh in view space.
///
/// Only a translation is carried; the default sits two units down -Z so a
/// camera at the origin looking forward sees the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
}

impl Placement {
    pub const DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 0.0, -2.0);

    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Model matrix for this placement.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POSITION)
    }
}
