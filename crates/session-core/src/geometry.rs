//! World geometry as seen through the session collaborator.

use serde::{Deserialize, Serialize};

/// A point in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance to another point.
    pub fn distance_to(&self, other: Vec3) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// The block containing this point.
    pub fn floored(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }
}

/// Integer coordinates of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Minimum corner of the block in world space.
    pub fn corner(&self) -> Vec3 {
        Vec3::new(self.x as f64, self.y as f64, self.z as f64)
    }

    /// Geometric center of the block.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            self.x as f64 + 0.5,
            self.y as f64 + 0.5,
            self.z as f64 + 0.5,
        )
    }
}

/// A block reported by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Registry name, e.g. `oak_trapdoor`.
    pub name: String,
    pub position: BlockPos,
}

impl Block {
    pub fn new(name: impl Into<String>, position: BlockPos) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// A player entity currently visible to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub username: String,
    pub position: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floored_negative_coordinates() {
        let pos = Vec3::new(-0.5, 63.99, -10.0);
        assert_eq!(pos.floored(), BlockPos::new(-1, 63, -10));
    }

    #[test]
    fn test_block_center() {
        let center = BlockPos::new(1, 2, 3).center();
        assert_eq!(center, Vec3::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn test_distance() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert!((a.distance_to(b) - 5.0).abs() < f64::EPSILON);
    }
}
