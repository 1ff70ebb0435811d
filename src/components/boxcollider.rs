//! Axis-aligned box collider for actors.
//!
//! The collider is positioned relative to the actor's top-left corner and
//! resolved against tile cells by
//! [`resolve_tile_collisions`](crate::systems::collision::resolve_tile_collisions).

use raylib::prelude::Vector2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub size: Vector2,
    pub offset: Vector2,
}

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vector2::new(width, height),
            offset: Vector2::zero(),
        }
    }

    /// Modify BoxCollider with given offset from the actor position
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_offset(mut self, offset: Vector2) -> Self {
        self.offset = offset;
        self
    }

    /// Returns (min, max) of the collider AABB for a given actor position.
    /// Handles negative size by normalizing to proper min/max.
    pub fn aabb(&self, position: Vector2) -> (Vector2, Vector2) {
        let p0 = position + self.offset;
        let p1 = p0 + self.size;
        let min = Vector2::new(p0.x.min(p1.x), p0.y.min(p1.y));
        let max = Vector2::new(p0.x.max(p1.x), p0.y.max(p1.y));
        (min, max)
    }

    /// Per-axis penetration depth against a world-space rectangle.
    ///
    /// Both components are positive when the boxes overlap; returns `None`
    /// otherwise (including when any coordinate is not finite).
    pub fn penetration(
        &self,
        position: Vector2,
        rect_min: Vector2,
        rect_max: Vector2,
    ) -> Option<Vector2> {
        let (min, max) = self.aabb(position);
        let depth_x = max.x.min(rect_max.x) - min.x.max(rect_min.x);
        let depth_y = max.y.min(rect_max.y) - min.y.max(rect_min.y);
        // NaN fails both comparisons
        if depth_x > 0.0 && depth_y > 0.0 {
            Some(Vector2::new(depth_x, depth_y))
        } else {
            None
        }
    }

    /// World-space center of the collider.
    pub fn center(&self, position: Vector2) -> Vector2 {
        let (min, max) = self.aabb(position);
        Vector2::new((min.x + max.x) * 0.5, (min.y + max.y) * 0.5)
    }
}
