//! The dynamic actor moved by the player controller.
//!
//! An [`Actor`] is a plain owned struct: position (top-left of its bounding
//! box), velocity, constant size, and the `grounded` flag written by the
//! collision resolver. It derives [`Component`] so the game shell can keep it
//! on an entity, but nothing in the core depends on the ECS.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

use crate::components::boxcollider::BoxCollider;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    /// Top-left corner of the bounding box in world units.
    pub position: Vector2,
    /// Velocity in world units per second.
    pub velocity: Vector2,
    /// Bounding box width and height. Constant for the actor's lifetime.
    pub size: Vector2,
    /// True only if the last collision pass pushed the actor upward.
    pub grounded: bool,
}

impl Actor {
    /// Create an airborne actor at rest at `spawn`.
    pub fn new(spawn: Vector2, size: Vector2) -> Self {
        Self {
            position: spawn,
            velocity: Vector2::zero(),
            size,
            grounded: false,
        }
    }

    /// Collider matching the actor's bounding box.
    pub fn collider(&self) -> BoxCollider {
        BoxCollider::new(self.size.x, self.size.y)
    }

    /// Returns (min, max) of the actor's world-space bounding box.
    pub fn aabb(&self) -> (Vector2, Vector2) {
        self.collider().aabb(self.position)
    }

    /// Bottom edge of the bounding box.
    pub fn bottom(&self) -> f32 {
        self.aabb().1.y
    }
}
