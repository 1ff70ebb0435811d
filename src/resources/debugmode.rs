//! Debug toggle resource.
//!
//! The presence of this resource enables the collision overlay: actor
//! bounding boxes, the grid cells they touch and their grounded state.

use bevy_ecs::prelude::Resource;

/// Marker resource: when present, the renderer draws the debug overlay.
#[derive(Resource, Clone, Copy, Debug)]
pub struct DebugMode {}
