//! Registry for state hook systems.
//!
//! Systems are registered under string keys and looked up later by the game
//! state observer to run via their [`bevy_ecs::system::SystemId`].

use bevy_ecs::prelude::{Resource, World};
use bevy_ecs::system::{IntoSystem, SystemId};
use rustc_hash::FxHashMap;

/// Map of string names to system IDs.
#[derive(Resource, Default)]
pub struct SystemsStore {
    pub map: FxHashMap<String, SystemId>,
}

impl SystemsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        SystemsStore {
            map: FxHashMap::default(),
        }
    }

    /// Insert a system ID under a human-readable name.
    pub fn insert(&mut self, name: impl Into<String>, id: SystemId) {
        self.map.insert(name.into(), id);
    }

    /// Register `system` in `world` and store its ID under `name`.
    pub fn register<M>(
        &mut self,
        world: &mut World,
        name: impl Into<String>,
        system: impl IntoSystem<(), (), M> + 'static,
    ) -> SystemId {
        let id = world.register_system(system);
        self.insert(name, id);
        id
    }

    /// Retrieve a system ID by name, if present.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&SystemId> {
        self.map.get(name.as_ref())
    }
}
