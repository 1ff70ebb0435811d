//! Per-frame keyboard input resource.
//!
//! Captures the subset of keyboard state the game cares about and exposes it
//! to systems via the [`InputState`] resource. Movement defaults to A/D with
//! the arrow keys as alternates; jump is Space (or Up/W).
//!
//! The player controller does not read [`InputState`] directly but goes
//! through the [`PlayerIntent`] trait, so tests and replays can feed it any
//! intent source.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with its keyboard bindings.
pub struct BoolState {
    /// Whether the key is currently active/pressed this frame.
    pub active: bool,
    /// Whether the key was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the key was just released this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: KeyboardKey,
    /// Second key bound to the same action, `KEY_NULL` when unused.
    pub alt_binding: KeyboardKey,
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::KEY_NULL, KeyboardKey::KEY_NULL)
    }
}

impl BoolState {
    /// Inactive state bound to `key` and `alt`.
    pub fn bound(key: KeyboardKey, alt: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: key,
            alt_binding: alt,
        }
    }

    /// Update from the raw down state of this frame, deriving edges.
    pub fn update(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

/// What the player asks the actor to do this frame.
pub trait PlayerIntent {
    fn move_left(&self) -> bool;
    fn move_right(&self) -> bool;
    fn jump(&self) -> bool;

    /// -1.0 for left, 1.0 for right, 0.0 for neither or both.
    fn horizontal(&self) -> f32 {
        match (self.move_left(), self.move_right()) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Resource capturing the per-frame keyboard state relevant to gameplay.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub move_left: BoolState,
    pub move_right: BoolState,
    pub jump: BoolState,
    // Control keys
    pub action_back: BoolState,
    pub mode_debug: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            move_left: BoolState::bound(KeyboardKey::KEY_A, KeyboardKey::KEY_LEFT),
            move_right: BoolState::bound(KeyboardKey::KEY_D, KeyboardKey::KEY_RIGHT),
            jump: BoolState::bound(KeyboardKey::KEY_SPACE, KeyboardKey::KEY_UP),
            action_back: BoolState::bound(KeyboardKey::KEY_ESCAPE, KeyboardKey::KEY_NULL),
            mode_debug: BoolState::bound(KeyboardKey::KEY_F11, KeyboardKey::KEY_NULL),
        }
    }
}

impl PlayerIntent for InputState {
    fn move_left(&self) -> bool {
        self.move_left.active
    }

    fn move_right(&self) -> bool {
        self.move_right.active
    }

    fn jump(&self) -> bool {
        self.jump.active
    }
}
