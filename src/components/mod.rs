//! ECS components for entities.
//!
//! Submodules overview:
//! - [`actor`] – position, velocity, size and grounded flag of a moving box
//! - [`boxcollider`] – axis-aligned rectangle math for overlap and penetration
//! - [`platformercontrolled`] – run/jump/gravity tuning for input-driven actors
//! - [`tile`] – one grid cell: solidity and auto-tile variant

pub mod actor;
pub mod boxcollider;
pub mod platformercontrolled;
pub mod tile;
