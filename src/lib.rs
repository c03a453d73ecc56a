//! Scene tour library.
//!
//! This module exposes the tour's ECS components, resources, systems, and
//! events for use in integration tests and by host binaries.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
