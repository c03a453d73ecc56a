//! Exempt marker component.
//!
//! An entity carrying [`Exempt`] is skipped by both the fade barrier and the
//! teardown sweep, so it stays visible and alive across a scene switch. The
//! preservation protocol inserts it on the selected object and removes it
//! again once the next step has faded in.

use bevy_ecs::prelude::Component;

/// Tag component that keeps an entity out of fade and sweep passes.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Exempt;
