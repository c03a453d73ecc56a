//! Free-look camera collaborator flags.
//!
//! Camera input handling lives outside the tour. The orchestrator only flips
//! these two flags: `enabled` as a per-step side effect, and
//! `return_to_origin` once a reset has faded in. The host's camera code reads
//! them and clears `return_to_origin` when it starts moving home.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FreeLookCamera {
    pub enabled: bool,
    pub return_to_origin: bool,
}
