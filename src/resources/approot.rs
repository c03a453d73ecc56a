//! Application-lifetime root entity.

use bevy_ecs::entity::Entity;
use bevy_ecs::prelude::Resource;

/// Entity that persisted objects are re-parented under.
///
/// Spawned once at setup with
/// [`Persistent`](crate::components::persistent::Persistent) and never
/// despawned, so nothing parented to it is reached by a bundle unload.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppRoot(pub Entity);
