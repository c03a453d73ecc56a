//! Persistent entity marker component.
//!
//! Entities with the [`Persistent`] component belong to the application
//! rather than to any content bundle: the application root, the step
//! indicators and the observers. Bundle unloads only ever touch entities
//! tagged with [`SceneMember`](super::scenemember::SceneMember), and
//! persistent entities never carry one.

use bevy_ecs::prelude::Component;

/// Tag component used to mark entities that live for the whole run.
#[derive(Component, Clone, Debug)]
pub struct Persistent;
