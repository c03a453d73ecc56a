//! Teardown sweep.
//!
//! Destroys transient scene content between the fade-out and the next load:
//! every entity carrying a [`Fader`] that is not [`Exempt`]. Exempt entities
//! keep their parent and position.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::exempt::Exempt;
use crate::components::fader::Fader;

/// Despawn every non-exempt fader. Returns the size of the destruction set.
///
/// Descendants go with their parent, so an exempt entity must already be
/// detached from any swept parent, which is what
/// [`preserve_entity`](crate::systems::preserve::preserve_entity) does.
pub fn teardown_sweep(world: &mut World) -> usize {
    let doomed: Vec<Entity> = world
        .query_filtered::<Entity, (With<Fader>, Without<Exempt>)>()
        .iter(world)
        .collect();

    for entity in &doomed {
        if let Ok(e) = world.get_entity_mut(*entity) {
            e.despawn();
        }
    }
    debug!("Swept {} entities", doomed.len());
    doomed.len()
}
