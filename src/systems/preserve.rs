//! Object preservation protocol.
//!
//! Selecting an object carries it across the next scene switch:
//!
//! 1. [`preserve_entity`] cuts it out of its bundle (parent link, child
//!    links and [`SceneMember`] ownership), marks it [`Exempt`] and
//!    re-parents it under the [`AppRoot`].
//! 2. An advance is queued with
//!    [`TransitionKind::Preserve`](crate::resources::tour::TransitionKind).
//! 3. Once the next step has faded in, the orchestrator removes `Exempt`
//!    and the object takes part in later fades and sweeps like any other.
//!
//! Ownership is never handed back to a bundle.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::exempt::Exempt;
use crate::components::scenemember::SceneMember;
use crate::error::TourError;
use crate::resources::approot::AppRoot;
use crate::resources::tour::Tour;
use crate::resources::tourplan::TourState;

/// Detach `entity` from its scene and move it under the application root.
///
/// Former children stay where they are but lose their link to `entity`, so
/// despawning either side no longer reaches the other.
pub fn preserve_entity(world: &mut World, entity: Entity) -> Result<(), TourError> {
    let root = world.get_resource::<AppRoot>().ok_or(TourError::MissingRoot)?.0;
    if world.get_entity(entity).is_err() {
        return Err(TourError::NoSuchEntity(entity));
    }

    let children: Vec<Entity> = world
        .get::<Children>(entity)
        .map(|c| c.to_vec())
        .unwrap_or_default();
    for child in children {
        if let Ok(mut c) = world.get_entity_mut(child) {
            c.remove::<ChildOf>();
        }
    }

    world
        .entity_mut(entity)
        .remove::<(ChildOf, SceneMember)>()
        .insert((Exempt, ChildOf(root)));
    Ok(())
}

/// Carry `entity` into the next step.
///
/// Nothing is touched unless an advance could be queued right now.
pub fn on_object_selected(world: &mut World, entity: Entity) -> Result<TourState, TourError> {
    world.resource::<Tour>().next_target()?;
    preserve_entity(world, entity)?;
    let target = world.resource_mut::<Tour>().request_preserve(entity)?;
    info!("Carrying {} into {}", entity, target);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::fader::Fader;
    use crate::components::persistent::Persistent;
    use crate::resources::tour::TransitionKind;
    use crate::resources::tourplan::TourPlan;

    fn world_with_root() -> (World, Entity) {
        let mut world = World::new();
        let root = world.spawn(Persistent).id();
        world.insert_resource(AppRoot(root));
        world.insert_resource(Tour::new(TourPlan::from_bundles(["A", "B"]).unwrap()));
        (world, root)
    }

    #[test]
    fn test_preserve_severs_links_and_reparents() {
        let (mut world, root) = world_with_root();
        let group = world.spawn((Fader::default(), SceneMember::new("A"))).id();
        let planet = world
            .spawn((Fader::default(), SceneMember::new("A"), ChildOf(group)))
            .id();
        let moon = world
            .spawn((Fader::default(), SceneMember::new("A"), ChildOf(planet)))
            .id();

        preserve_entity(&mut world, planet).unwrap();

        assert_eq!(world.get::<ChildOf>(planet).unwrap().parent(), root);
        assert!(world.get::<Exempt>(planet).is_some());
        assert!(world.get::<SceneMember>(planet).is_none());
        assert!(world.get::<ChildOf>(moon).is_none());
        assert!(world.get::<Children>(planet).is_none_or(|c| c.is_empty()));
        let group_children = world.get::<Children>(group);
        assert!(group_children.is_none_or(|c| !c.contains(&planet)));
    }

    #[test]
    fn test_preserve_requires_root() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        assert_eq!(preserve_entity(&mut world, e), Err(TourError::MissingRoot));
    }

    #[test]
    fn test_preserve_missing_entity() {
        let (mut world, _) = world_with_root();
        let e = world.spawn_empty().id();
        world.despawn(e);
        assert_eq!(preserve_entity(&mut world, e), Err(TourError::NoSuchEntity(e)));
    }

    #[test]
    fn test_selected_queues_preserve_request() {
        let (mut world, _) = world_with_root();
        let e = world.spawn(Fader::default()).id();
        assert_eq!(on_object_selected(&mut world, e), Ok(TourState::Step(0)));
        let tour = world.resource::<Tour>();
        assert_eq!(tour.pending().unwrap().kind, TransitionKind::Preserve(e));
    }

    #[test]
    fn test_selected_while_busy_leaves_entity_alone() {
        let (mut world, _) = world_with_root();
        world.resource_mut::<Tour>().request_advance().unwrap();
        let parent = world.spawn_empty().id();
        let e = world.spawn((Fader::default(), ChildOf(parent))).id();

        assert!(matches!(
            on_object_selected(&mut world, e),
            Err(TourError::Busy(_))
        ));
        assert!(world.get::<Exempt>(e).is_none());
        assert_eq!(world.get::<ChildOf>(e).unwrap().parent(), parent);
    }
}
