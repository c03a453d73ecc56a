//! Bundle content spawning and the manifest reader thread.
//!
//! - [`manifest_thread`] runs on its own OS thread, reads manifest files and
//!   sends parsed [`BundleManifest`]s back. It never touches the world.
//! - [`spawn_bundle`], [`despawn_instance`] and [`despawn_bundle`] run on the
//!   ECS thread, called from
//!   [`ManifestLoader::poll`](crate::resources::manifestloader::ManifestLoader).

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info};

use crate::components::autoaction::AutoAction;
use crate::components::fader::Fader;
use crate::components::scenemember::SceneMember;
use crate::components::selectable::Selectable;
use crate::events::bundle::{ManifestCmd, ManifestMessage};
use crate::resources::manifest::{BundleManifest, EntitySpec};

/// Entry point of the manifest reader thread.
///
/// Blocks on the command channel and exits on [`ManifestCmd::Shutdown`] or
/// when every sender has been dropped.
pub fn manifest_thread(rx_cmd: Receiver<ManifestCmd>, tx_msg: Sender<ManifestMessage>) {
    debug!(
        "manifest thread starting (id={:?})",
        std::thread::current().id()
    );
    while let Ok(cmd) = rx_cmd.recv() {
        match cmd {
            ManifestCmd::Read { id, path } => {
                match BundleManifest::load_from_file(&id, &path) {
                    Ok(manifest) => {
                        debug!("read manifest '{}' from {}", id, path.display());
                        let _ = tx_msg.send(ManifestMessage::Parsed { id, manifest });
                    }
                    Err(e) => {
                        let _ = tx_msg.send(ManifestMessage::Failed {
                            id,
                            error: e.to_string(),
                        });
                    }
                }
            }
            ManifestCmd::Shutdown => break,
        }
    }
    debug!("manifest thread exiting");
}

/// Spawn every entity in `manifest` as a member of bundle `id`.
///
/// Fading entities start hidden; the fade-in barrier reveals them. Returns
/// the spawned entities, parents before their children.
pub fn spawn_bundle(
    world: &mut World,
    id: &str,
    manifest: &BundleManifest,
    fade_duration: f32,
) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(manifest.entity_count());
    for spec in &manifest.entities {
        spawn_spec(world, id, spec, None, fade_duration, &mut spawned);
    }
    info!("Spawned bundle '{}' ({} entities)", id, spawned.len());
    spawned
}

fn spawn_spec(
    world: &mut World,
    id: &str,
    spec: &EntitySpec,
    parent: Option<Entity>,
    fade_duration: f32,
    spawned: &mut Vec<Entity>,
) {
    let mut entity = world.spawn(SceneMember::new(id));
    if spec.fade {
        let mut fader = Fader::new(fade_duration).with_easing(spec.easing);
        if spec.outline {
            fader = fader.with_outline();
        }
        entity.insert(fader);
    }
    if let Some(sel) = &spec.selectable {
        entity.insert(Selectable::new(sel.name.as_str(), sel.radius.as_str()));
    }
    if let Some(auto) = &spec.auto {
        entity.insert(AutoAction::new(auto.after, auto.action));
    }
    if let Some(parent) = parent {
        entity.insert(ChildOf(parent));
    }
    let e = entity.id();
    spawned.push(e);

    for child in &spec.children {
        spawn_spec(world, id, child, Some(e), fade_duration, spawned);
    }
}

/// Despawn every entity still owned by bundle `id`.
///
/// Entities whose [`SceneMember`] was removed (a preserved object) are left
/// alone. Returns how many owned entities were found.
pub fn despawn_bundle(world: &mut World, id: &str) -> usize {
    let owned: Vec<Entity> = world
        .query::<(Entity, &SceneMember)>()
        .iter(world)
        .filter(|(_, member)| member.is(id))
        .map(|(e, _)| e)
        .collect();

    for e in &owned {
        // Children go with their parent, so some may already be gone.
        if let Ok(entity) = world.get_entity_mut(*e) {
            entity.despawn();
        }
    }
    info!("Despawned bundle '{}' ({} entities)", id, owned.len());
    owned.len()
}

/// Despawn one loaded instance of bundle `id`: the `entities` a single
/// [`spawn_bundle`] call returned.
///
/// Entities that are gone or no longer owned by `id` are skipped, so other
/// instances of the same bundle and preserved objects are untouched.
pub fn despawn_instance(world: &mut World, id: &str, entities: &[Entity]) -> usize {
    let mut despawned = 0;
    for e in entities {
        let owned = world.get::<SceneMember>(*e).is_some_and(|m| m.is(id));
        if !owned {
            continue;
        }
        if let Ok(entity) = world.get_entity_mut(*e) {
            entity.despawn();
            despawned += 1;
        }
    }
    info!("Despawned an instance of bundle '{}' ({} entities)", id, despawned);
    despawned
}
