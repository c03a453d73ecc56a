//! Content bundle loading collaborator.
//!
//! The orchestrator never spawns or despawns bundle content itself. It asks a
//! [`BundleLoader`] to start a load or unload, gets back a [`BundleOp`]
//! handle, and polls [`BundleOp::is_done`] once per tick until it flips.
//!
//! The loader lives in the world as the [`ContentLoader`] resource.
//! [`drive_tour`](crate::systems::tour::drive_tour) calls
//! [`BundleLoader::poll`] at the start of every tick so the loader can
//! finish work that needs world access.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy_ecs::prelude::*;

/// Pollable handle on one load or unload.
///
/// Clones share the same done flag.
#[derive(Clone, Default)]
pub struct BundleOp {
    done: Arc<AtomicBool>,
}

impl BundleOp {
    /// A handle that is not done yet.
    pub fn pending() -> Self {
        BundleOp::default()
    }

    /// A handle that is already done.
    pub fn finished() -> Self {
        let op = BundleOp::default();
        op.complete();
        op
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Mark the operation done. Idempotent.
    pub fn complete(&self) {
        self.done.store(true, Ordering::Release);
    }
}

impl fmt::Debug for BundleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleOp")
            .field("done", &self.is_done())
            .finish()
    }
}

/// Additive load / unload of named content bundles.
///
/// Loading an id that is already loaded adds a second instance, and an
/// unload removes only the oldest one. A reset onto the step already showing
/// relies on this: it loads the bundle again before unloading the old copy.
///
/// Each call is made exactly once per transition for the bundle being
/// entered or left. Operations are trusted to finish: the orchestrator has
/// no timeout on them.
pub trait BundleLoader: Send + Sync {
    /// Start loading bundle `id` alongside whatever is already loaded.
    fn begin_load(&mut self, id: &str) -> BundleOp;

    /// Start removing every entity that bundle `id` owns.
    fn begin_unload(&mut self, id: &str) -> BundleOp;

    /// Advance in-flight work by one tick.
    fn poll(&mut self, world: &mut World);
}

/// The world's bundle loader.
#[derive(Resource)]
pub struct ContentLoader(pub Box<dyn BundleLoader>);

impl ContentLoader {
    pub fn new(loader: impl BundleLoader + 'static) -> Self {
        ContentLoader(Box::new(loader))
    }
}

/// Let the loader finish any work that needs the world.
pub fn pump_content_loader(world: &mut World) {
    if !world.contains_resource::<ContentLoader>() {
        return;
    }
    world.resource_scope(|world, mut loader: Mut<ContentLoader>| {
        loader.0.poll(world);
    });
}
