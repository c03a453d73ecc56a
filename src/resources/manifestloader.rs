//! Manifest-backed [`BundleLoader`].
//!
//! Bundles come from two places: manifests registered in memory with
//! [`ManifestLoader::register`], and `<dir>/<id>.json` files read on a
//! background thread. Parsed files are cached, so revisiting a step never
//! reads the disk twice.
//!
//! Every operation finishes on a later [`poll`](BundleLoader::poll), never
//! inside `begin_load`/`begin_unload`, so the orchestrator always yields at
//! least one tick per load and unload.
//!
//! Loads are additive. Each one is recorded as an instance, and an unload
//! removes the oldest instance of its bundle only, so re-entering the step
//! already showing keeps the copy that was just loaded.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use bevy_ecs::prelude::{Entity, World};
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, error, warn};
use rustc_hash::FxHashMap;

use crate::components::fader::DEFAULT_FADE_DURATION;
use crate::events::bundle::{ManifestCmd, ManifestMessage};
use crate::resources::loader::{BundleLoader, BundleOp};
use crate::resources::manifest::BundleManifest;
use crate::systems::bundle::{despawn_bundle, despawn_instance, manifest_thread, spawn_bundle};

pub struct ManifestLoader {
    manifests: FxHashMap<String, BundleManifest>,
    dir: Option<PathBuf>,
    fade_duration: f32,
    tx_cmd: Sender<ManifestCmd>,
    rx_msg: Receiver<ManifestMessage>,
    handle: Option<JoinHandle<()>>,
    /// Loads waiting on the reader thread.
    reading: FxHashMap<String, BundleOp>,
    /// Loads ready to spawn on the next poll.
    ready: Vec<(String, BundleOp)>,
    unloads: Vec<(String, BundleOp)>,
    /// Spawned entities per load, oldest first.
    instances: FxHashMap<String, VecDeque<Vec<Entity>>>,
}

impl ManifestLoader {
    /// Loader that only knows registered manifests.
    pub fn new() -> Self {
        let (tx_cmd, rx_cmd) = unbounded::<ManifestCmd>();
        let (tx_msg, rx_msg) = unbounded::<ManifestMessage>();
        let handle = std::thread::spawn(move || manifest_thread(rx_cmd, tx_msg));

        ManifestLoader {
            manifests: FxHashMap::default(),
            dir: None,
            fade_duration: DEFAULT_FADE_DURATION,
            tx_cmd,
            rx_msg,
            handle: Some(handle),
            reading: FxHashMap::default(),
            ready: Vec::new(),
            unloads: Vec::new(),
            instances: FxHashMap::default(),
        }
    }

    /// Look up unregistered bundles as `<dir>/<id>.json`.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Fade duration given to every spawned fader.
    pub fn with_fade_duration(mut self, seconds: f32) -> Self {
        self.fade_duration = seconds;
        self
    }

    /// Register (or replace) an in-memory manifest.
    pub fn register(&mut self, id: impl Into<String>, manifest: BundleManifest) {
        self.manifests.insert(id.into(), manifest);
    }

    pub fn with_manifest(mut self, id: impl Into<String>, manifest: BundleManifest) -> Self {
        self.register(id, manifest);
        self
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.manifests.contains_key(id)
    }

    /// How many loads of `id` have not been unloaded yet.
    pub fn loaded_instances(&self, id: &str) -> usize {
        self.instances.get(id).map_or(0, |v| v.len())
    }

    /// Stop the reader thread and wait for it. Safe to call twice.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.tx_cmd.send(ManifestCmd::Shutdown);
            let _ = handle.join();
        }
    }

    fn drain_reader(&mut self) {
        for msg in self.rx_msg.try_iter() {
            match msg {
                ManifestMessage::Parsed { id, manifest } => {
                    self.manifests.insert(id.clone(), manifest);
                    if let Some(op) = self.reading.remove(&id) {
                        self.ready.push((id, op));
                    }
                }
                ManifestMessage::Failed { id, error } => {
                    error!("Loading bundle '{}' failed: {}", id, error);
                    if let Some(op) = self.reading.remove(&id) {
                        // Nothing to spawn; the step is shown empty.
                        op.complete();
                    }
                }
            }
        }
    }
}

impl Default for ManifestLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ManifestLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl BundleLoader for ManifestLoader {
    fn begin_load(&mut self, id: &str) -> BundleOp {
        let op = BundleOp::pending();
        if self.manifests.contains_key(id) {
            self.ready.push((id.to_string(), op.clone()));
            return op;
        }
        let Some(dir) = &self.dir else {
            error!("Unknown bundle '{}' and no bundle directory set", id);
            self.ready.push((id.to_string(), op.clone()));
            return op;
        };
        let path = dir.join(format!("{}.json", id));
        let sent = self.tx_cmd.send(ManifestCmd::Read {
            id: id.to_string(),
            path,
        });
        if sent.is_err() {
            error!("Manifest thread is gone; bundle '{}' left empty", id);
            self.ready.push((id.to_string(), op.clone()));
            return op;
        }
        if self.reading.insert(id.to_string(), op.clone()).is_some() {
            warn!("Bundle '{}' was already being read", id);
        }
        op
    }

    fn begin_unload(&mut self, id: &str) -> BundleOp {
        let op = BundleOp::pending();
        self.unloads.push((id.to_string(), op.clone()));
        op
    }

    fn poll(&mut self, world: &mut World) {
        self.drain_reader();

        for (id, op) in std::mem::take(&mut self.ready) {
            // Unknown ids complete with an empty instance.
            let spawned = match self.manifests.get(&id) {
                Some(manifest) => spawn_bundle(world, &id, manifest, self.fade_duration),
                None => Vec::new(),
            };
            self.instances.entry(id).or_default().push_back(spawned);
            op.complete();
        }

        for (id, op) in std::mem::take(&mut self.unloads) {
            let oldest = self.instances.get_mut(&id).and_then(|v| v.pop_front());
            match oldest {
                Some(entities) => {
                    despawn_instance(world, &id, &entities);
                }
                None => {
                    debug!("Bundle '{}' has no recorded load; unloading by tag", id);
                    despawn_bundle(world, &id);
                }
            }
            op.complete();
        }
    }
}
