//! Built-in tour content and world setup.
//!
//! The default tour has three steps:
//!
//! - `Scene1` – an intro panel that moves on by itself after a second.
//! - `Scene2` – a small solar system. Every planet is selectable and has an
//!   orbit outline; Earth picks itself after two seconds when nobody else
//!   does.
//! - `Scene3` – the inspection panel for the carried planet, with a reset
//!   after three seconds.
//!
//! [`setup`] inserts every resource and persistent entity the tour needs,
//! [`bootstrap`] starts the first transition, and [`update_schedule`] builds
//! the per-tick schedule.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::info;

use crate::components::autoaction::ScriptedAction;
use crate::components::indicator::Indicator;
use crate::components::persistent::Persistent;
use crate::components::tween::Easing;
use crate::error::TourError;
use crate::events::tour::{
    AdvanceTourEvent, advance_tour_observer, object_selected_observer, reset_tour_observer,
    step_entered_observer,
};
use crate::resources::approot::AppRoot;
use crate::resources::freelook::FreeLookCamera;
use crate::resources::loader::{BundleLoader, ContentLoader};
use crate::resources::manifest::{BundleManifest, EntitySpec};
use crate::resources::manifestloader::ManifestLoader;
use crate::resources::palette::IndicatorPalette;
use crate::resources::tour::Tour;
use crate::resources::tourconfig::TourConfig;
use crate::resources::worldtime::WorldTime;
use crate::systems::autoaction::auto_action_system;
use crate::systems::fader::fader_system;
use crate::systems::indicator::indicator_color_system;
use crate::systems::tour::drive_tour;

const PLANETS: [(&str, &str); 4] = [
    ("Mercury", "2439.7 km"),
    ("Venus", "6051.8 km"),
    ("Earth", "6371 km"),
    ("Mars", "3389.5 km"),
];

/// Manifests for the built-in `Scene1`, `Scene2` and `Scene3` bundles.
pub fn builtin_manifests() -> Vec<(&'static str, BundleManifest)> {
    let intro = BundleManifest::new(vec![
        EntitySpec::new()
            .fading()
            .auto(1.0, ScriptedAction::Advance),
    ]);

    let mut sun = EntitySpec::new().fading().with_easing(Easing::QuadOut);
    for (name, radius) in PLANETS {
        let mut planet = EntitySpec::new()
            .fading()
            .with_outline()
            .selectable(name, radius);
        if name == "Earth" {
            planet = planet.auto(2.0, ScriptedAction::Select);
        }
        sun = sun.child(planet);
    }
    let system = BundleManifest::new(vec![EntitySpec::new().fading(), sun]);

    let inspection = BundleManifest::new(vec![
        EntitySpec::new()
            .fading()
            .auto(3.0, ScriptedAction::Reset),
    ]);

    vec![("Scene1", intro), ("Scene2", system), ("Scene3", inspection)]
}

/// Loader for `config`: bundles come from `bundles_dir` when one is set,
/// from the built-in manifests otherwise.
pub fn default_loader(config: &TourConfig) -> ManifestLoader {
    let loader = ManifestLoader::new().with_fade_duration(config.fade_duration);
    match &config.bundles_dir {
        Some(dir) => loader.with_dir(dir),
        None => builtin_manifests()
            .into_iter()
            .fold(loader, |l, (id, m)| l.with_manifest(id, m)),
    }
}

/// Insert the tour's resources, persistent entities and observers.
pub fn setup(
    world: &mut World,
    config: &TourConfig,
    loader: impl BundleLoader + 'static,
) -> Result<(), TourError> {
    let plan = config.plan()?;
    let steps = plan.len();
    let palette = IndicatorPalette::default().with_duration(config.indicator_duration);

    world.insert_resource(WorldTime::default());
    world.insert_resource(FreeLookCamera::default());
    world.insert_resource(palette);
    world.insert_resource(Tour::new(plan).with_barrier_max_ticks(config.barrier_max_ticks));
    world.insert_resource(ContentLoader::new(loader));
    world.insert_resource(config.clone());

    let root = world.spawn(Persistent).id();
    world.insert_resource(AppRoot(root));
    for i in 0..steps {
        world.spawn((Indicator::new(i, palette.default), Persistent, ChildOf(root)));
    }

    world.spawn((Observer::new(advance_tour_observer), Persistent));
    world.spawn((Observer::new(reset_tour_observer), Persistent));
    world.spawn((Observer::new(object_selected_observer), Persistent));
    world.spawn((Observer::new(step_entered_observer), Persistent));
    // Observers must be registered before anything triggers.
    world.flush();

    info!("Tour ready with {} steps", steps);
    Ok(())
}

/// Enter the first step: camera off, then advance out of `Start`.
pub fn bootstrap(world: &mut World) {
    if let Some(mut camera) = world.get_resource_mut::<FreeLookCamera>() {
        camera.enabled = false;
    }
    world.trigger(AdvanceTourEvent {});
}

/// The per-tick schedule. `drive_tour` runs last so it sees this tick's
/// fader progress and any requests made by scripted actions.
pub fn update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            fader_system,
            indicator_color_system,
            auto_action_system,
            drive_tour,
        )
            .chain(),
    );
    update
}
