//! Transition sequencing.
//!
//! [`drive_tour`] is an exclusive system that runs last in the tick. It
//! lets the content loader finish world-side work, starts a queued request
//! when the tour is idle, then steps the in-flight [`Transition`] through
//! its phases:
//!
//! ```text
//! FadingOut -> Sweeping -> Loading -> Unloading -> Applying -> FadingIn
//! ```
//!
//! Phases that do not wait run back-to-back in the same tick. A phase that
//! waits (a fade barrier still `Waiting`, a bundle op not done) is stored
//! and resumed on the next tick. `Unloading` is skipped when leaving
//! `Start`, which has no bundle. The new state is committed in `Applying`,
//! before the fade-in starts.

use bevy_ecs::prelude::*;
use log::{debug, error, info, warn};

use crate::components::exempt::Exempt;
use crate::components::fader::FadeDirection;
use crate::error::TourError;
use crate::events::tour::TourStepEnteredEvent;
use crate::resources::freelook::FreeLookCamera;
use crate::resources::loader::{BundleOp, ContentLoader, pump_content_loader};
use crate::resources::tour::{Tour, Transition, TransitionKind, TransitionPhase};
use crate::resources::tourplan::TourState;
use crate::systems::barrier::FadeBarrier;
use crate::systems::indicator::select_indicator;
use crate::systems::sweep::teardown_sweep;

enum PhaseStep {
    /// Move straight on to the phase just stored.
    Continue,
    /// Yield until the next tick.
    Wait,
    /// Fade-in finished.
    Done,
}

/// Run the orchestrator for one tick.
pub fn drive_tour(world: &mut World) {
    pump_content_loader(world);
    if !world.contains_resource::<Tour>() {
        return;
    }
    begin_pending_transition(world);
    step_transition(world);
}

/// Start the queued request if nothing is in flight. Returns true if a
/// transition was started.
pub fn begin_pending_transition(world: &mut World) -> bool {
    let Some(request) = world.resource_mut::<Tour>().take_pending() else {
        return false;
    };
    let (from, max_ticks) = {
        let tour = world.resource::<Tour>();
        (tour.current(), tour.barrier_max_ticks)
    };
    info!(
        "Transition {} -> {} ({:?}) started",
        from, request.target, request.kind
    );
    let barrier = FadeBarrier::begin(world, FadeDirection::Out, max_ticks);
    world.resource_mut::<Tour>().store_transition(Transition {
        from,
        to: request.target,
        kind: request.kind,
        phase: TransitionPhase::FadingOut(barrier),
        ticks: 0,
    });
    true
}

/// Step the in-flight transition until it has to wait or completes.
pub fn step_transition(world: &mut World) {
    let Some(mut transition) = world.resource_mut::<Tour>().take_transition() else {
        return;
    };
    transition.ticks += 1;
    loop {
        match advance_phase(world, &mut transition) {
            Ok(PhaseStep::Continue) => {}
            Ok(PhaseStep::Wait) => {
                world.resource_mut::<Tour>().store_transition(transition);
                return;
            }
            Ok(PhaseStep::Done) => {
                finish_transition(world, transition);
                return;
            }
            Err(e) => {
                error!(
                    "Transition {} -> {} dropped in {}: {}",
                    transition.from,
                    transition.to,
                    transition.phase.name(),
                    e
                );
                return;
            }
        }
    }
}

fn advance_phase(world: &mut World, t: &mut Transition) -> Result<PhaseStep, TourError> {
    let max_ticks = world.resource::<Tour>().barrier_max_ticks;
    let next = match &mut t.phase {
        TransitionPhase::FadingOut(barrier) => {
            if !barrier.poll(world).is_resolved() {
                return Ok(PhaseStep::Wait);
            }
            TransitionPhase::Sweeping
        }
        TransitionPhase::Sweeping => {
            teardown_sweep(world);
            let bundle = bundle_for(world, t.to)?;
            TransitionPhase::Loading(begin_load(world, &bundle))
        }
        TransitionPhase::Loading(op) => {
            if !op.is_done() {
                return Ok(PhaseStep::Wait);
            }
            if t.from.is_start() {
                TransitionPhase::Applying
            } else {
                let bundle = bundle_for(world, t.from)?;
                TransitionPhase::Unloading(begin_unload(world, &bundle))
            }
        }
        TransitionPhase::Unloading(op) => {
            if !op.is_done() {
                return Ok(PhaseStep::Wait);
            }
            TransitionPhase::Applying
        }
        TransitionPhase::Applying => {
            apply_side_effects(world, t.to)?;
            world.resource_mut::<Tour>().set_current(t.to);
            TransitionPhase::FadingIn(FadeBarrier::begin(world, FadeDirection::In, max_ticks))
        }
        TransitionPhase::FadingIn(barrier) => {
            if !barrier.poll(world).is_resolved() {
                return Ok(PhaseStep::Wait);
            }
            return Ok(PhaseStep::Done);
        }
    };
    debug!("{} -> {}: {}", t.from, t.to, next.name());
    t.phase = next;
    Ok(PhaseStep::Continue)
}

fn bundle_for(world: &World, state: TourState) -> Result<String, TourError> {
    world
        .resource::<Tour>()
        .plan()
        .bundle(state)
        .map(str::to_string)
        .ok_or(TourError::NoBundle(state))
}

fn begin_load(world: &mut World, bundle: &str) -> BundleOp {
    match world.get_resource_mut::<ContentLoader>() {
        Some(mut loader) => {
            debug!("Loading bundle '{}'", bundle);
            loader.0.begin_load(bundle)
        }
        None => {
            warn!("No content loader; bundle '{}' not loaded", bundle);
            BundleOp::finished()
        }
    }
}

fn begin_unload(world: &mut World, bundle: &str) -> BundleOp {
    match world.get_resource_mut::<ContentLoader>() {
        Some(mut loader) => {
            debug!("Unloading bundle '{}'", bundle);
            loader.0.begin_unload(bundle)
        }
        None => {
            warn!("No content loader; bundle '{}' not unloaded", bundle);
            BundleOp::finished()
        }
    }
}

/// Apply the entered step's camera flag and indicator selection.
///
/// The indicator recolour is started here and left to run on its own.
pub fn apply_side_effects(world: &mut World, state: TourState) -> Result<(), TourError> {
    let step = world
        .resource::<Tour>()
        .plan()
        .step(state)
        .cloned()
        .ok_or(TourError::NoBundle(state))?;
    if let Some(mut camera) = world.get_resource_mut::<FreeLookCamera>() {
        camera.enabled = step.free_camera;
    }
    select_indicator(world, step.indicator);
    debug!(
        "{}: free_camera={} indicator={}",
        state, step.free_camera, step.indicator
    );
    Ok(())
}

fn finish_transition(world: &mut World, t: Transition) {
    match t.kind {
        TransitionKind::Reset => {
            if let Some(mut camera) = world.get_resource_mut::<FreeLookCamera>() {
                camera.return_to_origin = true;
            }
        }
        TransitionKind::Preserve(entity) => {
            if let Ok(mut e) = world.get_entity_mut(entity) {
                e.remove::<Exempt>();
            }
        }
        TransitionKind::Advance | TransitionKind::Jump => {}
    }

    let bundle = bundle_for(world, t.to).unwrap_or_default();
    world.resource_mut::<Tour>().record_completed(t.kind);
    info!(
        "Transition {} -> {} completed in {} ticks",
        t.from, t.to, t.ticks
    );
    world.trigger(TourStepEnteredEvent {
        from: t.from,
        to: t.to,
        bundle,
        kind: t.kind,
    });
}
