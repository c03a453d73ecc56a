//! Tour input events and their observers.
//!
//! Hosts drive the tour by triggering [`AdvanceTourEvent`],
//! [`ResetTourEvent`] or [`ObjectSelectedEvent`]. The observers here turn
//! them into queued requests on the [`Tour`] resource; a request arriving
//! while another transition is queued or running is rejected and logged.
//!
//! [`TourStepEnteredEvent`] goes the other way: it is triggered once a
//! transition has faded in.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::components::selectable::Selectable;
use crate::resources::freelook::FreeLookCamera;
use crate::resources::tour::{Tour, TransitionKind};
use crate::resources::tourplan::TourState;
use crate::systems::preserve::on_object_selected;

/// Move to the next step.
#[derive(Event, Debug, Clone, Copy)]
pub struct AdvanceTourEvent {}

/// Jump back to the first step and send the camera home.
#[derive(Event, Debug, Clone, Copy)]
pub struct ResetTourEvent {}

/// The visitor picked `entity`; carry it into the next step.
#[derive(Event, Debug, Clone, Copy)]
pub struct ObjectSelectedEvent {
    pub entity: Entity,
}

/// A step has been entered and its content has faded in.
#[derive(Event, Debug, Clone)]
pub struct TourStepEnteredEvent {
    pub from: TourState,
    pub to: TourState,
    /// Bundle now loaded for `to`.
    pub bundle: String,
    pub kind: TransitionKind,
}

pub fn advance_tour_observer(_trigger: On<AdvanceTourEvent>, mut tour: ResMut<Tour>) {
    debug!("AdvanceTourEvent triggered");
    match tour.request_advance() {
        Ok(target) => info!("Advance to {} requested", target),
        Err(e) => warn!("Advance rejected: {}", e),
    }
}

pub fn reset_tour_observer(_trigger: On<ResetTourEvent>, mut tour: ResMut<Tour>) {
    debug!("ResetTourEvent triggered");
    match tour.request_reset() {
        Ok(target) => info!("Reset to {} requested", target),
        Err(e) => warn!("Reset rejected: {}", e),
    }
}

/// Hand the picked entity to the preservation protocol.
///
/// Structural changes run as a queued command with full world access. Only
/// once the entity is actually carried forward is its [`Selectable`] marked
/// and the camera's pending return to origin cancelled, so it stays on the
/// picked object.
pub fn object_selected_observer(
    trigger: On<ObjectSelectedEvent>,
    mut commands: Commands,
    selectables: Query<&Selectable>,
) {
    let entity = trigger.event().entity;
    debug!("ObjectSelectedEvent triggered for {}", entity);

    if let Ok(selectable) = selectables.get(entity) {
        if selectable.selected {
            warn!("{} ({}) is already selected", entity, selectable.name);
            return;
        }
    }

    commands.queue(move |world: &mut World| {
        if let Err(e) = on_object_selected(world, entity) {
            warn!("Selection of {} rejected: {}", entity, e);
            return;
        }
        if let Some(mut selectable) = world.get_mut::<Selectable>(entity) {
            selectable.selected = true;
            info!("Selected {} ({})", selectable.name, selectable.radius);
        }
        if let Some(mut camera) = world.get_resource_mut::<FreeLookCamera>() {
            camera.return_to_origin = false;
        }
    });
}

/// Log every completed step, and the object being inspected if one was
/// carried in.
pub fn step_entered_observer(
    trigger: On<TourStepEnteredEvent>,
    selectables: Query<&Selectable>,
) {
    let event = trigger.event();
    info!(
        "Now showing {} ('{}') after {:?} from {}",
        event.to, event.bundle, event.kind, event.from
    );
    if let TransitionKind::Preserve(entity) = event.kind {
        if let Ok(selected) = selectables.get(entity) {
            info!("Inspecting {}: radius {}", selected.name, selected.radius);
        }
    }
}
