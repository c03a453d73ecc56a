//! Scripted action system.
//!
//! Counts down every [`AutoAction`] while the tour is idle and triggers the
//! matching tour event when one runs out. Timers freeze while a transition
//! is queued or running, so content that is still fading in never acts.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::autoaction::{AutoAction, ScriptedAction};
use crate::events::tour::{AdvanceTourEvent, ObjectSelectedEvent, ResetTourEvent};
use crate::resources::tour::Tour;
use crate::resources::worldtime::WorldTime;

pub fn auto_action_system(
    world_time: Res<WorldTime>,
    tour: Res<Tour>,
    mut query: Query<(Entity, &mut AutoAction)>,
    mut commands: Commands,
) {
    if !tour.is_idle() {
        return;
    }
    let dt = world_time.delta;
    for (entity, mut auto) in query.iter_mut() {
        if !auto.tick(dt) {
            continue;
        }
        debug!("{} fired {:?}", entity, auto.action);
        match auto.action {
            ScriptedAction::Advance => commands.trigger(AdvanceTourEvent {}),
            ScriptedAction::Reset => commands.trigger(ResetTourEvent {}),
            ScriptedAction::Select => commands.trigger(ObjectSelectedEvent { entity }),
        }
    }
}
