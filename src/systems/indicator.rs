//! Step indicator systems.
//!
//! - [`select_indicator`] – recolour every indicator for a newly entered step
//! - [`indicator_color_system`] – advance running colour changes
//!
//! Recolouring is fire-and-forget: nothing in the tour waits for
//! [`Indicator::is_transitioning`] to clear.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::indicator::Indicator;
use crate::resources::palette::IndicatorPalette;
use crate::resources::worldtime::WorldTime;

pub fn indicator_color_system(world_time: Res<WorldTime>, mut query: Query<&mut Indicator>) {
    let dt = world_time.delta;
    for mut indicator in query.iter_mut() {
        if indicator.is_transitioning() {
            indicator.tick(dt);
        }
    }
}

/// Highlight indicator `selected` and return every other one to the default
/// colour. Each change starts from the colour currently displayed.
pub fn select_indicator(world: &mut World, selected: usize) {
    let palette = world
        .get_resource::<IndicatorPalette>()
        .copied()
        .unwrap_or_default();
    let mut query = world.query::<&mut Indicator>();
    for mut indicator in query.iter_mut(world) {
        let to = palette.color_for(indicator.index, selected);
        indicator.transition_to(to, palette.duration);
    }
    debug!("Indicator {} selected", selected);
}
