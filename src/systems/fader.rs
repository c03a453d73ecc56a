//! Fader animation system.
//!
//! Advances every [`Fader`](crate::components::fader::Fader) by the scaled
//! world delta. Faders own their `is_fading` flag; this is the only system
//! that moves it from true to false.

use bevy_ecs::prelude::*;

use crate::components::fader::Fader;
use crate::resources::worldtime::WorldTime;

pub fn fader_system(world_time: Res<WorldTime>, mut query: Query<&mut Fader>) {
    let dt = world_time.delta;
    for mut fader in query.iter_mut() {
        if fader.is_fading() {
            fader.tick(dt);
        }
    }
}
