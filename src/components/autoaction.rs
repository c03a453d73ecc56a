//! Scripted scenario actions.
//!
//! Some steps of a tour drive themselves: the intro panel moves on after a
//! short pause, the inspection panel offers a reset, and a headless run
//! needs something to "click" an object. An [`AutoAction`] attached to a
//! bundle entity fires its [`ScriptedAction`] once the tour has been idle on
//! the current step for `after` seconds.
//!
//! # Related
//!
//! - [`crate::systems::autoaction::auto_action_system`] – counts down and fires

use bevy_ecs::prelude::Component;
use serde::Deserialize;

/// What an [`AutoAction`] does when its timer runs out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedAction {
    /// Move to the next step.
    Advance,
    /// Jump back to the first step.
    Reset,
    /// Select the entity carrying this component and carry it forward.
    Select,
}

/// One-shot timer that fires a [`ScriptedAction`].
#[derive(Component, Clone, Debug)]
pub struct AutoAction {
    /// Idle seconds to wait before firing.
    pub after: f32,
    pub action: ScriptedAction,
    /// Idle seconds counted so far.
    pub elapsed: f32,
    /// Set once the action has fired.
    pub fired: bool,
}

impl AutoAction {
    pub fn new(after: f32, action: ScriptedAction) -> Self {
        AutoAction {
            after,
            action,
            elapsed: 0.0,
            fired: false,
        }
    }

    /// Count `dt` idle seconds; returns true exactly once, when the timer
    /// first reaches `after`.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.fired {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.after {
            self.fired = true;
            return true;
        }
        false
    }
}
