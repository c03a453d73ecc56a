//! Step indicator component.
//!
//! One [`Indicator`] entity exists per tour step (a row of circles in a
//! windowed host). When a step is entered, the orchestrator asks every
//! indicator to recolour itself; the colour change then runs on its own in
//! [`indicator_color_system`](crate::systems::indicator::indicator_color_system)
//! and is never waited on.

use bevy_ecs::prelude::Component;

use crate::systems::tween::{lerp_f32, progress};

/// Plain RGBA colour with channels in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Rgba { r, g, b, a }
    }

    /// Build a colour from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Component-wise linear interpolation.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba {
            r: lerp_f32(self.r, other.r, t),
            g: lerp_f32(self.g, other.g, t),
            b: lerp_f32(self.b, other.b, t),
            a: lerp_f32(self.a, other.a, t),
        }
    }
}

/// A running colour change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorTransition {
    pub from: Rgba,
    pub to: Rgba,
    pub duration: f32,
    pub elapsed: f32,
}

/// Visual marker for one tour step.
#[derive(Component, Clone, Debug)]
pub struct Indicator {
    /// Position of this indicator in the row.
    pub index: usize,
    /// Colour currently displayed.
    pub color: Rgba,
    /// In-flight colour change, if any.
    pub transition: Option<ColorTransition>,
}

impl Indicator {
    pub fn new(index: usize, color: Rgba) -> Self {
        Indicator {
            index,
            color,
            transition: None,
        }
    }

    /// Start moving from the displayed colour towards `to`.
    ///
    /// Replaces any transition already running.
    pub fn transition_to(&mut self, to: Rgba, duration: f32) {
        self.transition = Some(ColorTransition {
            from: self.color,
            to,
            duration,
            elapsed: 0.0,
        });
    }

    /// Advance the colour change by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let Some(mut tr) = self.transition else {
            return;
        };
        tr.elapsed += dt;
        if tr.elapsed >= tr.duration {
            self.color = tr.to;
            self.transition = None;
        } else {
            self.color = tr.from.lerp(tr.to, progress(tr.elapsed, tr.duration));
            self.transition = Some(tr);
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }
}
