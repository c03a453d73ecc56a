//! Opacity fade component.
//!
//! A [`Fader`] marks an entity as taking part in scene transitions: the
//! fade barrier fades every non-exempt `Fader` out before a switch and in
//! afterwards, and the teardown sweep despawns them.
//!
//! A fader drives one or more [`FadeChannel`]s. The first channel is the
//! entity's main surface; an optional second channel covers an outline (for
//! example an orbit trail) that must fade together with the surface.
//!
//! # Semantics
//!
//! - [`Fader::fade_in`] / [`Fader::fade_out`] start a new animation from the
//!   opacity currently displayed towards `1.0` / `0.0`.
//! - Calling either while a fade is running replaces the running animation;
//!   nothing stacks.
//! - When the duration elapses the channel snaps exactly to its target and
//!   stops. [`Fader::is_fading`] is true while any channel is running.
//!
//! The running flag is private: only [`Fader::tick`], driven by
//! [`crate::systems::fader::fader_system`], ever clears it.

use bevy_ecs::prelude::Component;
use smallvec::SmallVec;

use crate::components::tween::Easing;
use crate::systems::tween::{ease, lerp_f32, progress};

/// Default fade duration in seconds.
pub const DEFAULT_FADE_DURATION: f32 = 1.0;

/// Which way a fade goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

impl FadeDirection {
    /// Opacity reached at the end of the fade.
    pub fn target(self) -> f32 {
        match self {
            FadeDirection::In => 1.0,
            FadeDirection::Out => 0.0,
        }
    }
}

/// One animated opacity value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FadeChannel {
    opacity: f32,
    from: f32,
    target: f32,
    elapsed: f32,
    running: bool,
}

impl FadeChannel {
    fn at(opacity: f32) -> Self {
        FadeChannel {
            opacity,
            from: opacity,
            target: opacity,
            elapsed: 0.0,
            running: false,
        }
    }

    fn start(&mut self, target: f32) {
        self.from = self.opacity;
        self.target = target;
        self.elapsed = 0.0;
        self.running = true;
    }

    fn advance(&mut self, dt: f32, duration: f32, easing: Easing) {
        if !self.running {
            return;
        }
        self.elapsed += dt;
        if self.elapsed >= duration {
            self.opacity = self.target;
            self.running = false;
        } else {
            let t = ease(easing, progress(self.elapsed, duration));
            self.opacity = lerp_f32(self.from, self.target, t);
        }
    }

    /// Currently displayed opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Fadeable capability of a scene entity.
#[derive(Component, Clone, Debug)]
pub struct Fader {
    channels: SmallVec<[FadeChannel; 2]>,
    /// Duration of every fade in seconds.
    pub duration: f32,
    /// Curve applied to every fade.
    pub easing: Easing,
}

impl Default for Fader {
    fn default() -> Self {
        Fader::new(DEFAULT_FADE_DURATION)
    }
}

impl Fader {
    /// Create a hidden fader (opacity `0.0`) with a single surface channel.
    ///
    /// Freshly loaded content starts invisible and waits for the fade-in.
    pub fn new(duration: f32) -> Self {
        let mut channels = SmallVec::new();
        channels.push(FadeChannel::at(0.0));
        Fader {
            channels,
            duration,
            easing: Easing::Linear,
        }
    }

    /// Add an outline channel that fades alongside the surface.
    pub fn with_outline(mut self) -> Self {
        let opacity = self.opacity();
        self.channels.push(FadeChannel::at(opacity));
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Start fully opaque instead of hidden.
    pub fn visible(mut self) -> Self {
        for ch in self.channels.iter_mut() {
            *ch = FadeChannel::at(1.0);
        }
        self
    }

    /// Start a fade towards full opacity.
    pub fn fade_in(&mut self) {
        self.fade(FadeDirection::In);
    }

    /// Start a fade towards full transparency.
    pub fn fade_out(&mut self) {
        self.fade(FadeDirection::Out);
    }

    pub fn fade(&mut self, direction: FadeDirection) {
        let target = direction.target();
        for ch in self.channels.iter_mut() {
            ch.start(target);
        }
    }

    /// Advance every running channel by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let duration = self.duration;
        let easing = self.easing;
        for ch in self.channels.iter_mut() {
            ch.advance(dt, duration, easing);
        }
    }

    /// True while any channel is still animating.
    pub fn is_fading(&self) -> bool {
        self.channels.iter().any(|ch| ch.running)
    }

    /// Opacity of the main surface.
    pub fn opacity(&self) -> f32 {
        self.channels[0].opacity
    }

    /// Opacity of the outline channel, if the fader has one.
    pub fn outline_opacity(&self) -> Option<f32> {
        self.channels.get(1).map(|ch| ch.opacity)
    }

    pub fn channels(&self) -> &[FadeChannel] {
        &self.channels
    }
}
