//! Fade-completion barrier.
//!
//! [`FadeBarrier::begin`] discovers every non-exempt [`Fader`] with a fresh
//! query, starts the requested fade on each and remembers who it started.
//! The orchestrator then calls [`FadeBarrier::poll`] once per tick until it
//! stops returning [`BarrierStatus::Waiting`]; each `Waiting` is one tick
//! yielded.
//!
//! Members are fixed at `begin`: content spawned afterwards is not waited
//! on, and members despawned in the meantime count as settled. When the tick
//! cap is reached the barrier gives up with [`BarrierStatus::TimedOut`] so a
//! stuck animation can never stall the tour; this is logged, not raised.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::exempt::Exempt;
use crate::components::fader::{FadeDirection, Fader};

/// Result of one barrier poll.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BarrierStatus {
    /// At least one member is still fading.
    Waiting,
    /// Every member has finished (or no longer exists).
    Settled,
    /// The tick cap was reached with members still fading.
    TimedOut,
}

impl BarrierStatus {
    pub fn is_resolved(self) -> bool {
        self != BarrierStatus::Waiting
    }
}

#[derive(Debug, Clone)]
pub struct FadeBarrier {
    direction: FadeDirection,
    members: Vec<Entity>,
    ticks: u32,
    max_ticks: u32,
}

impl FadeBarrier {
    /// Start `direction` on every non-exempt fader and track them.
    pub fn begin(world: &mut World, direction: FadeDirection, max_ticks: u32) -> Self {
        let mut query = world.query_filtered::<(Entity, &mut Fader), Without<Exempt>>();
        let mut members = Vec::new();
        for (entity, mut fader) in query.iter_mut(world) {
            fader.fade(direction);
            members.push(entity);
        }
        debug!(
            "Fade {:?} started on {} entities (cap {} ticks)",
            direction,
            members.len(),
            max_ticks
        );
        FadeBarrier {
            direction,
            members,
            ticks: 0,
            max_ticks,
        }
    }

    /// Check the members, counting one waited tick if any still fade.
    ///
    /// A barrier whose members are already settled resolves on its first
    /// poll, in the same tick it began. That only happens for an empty set
    /// or one whose members were all despawned: a started fade keeps running
    /// until the fader system has ticked it at least once.
    /// With `max_ticks = n`, members that never settle make `poll` return
    /// `Waiting` exactly n times, then `TimedOut`.
    pub fn poll(&mut self, world: &World) -> BarrierStatus {
        let still_fading = self
            .members
            .iter()
            .filter(|e| world.get::<Fader>(**e).is_some_and(|f| f.is_fading()))
            .count();
        if still_fading == 0 {
            debug!(
                "Fade {:?} settled after {} ticks",
                self.direction, self.ticks
            );
            return BarrierStatus::Settled;
        }
        if self.ticks >= self.max_ticks {
            warn!(
                "Fade {:?} gave up after {} ticks with {} of {} entities still fading",
                self.direction,
                self.ticks,
                still_fading,
                self.members.len()
            );
            return BarrierStatus::TimedOut;
        }
        self.ticks += 1;
        BarrierStatus::Waiting
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    /// Ticks waited so far.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn max_ticks(&self) -> u32 {
        self.max_ticks
    }
}
