//! Tour orchestrator resource.
//!
//! [`Tour`] owns the authoritative [`TourState`], the [`TourPlan`], the
//! in-flight [`Transition`] and at most one queued [`TourRequest`]. Callers
//! only ever queue requests; the exclusive
//! [`drive_tour`](crate::systems::tour::drive_tour) system starts a queued
//! request when the tour is idle and steps the transition once per tick.
//!
//! The resource is created explicitly at setup and inserted into the world;
//! there is no global instance.

use bevy_ecs::entity::Entity;
use bevy_ecs::prelude::Resource;
use log::debug;

use crate::error::TourError;
use crate::resources::loader::BundleOp;
use crate::resources::tourplan::{TourPlan, TourState};
use crate::systems::barrier::FadeBarrier;

/// Default cap on how many ticks a fade barrier may wait.
pub const DEFAULT_BARRIER_MAX_TICKS: u32 = 10_000;

/// Why a transition was started; decides what happens once it completes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// Plain move to the next step.
    Advance,
    /// Explicit jump to a chosen step.
    Jump,
    /// Jump back to the first step; the camera is sent home afterwards.
    Reset,
    /// Advance while carrying `Entity` across; its exemption is lifted
    /// afterwards.
    Preserve(Entity),
}

/// A transition waiting for `drive_tour` to pick it up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TourRequest {
    pub target: TourState,
    pub kind: TransitionKind,
}

/// Where an in-flight transition is in its fixed sequence.
#[derive(Debug)]
pub enum TransitionPhase {
    /// Waiting for every non-exempt fader to reach opacity 0.
    FadingOut(FadeBarrier),
    /// Despawning the faded-out content.
    Sweeping,
    /// Waiting for the target bundle to load.
    Loading(BundleOp),
    /// Waiting for the previous bundle to unload.
    Unloading(BundleOp),
    /// Applying the target step's side effects.
    Applying,
    /// Waiting for every non-exempt fader to reach opacity 1.
    FadingIn(FadeBarrier),
}

impl TransitionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            TransitionPhase::FadingOut(_) => "fading_out",
            TransitionPhase::Sweeping => "sweeping",
            TransitionPhase::Loading(_) => "loading",
            TransitionPhase::Unloading(_) => "unloading",
            TransitionPhase::Applying => "applying",
            TransitionPhase::FadingIn(_) => "fading_in",
        }
    }
}

/// A transition in flight.
#[derive(Debug)]
pub struct Transition {
    pub from: TourState,
    pub to: TourState,
    pub kind: TransitionKind,
    pub phase: TransitionPhase,
    /// Ticks this transition has been alive for.
    pub ticks: u32,
}

/// The scene-transition orchestrator.
#[derive(Resource, Debug)]
pub struct Tour {
    plan: TourPlan,
    current: TourState,
    pending: Option<TourRequest>,
    transition: Option<Transition>,
    /// Cap handed to every fade barrier.
    pub barrier_max_ticks: u32,
    transitions_completed: u64,
    resets_completed: u64,
}

impl Default for Tour {
    fn default() -> Self {
        Tour::new(TourPlan::default())
    }
}

impl Tour {
    /// Create an orchestrator sitting at [`TourState::Start`].
    pub fn new(plan: TourPlan) -> Self {
        Tour {
            plan,
            current: TourState::Start,
            pending: None,
            transition: None,
            barrier_max_ticks: DEFAULT_BARRIER_MAX_TICKS,
            transitions_completed: 0,
            resets_completed: 0,
        }
    }

    pub fn with_barrier_max_ticks(mut self, max_ticks: u32) -> Self {
        self.barrier_max_ticks = max_ticks;
        self
    }

    pub fn plan(&self) -> &TourPlan {
        &self.plan
    }

    /// Read-only access to the current state.
    pub fn current(&self) -> TourState {
        self.current
    }

    pub fn pending(&self) -> Option<&TourRequest> {
        self.pending.as_ref()
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// True when nothing is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none() && self.transition.is_none()
    }

    pub fn transitions_completed(&self) -> u64 {
        self.transitions_completed
    }

    pub fn resets_completed(&self) -> u64 {
        self.resets_completed
    }

    /// The state `advance` would move to, if a request could be queued now.
    pub fn next_target(&self) -> Result<TourState, TourError> {
        self.ensure_idle()?;
        let next = self.current.next();
        if !self.plan.contains(next) {
            return Err(TourError::EndOfTour(self.current));
        }
        Ok(next)
    }

    /// Queue a move to the next declared step.
    pub fn request_advance(&mut self) -> Result<TourState, TourError> {
        let target = self.next_target()?;
        self.queue(TourRequest {
            target,
            kind: TransitionKind::Advance,
        });
        Ok(target)
    }

    /// Queue a move to an explicit step, bypassing the "+1" rule.
    ///
    /// `Start` can never be targeted.
    pub fn request_jump(&mut self, target: TourState) -> Result<TourState, TourError> {
        self.ensure_idle()?;
        if !self.plan.contains(target) {
            return Err(TourError::NoBundle(target));
        }
        self.queue(TourRequest {
            target,
            kind: TransitionKind::Jump,
        });
        Ok(target)
    }

    /// Queue a jump back to the first step.
    pub fn request_reset(&mut self) -> Result<TourState, TourError> {
        self.ensure_idle()?;
        let target = self.plan.first();
        self.queue(TourRequest {
            target,
            kind: TransitionKind::Reset,
        });
        Ok(target)
    }

    /// Queue an advance that carries `entity` across.
    ///
    /// Callers normally go through
    /// [`on_object_selected`](crate::systems::preserve::on_object_selected),
    /// which also detaches and exempts the entity.
    pub fn request_preserve(&mut self, entity: Entity) -> Result<TourState, TourError> {
        let target = self.next_target()?;
        self.queue(TourRequest {
            target,
            kind: TransitionKind::Preserve(entity),
        });
        Ok(target)
    }

    fn ensure_idle(&self) -> Result<(), TourError> {
        if let Some(t) = &self.transition {
            return Err(TourError::Busy(t.to));
        }
        if let Some(p) = &self.pending {
            return Err(TourError::Busy(p.target));
        }
        Ok(())
    }

    fn queue(&mut self, request: TourRequest) {
        debug!("Queued {:?} to {}", request.kind, request.target);
        self.pending = Some(request);
    }

    /// Take the queued request if no transition is running.
    pub(crate) fn take_pending(&mut self) -> Option<TourRequest> {
        if self.transition.is_some() {
            return None;
        }
        self.pending.take()
    }

    pub(crate) fn take_transition(&mut self) -> Option<Transition> {
        self.transition.take()
    }

    pub(crate) fn store_transition(&mut self, transition: Transition) {
        self.transition = Some(transition);
    }

    /// Commit the new state. Called by the sequencing routine only.
    pub(crate) fn set_current(&mut self, state: TourState) {
        self.current = state;
    }

    pub(crate) fn record_completed(&mut self, kind: TransitionKind) {
        self.transitions_completed += 1;
        if kind == TransitionKind::Reset {
            self.resets_completed += 1;
        }
    }
}
