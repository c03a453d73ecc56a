//! Error type shared by the orchestrator, the plan/config layer and the
//! content loaders.

use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::resources::tourplan::TourState;

/// Everything that can go wrong when driving a tour.
///
/// None of these are fatal to the run-loop: systems log them and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// A transition is already queued or in flight.
    #[error("a transition to {0} is already in progress")]
    Busy(TourState),
    /// `advance` was called on the last step.
    #[error("no step follows {0}")]
    EndOfTour(TourState),
    /// The state has no content bundle mapped to it (e.g. `Start`).
    #[error("{0} has no content bundle")]
    NoBundle(TourState),
    #[error("entity {0} does not exist")]
    NoSuchEntity(Entity),
    #[error("application root has not been spawned")]
    MissingRoot,
    #[error("invalid tour plan: {0}")]
    InvalidPlan(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("bundle '{id}': {reason}")]
    Bundle { id: String, reason: String },
}
