//! Tour states and the state → content bundle map.
//!
//! A tour is an ordered list of [`TourStep`]s preceded by the implicit
//! [`TourState::Start`]. Each step names the content bundle shown while it
//! is current and the side effects applied when it is entered.

use std::fmt;

use serde::Deserialize;

use crate::error::TourError;

/// Where the tour currently is.
///
/// `Start` orders before every step, and steps order by index, so the
/// derived `Ord` matches the declared sequence.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TourState {
    /// Before the first step; has no bundle and is never re-entered.
    #[default]
    Start,
    /// Zero-based step index into the [`TourPlan`].
    Step(usize),
}

impl TourState {
    /// The state that follows this one in declared order.
    pub fn next(self) -> TourState {
        match self {
            TourState::Start => TourState::Step(0),
            TourState::Step(i) => TourState::Step(i + 1),
        }
    }

    pub fn is_start(self) -> bool {
        matches!(self, TourState::Start)
    }

    pub fn index(self) -> Option<usize> {
        match self {
            TourState::Start => None,
            TourState::Step(i) => Some(i),
        }
    }
}

impl fmt::Display for TourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourState::Start => write!(f, "Start"),
            TourState::Step(i) => write!(f, "Step{}", i + 1),
        }
    }
}

/// One step of the tour and its fixed side-effect tuple.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TourStep {
    /// Content bundle loaded while this step is current.
    pub bundle: String,
    /// Whether the free-look camera is enabled on this step.
    #[serde(default)]
    pub free_camera: bool,
    /// Indicator highlighted on this step.
    #[serde(default)]
    pub indicator: usize,
}

impl TourStep {
    pub fn new(bundle: impl Into<String>, free_camera: bool, indicator: usize) -> Self {
        TourStep {
            bundle: bundle.into(),
            free_camera,
            indicator,
        }
    }
}

/// Validated, ordered list of steps.
///
/// Every step has exactly one bundle and bundle ids are unique. A jump or
/// reset onto the current step still loads its bundle a second time before
/// the old instance is unloaded, so loaders must unload by instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TourPlan {
    steps: Vec<TourStep>,
}

impl Default for TourPlan {
    fn default() -> Self {
        TourPlan {
            steps: vec![
                TourStep::new("Scene1", false, 0),
                TourStep::new("Scene2", true, 1),
                TourStep::new("Scene3", true, 2),
            ],
        }
    }
}

impl TourPlan {
    pub fn new(steps: Vec<TourStep>) -> Result<Self, TourError> {
        if steps.is_empty() {
            return Err(TourError::InvalidPlan("a tour needs at least one step".into()));
        }
        for (i, step) in steps.iter().enumerate() {
            if step.bundle.trim().is_empty() {
                return Err(TourError::InvalidPlan(format!(
                    "step {} has an empty bundle id",
                    i + 1
                )));
            }
            if steps[..i].iter().any(|s| s.bundle == step.bundle) {
                return Err(TourError::InvalidPlan(format!(
                    "bundle '{}' is used by more than one step",
                    step.bundle
                )));
            }
        }
        Ok(TourPlan { steps })
    }

    /// Plan whose steps load the given bundles in order.
    ///
    /// The camera is free on every step but the first and step `i`
    /// highlights indicator `i`.
    pub fn from_bundles<I, S>(bundles: I) -> Result<Self, TourError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps = bundles
            .into_iter()
            .enumerate()
            .map(|(i, b)| TourStep::new(b, i > 0, i))
            .collect();
        TourPlan::new(steps)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[TourStep] {
        &self.steps
    }

    /// Step mapped to `state`. `Start` and out-of-range states map to nothing.
    pub fn step(&self, state: TourState) -> Option<&TourStep> {
        state.index().and_then(|i| self.steps.get(i))
    }

    pub fn bundle(&self, state: TourState) -> Option<&str> {
        self.step(state).map(|s| s.bundle.as_str())
    }

    pub fn contains(&self, state: TourState) -> bool {
        self.step(state).is_some()
    }

    pub fn first(&self) -> TourState {
        TourState::Step(0)
    }
}
