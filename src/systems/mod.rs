//! Tour systems.
//!
//! This module groups the per-tick logic and the world-mutating routines the
//! orchestrator calls.
//!
//! Submodules overview
//! - [`autoaction`] – count down scripted actions while the tour is idle
//! - [`barrier`] – fade-completion barrier over discovered faders
//! - [`bundle`] – spawn/despawn bundle content and the manifest reader thread
//! - [`fader`] – advance fader animations
//! - [`indicator`] – recolour step indicators
//! - [`preserve`] – carry a selected object across a scene switch
//! - [`sweep`] – destroy non-exempt fadeable content
//! - [`time`] – update simulation time and delta
//! - [`tour`] – the exclusive `drive_tour` system and transition phases
//! - [`tween`] – easing and interpolation helpers

pub mod autoaction;
pub mod barrier;
pub mod bundle;
pub mod fader;
pub mod indicator;
pub mod preserve;
pub mod sweep;
pub mod time;
pub mod tour;
pub mod tween;
