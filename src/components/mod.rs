//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the tour's world.
//!
//! Submodules overview:
//! - [`autoaction`] – one-shot timer that fires a scripted tour action
//! - [`exempt`] – marker keeping an entity out of fades and sweeps
//! - [`fader`] – fadeable capability: animated opacity per channel
//! - [`indicator`] – step indicator with its own colour transition
//! - [`persistent`] – marker for entities that live for the whole run
//! - [`scenemember`] – content bundle that owns an entity
//! - [`selectable`] – object the visitor can pick and carry forward
//! - [`tween`] – easing curves shared by faders

pub mod autoaction;
pub mod exempt;
pub mod fader;
pub mod indicator;
pub mod persistent;
pub mod scenemember;
pub mod selectable;
pub mod tween;
