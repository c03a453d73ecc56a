//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world.
//!
//! Overview
//! - `approot` – entity that persisted objects are re-parented under
//! - `freelook` – free-look camera collaborator flags
//! - `loader` – bundle loader trait, pollable ops, and the loader resource
//! - `manifest` – JSON bundle manifest format
//! - `manifestloader` – manifest-backed loader with a reader thread
//! - `palette` – indicator colours and timing
//! - `tour` – the orchestrator: current state, queued request, transition
//! - `tourconfig` – INI-backed configuration
//! - `tourplan` – tour states and the step → bundle map
//! - `worldtime` – simulation time and delta
pub mod approot;
pub mod freelook;
pub mod loader;
pub mod manifest;
pub mod manifestloader;
pub mod palette;
pub mod tour;
pub mod tourconfig;
pub mod tourplan;
pub mod worldtime;
