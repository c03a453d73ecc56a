//! Event types and observers used by the tour.
//!
//! Submodules:
//! - [`bundle`] – commands and messages for the manifest reader thread
//! - [`tour`] – advance/reset/select input events, their observers, and the
//!   step-entered notification
pub mod bundle;
pub mod tour;
