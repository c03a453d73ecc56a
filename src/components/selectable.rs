//! Selectable object info.

use bevy_ecs::prelude::Component;

/// An object the visitor can pick to carry into the next step.
///
/// `name` and `radius` are display strings shown by the inspection step.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct Selectable {
    pub name: String,
    pub radius: String,
    /// Set once the object has been picked; it cannot be picked twice.
    pub selected: bool,
}

impl Selectable {
    pub fn new(name: impl Into<String>, radius: impl Into<String>) -> Self {
        Selectable {
            name: name.into(),
            radius: radius.into(),
            selected: false,
        }
    }
}
