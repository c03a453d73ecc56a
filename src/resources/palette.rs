//! Indicator colours.

use bevy_ecs::prelude::Resource;

use crate::components::indicator::Rgba;

/// Colours and timing used when a step recolours the indicators.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct IndicatorPalette {
    /// Colour of every indicator except the selected one.
    pub default: Rgba,
    /// Colour of the selected indicator.
    pub highlight: Rgba,
    /// Seconds each colour change takes.
    pub duration: f32,
}

impl Default for IndicatorPalette {
    fn default() -> Self {
        IndicatorPalette {
            default: Rgba::new(1.0, 1.0, 1.0, 98.0 / 255.0),
            highlight: Rgba::new(217.0 / 255.0, 192.0 / 255.0, 119.0 / 255.0, 1.0),
            duration: 1.0,
        }
    }
}

impl IndicatorPalette {
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Colour indicator `index` should move to when `selected` is highlighted.
    pub fn color_for(&self, index: usize, selected: usize) -> Rgba {
        if index == selected {
            self.highlight
        } else {
            self.default
        }
    }
}
