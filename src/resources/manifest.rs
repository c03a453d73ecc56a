//! Content bundle manifests.
//!
//! A bundle is described by a JSON document listing the entities it spawns.
//! Every field except `children` is optional:
//!
//! ```json
//! {
//!   "entities": [
//!     { "fade": true, "auto": { "after": 1.0, "action": "advance" } },
//!     {
//!       "fade": true,
//!       "children": [
//!         { "fade": true, "outline": true,
//!           "selectable": { "name": "Earth", "radius": "6371 km" } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Children are spawned with `ChildOf` pointing at their parent.

use std::path::Path;

use serde::Deserialize;

use crate::components::autoaction::ScriptedAction;
use crate::components::tween::Easing;
use crate::error::TourError;

/// Root of a bundle manifest.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BundleManifest {
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
}

/// One entity in a bundle, plus its children.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EntitySpec {
    /// Attach a [`Fader`](crate::components::fader::Fader).
    #[serde(default)]
    pub fade: bool,
    /// Give the fader a second (outline) channel. Ignored without `fade`.
    #[serde(default)]
    pub outline: bool,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub selectable: Option<SelectableSpec>,
    #[serde(default)]
    pub auto: Option<AutoActionSpec>,
    #[serde(default)]
    pub children: Vec<EntitySpec>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SelectableSpec {
    pub name: String,
    #[serde(default)]
    pub radius: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AutoActionSpec {
    pub after: f32,
    pub action: ScriptedAction,
}

impl BundleManifest {
    pub fn new(entities: Vec<EntitySpec>) -> Self {
        BundleManifest { entities }
    }

    /// Parse a manifest from JSON text.
    pub fn from_json(id: &str, text: &str) -> Result<Self, TourError> {
        serde_json::from_str(text).map_err(|e| TourError::Bundle {
            id: id.to_string(),
            reason: format!("invalid manifest: {}", e),
        })
    }

    /// Read and parse a manifest file.
    pub fn load_from_file(id: &str, path: &Path) -> Result<Self, TourError> {
        let text = std::fs::read_to_string(path).map_err(|e| TourError::Bundle {
            id: id.to_string(),
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json(id, &text)
    }

    /// Total number of entities, children included.
    pub fn entity_count(&self) -> usize {
        fn count(spec: &EntitySpec) -> usize {
            1 + spec.children.iter().map(count).sum::<usize>()
        }
        self.entities.iter().map(count).sum()
    }
}

impl EntitySpec {
    pub fn new() -> Self {
        EntitySpec::default()
    }

    pub fn fading(mut self) -> Self {
        self.fade = true;
        self
    }

    pub fn with_outline(mut self) -> Self {
        self.outline = true;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn selectable(mut self, name: impl Into<String>, radius: impl Into<String>) -> Self {
        self.selectable = Some(SelectableSpec {
            name: name.into(),
            radius: radius.into(),
        });
        self
    }

    pub fn auto(mut self, after: f32, action: ScriptedAction) -> Self {
        self.auto = Some(AutoActionSpec { after, action });
        self
    }

    pub fn child(mut self, child: EntitySpec) -> Self {
        self.children.push(child);
        self
    }
}
