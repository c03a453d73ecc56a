//! Content bundle membership.

use bevy_ecs::prelude::Component;

/// Names the content bundle that spawned (and owns) an entity.
///
/// Unloading a bundle despawns every entity whose `SceneMember` matches its
/// id. Removing this component transfers ownership away from the bundle.
#[derive(Component, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneMember(pub String);

impl SceneMember {
    pub fn new(bundle: impl Into<String>) -> Self {
        SceneMember(bundle.into())
    }

    pub fn bundle(&self) -> &str {
        &self.0
    }

    pub fn is(&self, bundle: &str) -> bool {
        self.0 == bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_bundle_id() {
        let m = SceneMember::new("Scene2");
        assert_eq!(m.bundle(), "Scene2");
        assert!(m.is("Scene2"));
        assert!(!m.is("Scene3"));
    }
}
