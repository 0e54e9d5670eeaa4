//! Save slot

use platform_engine::config::{Config, Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where the player is and what they have collected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    /// Current scene
    pub scene: u16,
    /// Scene the player came from; picks the spawnpoint
    pub previous_scene: u16,
    /// Deaths so far
    pub deaths: u32,
    /// Scenes whose strawberry has been collected
    pub strawberries: BTreeSet<u16>,
}

impl Config for Progress {}

impl Progress {
    /// A fresh game starting in `scene`
    pub fn new(scene: u16) -> Self {
        Self {
            scene,
            previous_scene: scene,
            ..Self::default()
        }
    }

    /// Record a scene change
    pub fn enter_scene(&mut self, scene: u16, previous_scene: u16) {
        self.scene = scene;
        self.previous_scene = previous_scene;
    }

    /// Count a death
    pub fn record_death(&mut self) {
        self.deaths += 1;
    }

    /// Mark a scene's strawberry as collected. Returns false if it already was.
    pub fn collect_strawberry(&mut self, scene: u16) -> bool {
        self.strawberries.insert(scene)
    }

    /// Has the scene's strawberry been collected?
    pub fn has_strawberry(&self, scene: u16) -> bool {
        self.strawberries.contains(&scene)
    }

    /// Number of collected strawberries
    pub fn strawberry_count(&self) -> usize {
        self.strawberries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strawberries_count_once_per_scene() {
        let mut progress = Progress::new(2);
        assert!(progress.collect_strawberry(2));
        assert!(!progress.collect_strawberry(2));
        assert!(progress.collect_strawberry(0));
        assert_eq!(progress.strawberry_count(), 2);
    }

    #[test]
    fn test_save_slot_from_ron() {
        let progress = Progress::from_ron_str("(scene: 3, previous_scene: 1, deaths: 4, strawberries: [1])").unwrap();
        assert_eq!(progress.scene, 3);
        assert_eq!(progress.previous_scene, 1);
        assert_eq!(progress.deaths, 4);
        assert!(progress.has_strawberry(1));
    }
}
