use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::catalog::STARTING_BIOME;

/// Current location plus every biome the player has ever entered.
/// `discovered` preserves first-visit order and always contains the starting
/// biome; `current` is always a member of it.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeState {
    pub current: String,
    pub discovered: Vec<String>,
}

impl BiomeState {
    pub fn is_discovered(&self, biome_id: &str) -> bool {
        self.discovered.iter().any(|known| known == biome_id)
    }

    /// Moves to `biome_id`. Returns false (no-op) when already there.
    /// Unknown ids are accepted structurally; catalog checks and journaling
    /// are the caller's concern.
    pub fn switch(&mut self, biome_id: &str) -> bool {
        if self.current == biome_id {
            return false;
        }
        self.current = biome_id.to_string();
        if !self.is_discovered(biome_id) {
            self.discovered.push(biome_id.to_string());
        }
        true
    }
}

impl Default for BiomeState {
    fn default() -> Self {
        Self {
            current: STARTING_BIOME.to_string(),
            discovered: vec![STARTING_BIOME.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_discovers_new_biomes_once() {
        let mut biomes = BiomeState::default();
        assert!(biomes.switch("forest"));
        assert_eq!(biomes.current, "forest");
        assert_eq!(biomes.discovered, vec!["base", "forest"]);

        assert!(biomes.switch("base"));
        assert!(biomes.switch("forest"));
        assert_eq!(biomes.discovered, vec!["base", "forest"]);
    }

    #[test]
    fn switch_to_current_is_a_no_op() {
        let mut biomes = BiomeState::default();
        assert!(!biomes.switch("base"));
        assert_eq!(biomes.discovered, vec!["base"]);
    }
}
