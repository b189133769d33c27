use bevy_ecs::prelude::*;

use crate::core::world::{ActionIntent, ActionQueue, SaveDirty};
use crate::data::catalog::biome_def;
use crate::simulation::biomes::BiomeState;
use crate::simulation::clock::GameClock;
use crate::simulation::journal::{Journal, JournalKind};

/// System: processes switch-biome intents. Switching to the current biome is
/// a no-op. Ids outside the catalog still move the player (and are recorded
/// as discovered) but produce no journal entry.
pub fn expedition_system(
    intents: Res<ActionQueue>,
    clock: Res<GameClock>,
    mut biomes: ResMut<BiomeState>,
    mut journal: ResMut<Journal>,
    mut dirty: ResMut<SaveDirty>,
) {
    for intent in intents.0.iter() {
        if let ActionIntent::SwitchBiome { biome_id } = intent {
            if !biomes.switch(biome_id) {
                continue;
            }
            dirty.0 = true;
            if let Some(biome) = biome_def(biome_id) {
                journal.append(
                    clock.now_ms(),
                    format!("You arrive at {}.", biome.name),
                    JournalKind::Info,
                );
            }
        }
    }
}
