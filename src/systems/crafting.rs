use bevy_ecs::prelude::*;

use crate::core::world::{ActionIntent, ActionQueue, Notice, NoticeLog, SaveDirty};
use crate::data::catalog::{craft_def, CraftDef};
use crate::simulation::biomes::BiomeState;
use crate::simulation::clock::GameClock;
use crate::simulation::journal::{Journal, JournalKind};
use crate::simulation::stockpile::{Inventory, Stockpile};

/// Why a craft request was declined. Declines carry no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftDecline {
    MissingResources,
    WrongBiome,
    UnknownItem,
}

/// Validates the home-biome gate and resource costs; on success deducts
/// every cost and increments the item count.
pub fn attempt_craft(
    item_id: &str,
    biomes: &BiomeState,
    stockpile: &mut Stockpile,
    inventory: &mut Inventory,
) -> Result<&'static CraftDef, CraftDecline> {
    let Some(item) = craft_def(item_id) else {
        return Err(CraftDecline::UnknownItem);
    };
    if item.biome != biomes.current {
        return Err(CraftDecline::WrongBiome);
    }
    if !item
        .requires
        .iter()
        .all(|(resource, cost)| stockpile.has(resource, *cost))
    {
        return Err(CraftDecline::MissingResources);
    }

    for (resource, cost) in item.requires.iter() {
        stockpile.deduct(resource, *cost);
    }
    inventory.add(item_id);
    Ok(item)
}

/// System: processes craft intents.
pub fn crafting_system(
    intents: Res<ActionQueue>,
    clock: Res<GameClock>,
    biomes: Res<BiomeState>,
    mut stockpile: ResMut<Stockpile>,
    mut inventory: ResMut<Inventory>,
    mut journal: ResMut<Journal>,
    mut notices: ResMut<NoticeLog>,
    mut dirty: ResMut<SaveDirty>,
) {
    for intent in intents.0.iter() {
        if let ActionIntent::CraftItem { item_id } = intent {
            match attempt_craft(item_id, &biomes, &mut stockpile, &mut inventory) {
                Ok(item) => {
                    journal.append(
                        clock.now_ms(),
                        format!("Crafted {}.", item.name),
                        JournalKind::Positive,
                    );
                    dirty.0 = true;
                }
                Err(reason) => notices.0.push(Notice::CraftDeclined {
                    item_id: item_id.clone(),
                    reason,
                }),
            }
        }
    }
}
