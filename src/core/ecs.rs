use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;

use crate::core::world::{ActionQueue, NoticeLog, SaveDirty};
use crate::simulation::biomes::BiomeState;
use crate::simulation::clock::GameClock;
use crate::simulation::energy::{energy_regen_system, EnergyState};
use crate::simulation::journal::Journal;
use crate::simulation::rng::EventRng;
use crate::simulation::stockpile::{Inventory, Stockpile};
use crate::simulation::vitals::Vitals;
use crate::systems::actions::{action_completion_system, start_action_system, ActiveActions};
use crate::systems::crafting::crafting_system;
use crate::systems::expedition::expedition_system;

/// Canonical tick ordering for the simulation.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum TickSet {
    Intake,
    Simulation,
    Cleanup,
}

/// Build the ECS world with baseline resources.
pub fn create_world(start_ms: f64) -> World {
    let mut world = World::new();
    world.insert_resource(GameClock::starting_at(start_ms));
    world.insert_resource(ActionQueue::default());
    world.insert_resource(NoticeLog::default());
    world.insert_resource(SaveDirty::default());
    world.insert_resource(Vitals::default());
    world.insert_resource(EnergyState::full());
    world.insert_resource(Stockpile::empty());
    world.insert_resource(Inventory::default());
    world.insert_resource(BiomeState::default());
    world.insert_resource(Journal::default());
    world.insert_resource(ActiveActions::default());
    world.insert_resource(EventRng::entropy());
    world
}

/// Build the system schedule in the canonical order: player intents first,
/// then time-driven simulation.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets((TickSet::Intake, TickSet::Simulation, TickSet::Cleanup).chain());

    schedule.add_systems((
        start_action_system.in_set(TickSet::Intake),
        crafting_system.in_set(TickSet::Intake),
        expedition_system.in_set(TickSet::Intake),
        energy_regen_system.in_set(TickSet::Simulation),
        action_completion_system.in_set(TickSet::Simulation),
    ));

    schedule
}
