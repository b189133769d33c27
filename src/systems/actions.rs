use std::collections::HashMap;

use bevy_ecs::prelude::*;

use crate::core::world::{ActionIntent, ActionQueue, Notice, NoticeLog, SaveDirty};
use crate::data::catalog::{action_def, ActionDef};
use crate::simulation::biomes::BiomeState;
use crate::simulation::clock::GameClock;
use crate::simulation::energy::EnergyState;
use crate::simulation::journal::{Journal, JournalKind};
use crate::simulation::rng::EventRng;
use crate::simulation::stockpile::Stockpile;
use crate::simulation::vitals::Vitals;
use crate::systems::encounters::resolve_encounters;

/// Why a start request was declined. Declines carry no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDecline {
    InsufficientEnergy,
    WrongBiome,
    AlreadyRunning,
    UnknownAction,
}

/// Progress tracker for one running action.
#[derive(Debug, Clone, Copy)]
pub struct RunningAction {
    pub started_ms: f64,
    pub duration_ms: f64,
}

impl RunningAction {
    pub fn finish_ms(&self) -> f64 {
        self.started_ms + self.duration_ms
    }
}

/// At most one entry per action id; structural re-entrancy gate.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveActions {
    running: HashMap<String, RunningAction>,
}

impl ActiveActions {
    pub fn is_running(&self, action_id: &str) -> bool {
        self.running.contains_key(action_id)
    }

    pub fn begin(&mut self, action_id: &str, started_ms: f64, duration_ms: f64) {
        self.running.insert(
            action_id.to_string(),
            RunningAction {
                started_ms,
                duration_ms,
            },
        );
    }

    /// Elapsed-over-duration ratio in `[0, 1]`; observation only.
    pub fn progress(&self, action_id: &str, now_ms: f64) -> Option<f64> {
        self.running.get(action_id).map(|tracker| {
            if tracker.duration_ms <= 0.0 {
                1.0
            } else {
                ((now_ms - tracker.started_ms) / tracker.duration_ms).clamp(0.0, 1.0)
            }
        })
    }

    /// Removes every action whose duration has elapsed, ordered by finish
    /// time (ties broken by id for determinism).
    pub fn take_completed(&mut self, now_ms: f64) -> Vec<String> {
        let mut done: Vec<(f64, String)> = self
            .running
            .iter()
            .filter(|(_, tracker)| now_ms >= tracker.finish_ms())
            .map(|(id, tracker)| (tracker.finish_ms(), id.clone()))
            .collect();
        done.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1)));
        let ids: Vec<String> = done.into_iter().map(|(_, id)| id).collect();
        for id in ids.iter() {
            self.running.remove(id);
        }
        ids
    }

    /// Discards every tracker; cancelled actions never complete and grant
    /// nothing.
    pub fn cancel_all(&mut self) {
        self.running.clear();
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

/// Validates preconditions and, on success, spends the energy cost and
/// registers the tracker. Declined starts mutate nothing.
pub fn attempt_start(
    action_id: &str,
    clock: &GameClock,
    biomes: &BiomeState,
    energy: &mut EnergyState,
    actions: &mut ActiveActions,
) -> Result<&'static ActionDef, StartDecline> {
    let Some(action) = action_def(action_id) else {
        return Err(StartDecline::UnknownAction);
    };
    if actions.is_running(action_id) {
        return Err(StartDecline::AlreadyRunning);
    }
    if action.biome != biomes.current {
        return Err(StartDecline::WrongBiome);
    }
    if energy.total() < action.energy_cost {
        return Err(StartDecline::InsufficientEnergy);
    }

    energy.spend(action.energy_cost);
    actions.begin(action_id, clock.now_ms(), action.duration_ms);
    Ok(action)
}

/// System: processes start-action intents.
pub fn start_action_system(
    intents: Res<ActionQueue>,
    clock: Res<GameClock>,
    biomes: Res<BiomeState>,
    mut energy: ResMut<EnergyState>,
    mut actions: ResMut<ActiveActions>,
    mut notices: ResMut<NoticeLog>,
    mut dirty: ResMut<SaveDirty>,
) {
    for intent in intents.0.iter() {
        if let ActionIntent::StartAction { action_id } = intent {
            match attempt_start(action_id, &clock, &biomes, &mut energy, &mut actions) {
                Ok(_) => dirty.0 = true,
                Err(reason) => notices.0.push(Notice::StartDeclined {
                    action_id: action_id.clone(),
                    reason,
                }),
            }
        }
    }
}

/// System: resolves every action whose duration has elapsed. Credits the
/// base yield, rolls the encounter table, and journals the results.
pub fn action_completion_system(
    clock: Res<GameClock>,
    mut actions: ResMut<ActiveActions>,
    mut stockpile: ResMut<Stockpile>,
    mut vitals: ResMut<Vitals>,
    mut energy: ResMut<EnergyState>,
    mut journal: ResMut<Journal>,
    mut rng: ResMut<EventRng>,
    mut dirty: ResMut<SaveDirty>,
) {
    let now = clock.now_ms();
    for action_id in actions.take_completed(now) {
        let Some(action) = action_def(&action_id) else {
            continue;
        };

        stockpile.gain(action.resource, action.amount);
        journal.append(
            now,
            format!(
                "{} finished: +{} {}.",
                action.name, action.amount as i64, action.resource
            ),
            JournalKind::Positive,
        );

        let resolved = resolve_encounters(
            action,
            action.amount,
            &mut rng,
            &mut stockpile,
            &mut vitals,
            &mut energy,
        );
        for event in resolved.events {
            journal.append(now, event.message, event.kind);
        }

        dirty.0 = true;
    }
}
