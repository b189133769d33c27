use crate::data::catalog::ActionDef;
use crate::data::encounters::{encounter_table, EncounterEffect};
use crate::simulation::energy::EnergyState;
use crate::simulation::journal::JournalKind;
use crate::simulation::rng::EventRng;
use crate::simulation::stockpile::Stockpile;
use crate::simulation::vitals::Vitals;

/// One triggered outcome, ready for the journal.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterEvent {
    pub message: String,
    pub kind: JournalKind,
}

/// Net effect of a completion's random outcomes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedEncounters {
    pub events: Vec<EncounterEvent>,
    pub resource_delta: f64,
    pub health_delta: f64,
    pub energy_delta: f64,
}

/// Rolls the action's outcome table against the injected rng and applies the
/// effects directly to the shared state. Each outcome is drawn independently,
/// so a completion can land a bonus and a hazard at once. Health clamps into
/// `[0, max]`; energy drains route through `spend` and only remove what is
/// present; resource losses are bounded by the gains of this completion.
pub fn resolve_encounters(
    action: &ActionDef,
    gained_so_far: f64,
    rng: &mut EventRng,
    stockpile: &mut Stockpile,
    vitals: &mut Vitals,
    energy: &mut EnergyState,
) -> ResolvedEncounters {
    let mut resolved = ResolvedEncounters::default();

    for outcome in encounter_table(action.id) {
        if !rng.chance(outcome.chance) {
            continue;
        }
        let rolled = f64::from(rng.roll(outcome.min, outcome.max));

        let magnitude = match outcome.effect {
            EncounterEffect::ResourceBonus { resource } => {
                stockpile.gain(resource, rolled);
                resolved.resource_delta += rolled;
                rolled
            }
            EncounterEffect::ResourceLoss { resource } => {
                let removed = stockpile.deduct(resource, rolled.min(gained_so_far));
                if removed <= 0.0 {
                    continue;
                }
                resolved.resource_delta -= removed;
                removed
            }
            EncounterEffect::HealthLoss => {
                let applied = vitals.adjust(-rolled);
                resolved.health_delta += applied;
                -applied
            }
            EncounterEffect::EnergyDrain => {
                let drained = energy.spend(rolled);
                resolved.energy_delta -= drained;
                drained
            }
        };

        resolved.events.push(EncounterEvent {
            message: outcome
                .message
                .replace("{n}", &format!("{}", magnitude.round() as i64)),
            kind: outcome.kind,
        });
    }

    resolved
}
