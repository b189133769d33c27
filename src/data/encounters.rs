use crate::simulation::journal::JournalKind;

/// What a triggered outcome does to the shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterEffect {
    ResourceBonus { resource: &'static str },
    /// Removes up to the rolled amount, bounded by what the action just
    /// yielded and by the stockpile itself.
    ResourceLoss { resource: &'static str },
    HealthLoss,
    EnergyDrain,
}

/// One independently rolled outcome. Outcomes in a table are not mutually
/// exclusive; each is drawn with its own probability on every completion.
#[derive(Debug, Clone, Copy)]
pub struct EncounterDef {
    pub id: &'static str,
    pub chance: f64,
    pub min: i32,
    pub max: i32,
    pub effect: EncounterEffect,
    /// Human-readable line for the journal; `{n}` is replaced with the
    /// rolled magnitude.
    pub message: &'static str,
    pub kind: JournalKind,
}

const BASE_STONE: [EncounterDef; 1] = [EncounterDef {
    id: "baseStoneBruise",
    chance: 0.10,
    min: 2,
    max: 5,
    effect: EncounterEffect::HealthLoss,
    message: "Loose rubble bruises your hands (-{n} health).",
    kind: JournalKind::Danger,
}];

const BASE_FIBER: [EncounterDef; 1] = [EncounterDef {
    id: "baseFiberLuckyPatch",
    chance: 0.15,
    min: 1,
    max: 3,
    effect: EncounterEffect::ResourceBonus { resource: "fiber" },
    message: "A thick patch of stalks yields {n} extra fiber.",
    kind: JournalKind::Positive,
}];

const FOREST_WOOD: [EncounterDef; 2] = [
    EncounterDef {
        id: "forestWoodWindfall",
        chance: 0.25,
        min: 2,
        max: 5,
        effect: EncounterEffect::ResourceBonus { resource: "wood" },
        message: "A windfallen trunk adds {n} bonus wood.",
        kind: JournalKind::Positive,
    },
    EncounterDef {
        id: "forestWoodThorns",
        chance: 0.15,
        min: 3,
        max: 7,
        effect: EncounterEffect::HealthLoss,
        message: "Thorns rake your arms (-{n} health).",
        kind: JournalKind::Danger,
    },
];

const FOREST_HUNT: [EncounterDef; 4] = [
    EncounterDef {
        id: "forestHuntSecondKill",
        chance: 0.20,
        min: 1,
        max: 2,
        effect: EncounterEffect::ResourceBonus { resource: "hide" },
        message: "A second catch adds {n} extra hide.",
        kind: JournalKind::Positive,
    },
    EncounterDef {
        id: "forestHuntGored",
        chance: 0.25,
        min: 5,
        max: 12,
        effect: EncounterEffect::HealthLoss,
        message: "The quarry fights back (-{n} health).",
        kind: JournalKind::Danger,
    },
    EncounterDef {
        id: "forestHuntSpoilage",
        chance: 0.15,
        min: 1,
        max: 2,
        effect: EncounterEffect::ResourceLoss { resource: "hide" },
        message: "Part of the catch spoils (-{n} hide).",
        kind: JournalKind::Danger,
    },
    EncounterDef {
        id: "forestHuntLongChase",
        chance: 0.20,
        min: 6,
        max: 14,
        effect: EncounterEffect::EnergyDrain,
        message: "A long chase drains {n} energy.",
        kind: JournalKind::Danger,
    },
];

const CLIFF_STONE: [EncounterDef; 3] = [
    EncounterDef {
        id: "cliffStoneRichVein",
        chance: 0.20,
        min: 3,
        max: 6,
        effect: EncounterEffect::ResourceBonus { resource: "stone" },
        message: "A rich vein yields {n} bonus stone.",
        kind: JournalKind::Positive,
    },
    EncounterDef {
        id: "cliffStoneRockslide",
        chance: 0.20,
        min: 4,
        max: 10,
        effect: EncounterEffect::HealthLoss,
        message: "A rockslide clips you on the way down (-{n} health).",
        kind: JournalKind::Danger,
    },
    EncounterDef {
        id: "cliffStoneStrain",
        chance: 0.25,
        min: 8,
        max: 16,
        effect: EncounterEffect::EnergyDrain,
        message: "Hauling basalt saps {n} energy.",
        kind: JournalKind::Danger,
    },
];

/// Outcome table for an action id. Actions without a table complete quietly.
pub fn encounter_table(action_id: &str) -> &'static [EncounterDef] {
    match action_id {
        "baseStone" => &BASE_STONE,
        "baseFiber" => &BASE_FIBER,
        "forestWood" => &FOREST_WOOD,
        "forestHunt" => &FOREST_HUNT,
        "cliffStone" => &CLIFF_STONE,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::{action_def, GATHER_ACTIONS, RESOURCES};

    #[test]
    fn tables_reference_catalog_actions_and_resources() {
        for action in GATHER_ACTIONS.iter() {
            for outcome in encounter_table(action.id) {
                assert!(outcome.chance > 0.0 && outcome.chance < 1.0, "{}", outcome.id);
                assert!(outcome.min >= 1 && outcome.min <= outcome.max, "{}", outcome.id);
                assert!(outcome.message.contains("{n}"), "{}", outcome.id);
                match outcome.effect {
                    EncounterEffect::ResourceBonus { resource }
                    | EncounterEffect::ResourceLoss { resource } => {
                        assert!(RESOURCES.contains(&resource), "{}", outcome.id);
                    }
                    EncounterEffect::HealthLoss | EncounterEffect::EnergyDrain => {}
                }
            }
        }
        assert!(action_def("forestHunt").is_some());
        assert!(encounter_table("unknownAction").is_empty());
    }
}
