use serde::{Deserialize, Serialize};

/// Identifier for one of the three regeneration tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolId {
    Slow,
    Medium,
    Fast,
}

impl PoolId {
    pub fn as_str(self) -> &'static str {
        match self {
            PoolId::Slow => "slow",
            PoolId::Medium => "medium",
            PoolId::Fast => "fast",
        }
    }
}

/// Static configuration for one energy pool.
#[derive(Debug, Clone, Copy)]
pub struct EnergyPoolDef {
    pub id: PoolId,
    pub label: &'static str,
    pub max: f64,
    /// Units restored per second of simulated time.
    pub regen_rate: f64,
}

/// Display order: deepest reserve first.
pub const ENERGY_POOLS: [EnergyPoolDef; 3] = [
    EnergyPoolDef {
        id: PoolId::Slow,
        label: "Slow recovery",
        max: 120.0,
        regen_rate: 0.6,
    },
    EnergyPoolDef {
        id: PoolId::Medium,
        label: "Medium recovery",
        max: 80.0,
        regen_rate: 1.2,
    },
    EnergyPoolDef {
        id: PoolId::Fast,
        label: "Fast recovery",
        max: 40.0,
        regen_rate: 3.1,
    },
];

/// Deduction order: cheap, quickly-restored capacity is tapped first so the
/// deep reserve acts as a slowly replenished bank.
pub const SPEND_ORDER: [PoolId; 3] = [PoolId::Fast, PoolId::Medium, PoolId::Slow];

pub fn pool_def(id: PoolId) -> &'static EnergyPoolDef {
    match id {
        PoolId::Slow => &ENERGY_POOLS[0],
        PoolId::Medium => &ENERGY_POOLS[1],
        PoolId::Fast => &ENERGY_POOLS[2],
    }
}

/// A timed gathering task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionDef {
    pub id: &'static str,
    pub name: &'static str,
    pub resource: &'static str,
    pub amount: f64,
    pub duration_ms: f64,
    pub energy_cost: f64,
    pub biome: &'static str,
}

/// A craftable station or tool, buildable only at the home biome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftDef {
    pub id: &'static str,
    pub name: &'static str,
    pub requires: &'static [(&'static str, f64)],
    pub biome: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy)]
pub struct BiomeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub risk: RiskLevel,
}

/// Biome where crafting stations can be assembled.
pub const HOME_BIOME: &str = "base";
/// Biome every fresh or repaired save starts in and always keeps discovered.
pub const STARTING_BIOME: &str = "base";

pub const RESOURCES: [&str; 4] = ["wood", "stone", "fiber", "hide"];

pub const GATHER_ACTIONS: [ActionDef; 6] = [
    ActionDef {
        id: "baseWood",
        name: "Gather deadwood",
        resource: "wood",
        amount: 6.0,
        duration_ms: 4500.0,
        energy_cost: 24.0,
        biome: "base",
    },
    ActionDef {
        id: "baseStone",
        name: "Collect loose stone",
        resource: "stone",
        amount: 4.0,
        duration_ms: 5200.0,
        energy_cost: 28.0,
        biome: "base",
    },
    ActionDef {
        id: "baseFiber",
        name: "Strip plant fiber",
        resource: "fiber",
        amount: 5.0,
        duration_ms: 3800.0,
        energy_cost: 18.0,
        biome: "base",
    },
    ActionDef {
        id: "forestWood",
        name: "Fell forest timber",
        resource: "wood",
        amount: 7.0,
        duration_ms: 5200.0,
        energy_cost: 22.0,
        biome: "forest",
    },
    ActionDef {
        id: "forestHunt",
        name: "Hunt small game",
        resource: "hide",
        amount: 3.0,
        duration_ms: 6200.0,
        energy_cost: 30.0,
        biome: "forest",
    },
    ActionDef {
        id: "cliffStone",
        name: "Quarry basalt",
        resource: "stone",
        amount: 8.0,
        duration_ms: 7000.0,
        energy_cost: 36.0,
        biome: "cliffs",
    },
];

pub const CRAFT_ITEMS: [CraftDef; 4] = [
    CraftDef {
        id: "campfireStation",
        name: "Campfire station",
        requires: &[("wood", 12.0), ("stone", 4.0)],
        biome: HOME_BIOME,
    },
    CraftDef {
        id: "woodenClub",
        name: "Wooden club",
        requires: &[("wood", 12.0), ("fiber", 4.0)],
        biome: HOME_BIOME,
    },
    CraftDef {
        id: "stoneHatchet",
        name: "Stone hatchet",
        requires: &[("wood", 8.0), ("stone", 6.0), ("fiber", 4.0)],
        biome: HOME_BIOME,
    },
    CraftDef {
        id: "fiberSling",
        name: "Fiber sling",
        requires: &[("fiber", 12.0), ("stone", 3.0)],
        biome: HOME_BIOME,
    },
];

pub const BIOMES: [BiomeDef; 3] = [
    BiomeDef {
        id: "base",
        name: "Base Camp",
        description: "A sheltered valley for recovering strength and basic gathering.",
        risk: RiskLevel::Low,
    },
    BiomeDef {
        id: "forest",
        name: "Mist Forest",
        description: "Dense thickets rich in timber and small game.",
        risk: RiskLevel::Medium,
    },
    BiomeDef {
        id: "cliffs",
        name: "Basalt Cliffs",
        description: "Steep rock faces with heavy mineral deposits.",
        risk: RiskLevel::High,
    },
];

pub fn action_def(id: &str) -> Option<&'static ActionDef> {
    GATHER_ACTIONS.iter().find(|action| action.id == id)
}

pub fn craft_def(id: &str) -> Option<&'static CraftDef> {
    CRAFT_ITEMS.iter().find(|item| item.id == id)
}

pub fn biome_def(id: &str) -> Option<&'static BiomeDef> {
    BIOMES.iter().find(|biome| biome.id == id)
}

/// Actions startable from the given biome (exact match).
pub fn available_actions(biome: &str) -> impl Iterator<Item = &'static ActionDef> + '_ {
    GATHER_ACTIONS.iter().filter(move |action| action.biome == biome)
}

/// Crafting is gated to the home biome.
pub fn can_craft_at(biome: &str) -> bool {
    biome == HOME_BIOME
}
