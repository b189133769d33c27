use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::world::SaveDirty;
use crate::data::catalog::{pool_def, PoolId, ENERGY_POOLS, SPEND_ORDER};
use crate::simulation::clock::GameClock;

/// Current charge of the three regeneration tiers. Values stay within
/// `[0, pool max]` at all times.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyState {
    pub slow: f64,
    pub medium: f64,
    pub fast: f64,
}

impl EnergyState {
    /// All pools at their configured maximum.
    pub fn full() -> Self {
        Self {
            slow: pool_def(PoolId::Slow).max,
            medium: pool_def(PoolId::Medium).max,
            fast: pool_def(PoolId::Fast).max,
        }
    }

    pub fn current(&self, pool: PoolId) -> f64 {
        match pool {
            PoolId::Slow => self.slow,
            PoolId::Medium => self.medium,
            PoolId::Fast => self.fast,
        }
    }

    pub fn set(&mut self, pool: PoolId, value: f64) {
        let clamped = value.clamp(0.0, pool_def(pool).max);
        match pool {
            PoolId::Slow => self.slow = clamped,
            PoolId::Medium => self.medium = clamped,
            PoolId::Fast => self.fast = clamped,
        }
    }

    /// Sum across all pools.
    pub fn total(&self) -> f64 {
        ENERGY_POOLS.iter().map(|def| self.current(def.id)).sum()
    }

    /// Deducts up to `amount` in the fixed priority order (fast, then medium,
    /// then slow), each pool contributing at most its own balance. Returns
    /// the amount actually deducted; over-asking is not an error, callers
    /// that need affordability check `total()` first.
    pub fn spend(&mut self, amount: f64) -> f64 {
        let mut remaining = amount.max(0.0);
        for pool in SPEND_ORDER {
            if remaining <= 0.0 {
                break;
            }
            let available = self.current(pool);
            let used = available.min(remaining);
            self.set(pool, available - used);
            remaining -= used;
        }
        (amount.max(0.0) - remaining).max(0.0)
    }

    /// Advances every pool by `rate * elapsed`, capped at the pool max.
    /// Returns whether anything changed, for change-driven side effects.
    pub fn regenerate(&mut self, elapsed_seconds: f64) -> bool {
        if elapsed_seconds <= 0.0 {
            return false;
        }
        let mut changed = false;
        for def in ENERGY_POOLS.iter() {
            let before = self.current(def.id);
            let after = (before + def.regen_rate * elapsed_seconds).min(def.max);
            if after != before {
                self.set(def.id, after);
                changed = true;
            }
        }
        changed
    }
}

impl Default for EnergyState {
    fn default() -> Self {
        Self::full()
    }
}

/// System: restores energy by the tick's elapsed time.
pub fn energy_regen_system(
    clock: Res<GameClock>,
    mut energy: ResMut<EnergyState>,
    mut dirty: ResMut<SaveDirty>,
) {
    if energy.regenerate(clock.delta_seconds()) {
        dirty.0 = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_taps_fast_pool_first() {
        let mut energy = EnergyState::full();
        let deducted = energy.spend(22.0);
        assert_eq!(deducted, 22.0);
        assert_eq!(energy.slow, 120.0);
        assert_eq!(energy.medium, 80.0);
        assert_eq!(energy.fast, 18.0);
    }

    #[test]
    fn spend_spills_into_deeper_pools() {
        let mut energy = EnergyState::full();
        let deducted = energy.spend(130.0);
        assert_eq!(deducted, 130.0);
        assert_eq!(energy.fast, 0.0);
        assert_eq!(energy.medium, 0.0);
        assert_eq!(energy.slow, 110.0);
    }

    #[test]
    fn spend_never_goes_negative_and_reports_shortfall() {
        let mut energy = EnergyState {
            slow: 5.0,
            medium: 2.0,
            fast: 1.0,
        };
        let deducted = energy.spend(100.0);
        assert_eq!(deducted, 8.0);
        assert_eq!(energy.total(), 0.0);
    }

    #[test]
    fn regenerate_caps_each_pool_and_reports_change() {
        let mut energy = EnergyState {
            slow: 0.0,
            medium: 0.0,
            fast: 39.5,
        };
        assert!(energy.regenerate(1.0));
        assert_eq!(energy.slow, 0.6);
        assert_eq!(energy.medium, 1.2);
        assert_eq!(energy.fast, 40.0);

        // A long idle stretch saturates everything exactly once.
        assert!(energy.regenerate(10_000.0));
        assert_eq!(energy.slow, 120.0);
        assert_eq!(energy.medium, 80.0);
        assert_eq!(energy.fast, 40.0);
        assert!(!energy.regenerate(5.0));
    }

    #[test]
    fn regeneration_is_monotonic_between_spends() {
        let mut energy = EnergyState {
            slow: 10.0,
            medium: 10.0,
            fast: 10.0,
        };
        let mut previous = energy.total();
        for _ in 0..50 {
            energy.regenerate(0.37);
            let now = energy.total();
            assert!(now >= previous);
            assert!(energy.slow <= 120.0 && energy.medium <= 80.0 && energy.fast <= 40.0);
            previous = now;
        }
    }
}
