use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::catalog::RESOURCES;

/// Raw material amounts. Fractional during accrual; floored only for
/// display. Never negative.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stockpile {
    pub amounts: BTreeMap<String, f64>,
}

impl Stockpile {
    /// Every catalog resource present at zero.
    pub fn empty() -> Self {
        let amounts = RESOURCES
            .iter()
            .map(|resource| (resource.to_string(), 0.0))
            .collect();
        Self { amounts }
    }

    pub fn amount(&self, resource: &str) -> f64 {
        self.amounts.get(resource).copied().unwrap_or(0.0)
    }

    pub fn gain(&mut self, resource: &str, amount: f64) {
        if amount <= 0.0 {
            return;
        }
        *self.amounts.entry(resource.to_string()).or_insert(0.0) += amount;
    }

    /// Removes up to `amount`, floored at zero. Returns what was removed.
    pub fn deduct(&mut self, resource: &str, amount: f64) -> f64 {
        let available = self.amount(resource);
        let removed = available.min(amount.max(0.0));
        if removed > 0.0 {
            self.amounts.insert(resource.to_string(), available - removed);
        }
        removed
    }

    pub fn has(&self, resource: &str, amount: f64) -> bool {
        self.amount(resource) >= amount
    }
}

impl Default for Stockpile {
    fn default() -> Self {
        Self::empty()
    }
}

/// Durable crafted stations and tools, counted per item id.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    pub fn add(&mut self, item_id: &str) {
        *self.items.entry(item_id.to_string()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduct_floors_at_zero() {
        let mut stockpile = Stockpile::empty();
        stockpile.gain("wood", 5.0);
        assert_eq!(stockpile.deduct("wood", 8.0), 5.0);
        assert_eq!(stockpile.amount("wood"), 0.0);
        assert_eq!(stockpile.deduct("wood", 1.0), 0.0);
    }

    #[test]
    fn gain_ignores_non_positive_amounts() {
        let mut stockpile = Stockpile::empty();
        stockpile.gain("stone", -3.0);
        stockpile.gain("stone", 0.0);
        assert_eq!(stockpile.amount("stone"), 0.0);
    }

    #[test]
    fn inventory_counts_per_item() {
        let mut inventory = Inventory::default();
        assert_eq!(inventory.count("campfireStation"), 0);
        inventory.add("campfireStation");
        inventory.add("campfireStation");
        assert_eq!(inventory.count("campfireStation"), 2);
    }
}
