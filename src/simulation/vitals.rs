use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Player health pool. Holds fractional values internally; consumers round
/// for display only.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub current: f64,
    pub max: f64,
}

impl Vitals {
    pub fn new(max: f64) -> Self {
        Self { current: max, max }
    }

    /// Applies a signed delta, clamped into `[0, max]`. Returns the change
    /// actually applied.
    pub fn adjust(&mut self, delta: f64) -> f64 {
        let before = self.current;
        self.current = (self.current + delta).clamp(0.0, self.max);
        self.current - before
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_clamps_at_both_bounds() {
        let mut vitals = Vitals::new(100.0);
        assert_eq!(vitals.adjust(-30.0), -30.0);
        assert_eq!(vitals.current, 70.0);

        assert_eq!(vitals.adjust(-200.0), -70.0);
        assert_eq!(vitals.current, 0.0);

        assert_eq!(vitals.adjust(500.0), 100.0);
        assert_eq!(vitals.current, 100.0);
    }
}
