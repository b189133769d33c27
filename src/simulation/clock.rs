use bevy_ecs::prelude::*;

/// Injected simulation clock. The host advances it explicitly each tick, so
/// the engine never reads wall-clock time and tests can step it precisely.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GameClock {
    now_ms: f64,
    delta_ms: f64,
}

impl GameClock {
    /// Start the timeline at the given instant. Hosts pass wall-clock epoch
    /// milliseconds so journal timestamps come out absolute; tests pass 0.
    pub fn starting_at(start_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            delta_ms: 0.0,
        }
    }

    pub fn advance(&mut self, delta_ms: f64) {
        let delta = delta_ms.max(0.0);
        self.delta_ms = delta;
        self.now_ms += delta;
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    pub fn delta_seconds(&self) -> f64 {
        self.delta_ms / 1000.0
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::starting_at(0.0)
    }
}
