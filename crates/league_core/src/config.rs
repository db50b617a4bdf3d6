//! Run parameters for the Monte Carlo loop.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::strength::{validate_draw_probability, DEFAULT_DRAW_PROBABILITY};

pub const DEFAULT_TRIALS: u64 = 100_000;
pub const DEFAULT_CHUNK_SIZE: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of independent trials.
    pub trials: u64,
    pub draw_probability: f64,
    /// Fixed seed for reproducible runs; `None` draws a fresh one per run.
    pub seed: Option<u64>,
    /// Shard chunks across the rayon pool.
    pub parallel: bool,
    /// Trials per chunk. Each chunk owns one RNG stream, so results for a
    /// given seed do not depend on the thread count.
    pub chunk_size: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            draw_probability: DEFAULT_DRAW_PROBABILITY,
            seed: None,
            parallel: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SimulationConfig {
    pub fn with_trials(mut self, trials: u64) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_draw_probability(mut self, draw_probability: f64) -> Self {
        self.draw_probability = draw_probability;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(SimError::InvalidConfig("trials must be > 0".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(SimError::InvalidConfig(
                "chunk_size must be > 0".to_string(),
            ));
        }
        validate_draw_probability(self.draw_probability)
    }

    pub fn chunk_count(&self) -> u64 {
        self.trials.div_ceil(self.chunk_size)
    }
}
