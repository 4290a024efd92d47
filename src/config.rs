//! Configuration parameters for the MSTOP solver.

use crate::error::SolverError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration settings for the solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Blend between distance savings and revenue in the savings score
    /// (1 = pure Clarke-Wright, 0 = pure revenue).
    pub alpha: f64,
    /// Range the multistart driver draws its beta from at each restart.
    pub beta_range: (f64, f64),
    /// Number of multistart restarts after the initial greedy pass.
    pub iterations: u32,
    /// Seed for the solver's RNG; a fixed seed pins the whole run.
    pub seed: u64,
    /// Optional wall-clock limit for the multistart loop.
    pub time_limit: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            alpha: 0.7,
            beta_range: (0.1, 0.3),
            iterations: 1000,
            seed: 0,
            time_limit: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the savings blend parameter.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the multistart beta range.
    pub fn with_beta_range(mut self, min: f64, max: f64) -> Self {
        self.beta_range = (min, max);
        self
    }

    /// Set the number of multistart restarts.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the wall-clock limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Reject parameter values the heuristics are undefined for.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(SolverError::InvalidAlpha(self.alpha));
        }
        let (min, max) = self.beta_range;
        if !(min > 0.0 && min < 1.0 && max > 0.0 && max < 1.0 && min <= max) {
            return Err(SolverError::InvalidBetaRange(min, max));
        }
        if self.iterations == 0 {
            return Err(SolverError::InvalidIterations);
        }
        Ok(())
    }
}
