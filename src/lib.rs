//! # MSTOP
//!
//! A Rust implementation of a two-stage savings-based heuristic for the
//! Multi-Source Team Orienteering Problem: customers are first assigned to
//! sources by a randomized preference draft, then each source builds its
//! vehicle routes by greedily merging stub routes in savings order, subject
//! to a route duration budget and a vehicle cap.
//!
//! The solver is deterministic given a seed: all randomness flows from a
//! single ChaCha stream owned by [`MstopSolver`].

pub mod config;
pub mod error;
pub mod mapper;
pub mod problem;
pub mod routing;
pub mod savings;
pub mod solution;
pub mod utils;

use crate::config::Config;
use crate::error::SolverError;
use crate::mapper::Mapper;
use crate::problem::Problem;
use crate::solution::Solution;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// Beta value that degenerates the biased randomised draw to a pure greedy
/// selection.
pub const GREEDY_BETA: f64 = 0.9999;

/// The main solver structure: owns the problem, the configuration and the
/// RNG, and drives the greedy-then-multistart search.
pub struct MstopSolver {
    pub problem: Problem,
    pub config: Config,
    pub best_solution: Option<Solution>,
    pub run_time: Duration,
    pub iterations: u32,
    rng: ChaCha8Rng,
    start_time: Instant,
}

impl MstopSolver {
    /// Create a new solver for the given problem and configuration.
    ///
    /// Validates both up front and computes the per-source savings scores of
    /// every edge, so the individual passes only read the problem.
    pub fn new(mut problem: Problem, config: Config) -> Result<Self, SolverError> {
        config.validate()?;
        problem.validate()?;
        savings::compute_savings(&mut problem, config.alpha)?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(MstopSolver {
            problem,
            config,
            best_solution: None,
            run_time: Duration::from_secs(0),
            iterations: 0,
            rng,
            start_time: Instant::now(),
        })
    }

    /// Run one full mapper + route-builder pass with the given beta.
    pub fn solve_once(&mut self, beta: f64) -> Result<Solution, SolverError> {
        let mapping = Mapper::map(&self.problem, beta, &mut self.rng)?;
        let (revenue, routes) = routing::solve_all(&self.problem, &mapping, beta, &mut self.rng)?;
        let cost = routes.iter().map(|route| route.cost).sum();

        Ok(Solution {
            mapping,
            routes,
            revenue,
            cost,
        })
    }

    /// Run the full search: one greedy pass, then multistart restarts with
    /// randomized beta, keeping the highest-revenue solution.
    pub fn run(&mut self) -> Result<&Solution, SolverError> {
        self.start_time = Instant::now();
        info!(
            "solving {}: {} sources, {} customers, Tmax {}",
            self.problem.name,
            self.problem.source_count(),
            self.problem.customer_count(),
            self.problem.tmax
        );

        let greedy = self.solve_once(GREEDY_BETA)?;
        debug!("greedy pass: revenue {}", greedy.revenue);
        self.best_solution = Some(greedy);
        self.iterations = 0;

        let (beta_min, beta_max) = self.config.beta_range;
        for _ in 0..self.config.iterations {
            if self.should_terminate() {
                break;
            }

            let beta = self.rng.gen_range(beta_min..=beta_max);
            let candidate = self.solve_once(beta)?;
            self.iterations += 1;

            let improved = self
                .best_solution
                .as_ref()
                .map_or(true, |best| candidate.revenue > best.revenue);
            if improved {
                debug!(
                    "iteration {}: new best revenue {}",
                    self.iterations, candidate.revenue
                );
                self.best_solution = Some(candidate);
            }
        }

        self.run_time = self.start_time.elapsed();
        let best = self
            .best_solution
            .as_ref()
            .expect("the greedy pass always produces a solution");
        info!(
            "finished after {} restarts: revenue {}, {} routes",
            self.iterations,
            best.revenue,
            best.routes.len()
        );
        Ok(best)
    }

    /// Check whether the wall-clock limit has been reached.
    fn should_terminate(&self) -> bool {
        if let Some(time_limit) = self.config.time_limit {
            if Instant::now().duration_since(self.start_time) >= time_limit {
                return true;
            }
        }

        false
    }
}
