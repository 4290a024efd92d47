//! Preference-based assignment of customers to sources.
//!
//! Every source ranks all customers by how uniquely well-positioned it is for
//! them, then a round-robin draft hands out customers source by source. Each
//! turn a source may claim up to its vehicle count of customers, drawn from
//! its own ranking through the biased randomised selection, so re-running the
//! mapper with a different RNG stream diversifies the assignment.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SolverError;
use crate::problem::Problem;
use crate::utils::biased_index;

/// The 0/1 assignment matrix produced by the mapper: one row per source, one
/// column per node id. After a complete run every customer column holds
/// exactly one 1 across all rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    source_ids: Vec<usize>,
    matrix: Vec<Vec<u8>>,
}

impl Mapping {
    fn new(source_ids: Vec<usize>, n_nodes: usize) -> Self {
        let rows = source_ids.len();
        Mapping {
            source_ids,
            matrix: vec![vec![0; n_nodes]; rows],
        }
    }

    /// Whether `node_id` is assigned to the source with id `source_id`.
    pub fn is_assigned(&self, source_id: usize, node_id: usize) -> bool {
        self.row(source_id)
            .map_or(false, |row| self.matrix[row][node_id] == 1)
    }

    /// The id of the source `node_id` is assigned to, if any.
    pub fn assigned_source(&self, node_id: usize) -> Option<usize> {
        self.source_ids
            .iter()
            .enumerate()
            .find(|&(row, _)| self.matrix[row][node_id] == 1)
            .map(|(_, &id)| id)
    }

    /// Node ids assigned to the source with id `source_id`.
    pub fn customers_of(&self, source_id: usize) -> Vec<usize> {
        match self.row(source_id) {
            Some(row) => self.matrix[row]
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v == 1)
                .map(|(node, _)| node)
                .collect(),
            None => Vec::new(),
        }
    }

    /// The raw matrix, one row per source in `source_ids` order.
    pub fn matrix(&self) -> &[Vec<u8>] {
        &self.matrix
    }

    /// The source ids labelling the matrix rows.
    pub fn source_ids(&self) -> &[usize] {
        &self.source_ids
    }

    fn row(&self, source_id: usize) -> Option<usize> {
        self.source_ids.iter().position(|&id| id == source_id)
    }
}

/// The randomized round-robin draft assigning customers to sources.
pub struct Mapper;

impl Mapper {
    /// Assign every customer to exactly one source.
    ///
    /// `beta` shapes the quasi-geometric draw over each source's preference
    /// list and must lie strictly inside (0, 1). All scratch state lives in
    /// this invocation; nothing leaks between runs.
    pub fn map<R: Rng + ?Sized>(
        problem: &Problem,
        beta: f64,
        rng: &mut R,
    ) -> Result<Mapping, SolverError> {
        if !(beta > 0.0 && beta < 1.0) {
            return Err(SolverError::InvalidBeta(beta));
        }
        if problem.sources.is_empty() {
            return Err(SolverError::NoSources);
        }
        for &s in &problem.sources {
            if problem.nodes[s].vehicles == 0 {
                return Err(SolverError::SourceWithoutVehicles(s));
            }
        }

        let n_customers = problem.customers.len();
        let n_sources = problem.sources.len();
        let mut mapping = Mapping::new(problem.sources.clone(), problem.nodes.len());
        let mut assigned = vec![false; problem.nodes.len()];

        // One preference list per source: (vote, customer id), where the vote
        // is the source's own distance minus the best competing distance.
        // Lower votes rank first.
        let mut preferences: Vec<Vec<(f64, usize)>> =
            vec![Vec::with_capacity(n_customers); n_sources];

        for &customer in &problem.customers {
            for (row, &s) in problem.sources.iter().enumerate() {
                let own = problem.dists[s][customer];
                let best_other = problem
                    .sources
                    .iter()
                    .filter(|&&other| other != s)
                    .map(|&other| problem.dists[other][customer])
                    .fold(f64::INFINITY, f64::min);
                preferences[row].push((own - best_other, customer));
            }
        }

        for prefs in &mut preferences {
            prefs.sort_by(|a, b| a.0.total_cmp(&b.0));
        }

        // Round-robin draft: each turn a source draws up to its vehicle count
        // of customers from its own list. A draw that lands on a customer
        // already claimed by another source is discarded without counting
        // toward the quota.
        let mut total_assigned = 0;
        let mut turn = 0;
        while total_assigned < n_customers {
            let row = turn % n_sources;
            turn += 1;

            if preferences[row].is_empty() {
                continue;
            }

            let source = problem.sources[row];
            let quota = problem.nodes[source].vehicles as usize;
            let mut picked = 0;

            while total_assigned < n_customers && !preferences[row].is_empty() && picked < quota {
                let idx = biased_index(rng, beta, preferences[row].len());
                let (_, customer) = preferences[row].remove(idx);

                if !assigned[customer] {
                    assigned[customer] = true;
                    mapping.matrix[row][customer] = 1;
                    picked += 1;
                    total_assigned += 1;
                }
            }
        }

        Ok(mapping)
    }
}
