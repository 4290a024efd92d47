//! Savings calculator for the merge heuristic.
//!
//! For every candidate edge (i -> j) and every source s the savings score is
//! the classical Clarke-Wright value, the distance saved by serving i and j
//! on one combined leg instead of two separate round trips, blended with the
//! revenue of the two endpoints:
//!
//! ```text
//! savings[s] = alpha * (d(s, j) + d(i, depot) - cost(i, j))
//!            + (1 - alpha) * (revenue(i) + revenue(j))
//! ```

use crate::error::SolverError;
use crate::problem::Problem;

/// Populate the per-source savings map of every edge in the problem.
///
/// `alpha` blends distance savings against revenue: 1 keeps only the
/// Clarke-Wright term, 0 keeps only the revenue term.
pub fn compute_savings(problem: &mut Problem, alpha: f64) -> Result<(), SolverError> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(SolverError::InvalidAlpha(alpha));
    }

    let Problem {
        ref mut edges,
        ref dists,
        ref nodes,
        ref sources,
        depot,
        ..
    } = *problem;

    for edge in edges.iter_mut() {
        let revenue = (nodes[edge.i].revenue + nodes[edge.j].revenue) as f64;
        edge.savings.clear();

        for &s in sources {
            let detour = dists[s][edge.j] + dists[edge.i][depot] - edge.cost;
            edge.savings
                .insert(s, alpha * detour + (1.0 - alpha) * revenue);
        }
    }

    Ok(())
}
