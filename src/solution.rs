//! Solution representation for the multi-source TOP.

use crate::mapper::Mapping;
use crate::problem::Problem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single vehicle route from a source to the depot.
///
/// The customer sequence holds only the interior nodes; the source-start and
/// depot-end legs are implicit but included in the stored cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Node id of the origin source.
    pub source: usize,
    /// The ordered interior customer ids.
    pub customers: Vec<usize>,
    /// Total travel cost including the source->first and last->depot legs.
    pub cost: f64,
    /// Total revenue of the member customers.
    pub revenue: i64,
}

impl Route {
    /// Create a stub route serving a single customer directly.
    pub fn stub(problem: &Problem, source: usize, customer: usize) -> Self {
        Route {
            source,
            customers: vec![customer],
            cost: problem.get_distance(source, customer)
                + problem.get_distance(customer, problem.depot),
            revenue: problem.nodes[customer].revenue,
        }
    }

    /// Recompute the route cost from the distance matrix.
    ///
    /// Used for verification; on a consistent route this equals the stored
    /// cost within floating-point tolerance.
    pub fn computed_cost(&self, problem: &Problem) -> f64 {
        let Some((&first, &last)) = self.customers.first().zip(self.customers.last()) else {
            return 0.0;
        };

        let mut total = problem.get_distance(self.source, first);
        for pair in self.customers.windows(2) {
            total += problem.get_distance(pair[0], pair[1]);
        }
        total + problem.get_distance(last, problem.depot)
    }

    /// Recompute the route revenue from the node table.
    pub fn computed_revenue(&self, problem: &Problem) -> i64 {
        self.customers
            .iter()
            .map(|&c| problem.nodes[c].revenue)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

/// A complete solution: the customer-to-source mapping plus the routes built
/// for every source.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub mapping: Mapping,
    pub routes: Vec<Route>,
    /// Sum of the retained routes' revenues.
    pub revenue: i64,
    /// Sum of the retained routes' travel costs.
    pub cost: f64,
}

impl Solution {
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Revenue: {}", self.revenue)?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Routes: {}", self.routes.len())?;

        for (i, route) in self.routes.iter().enumerate() {
            writeln!(
                f,
                "  Route {}: source {} {:?} (Cost: {:.2}, Revenue: {})",
                i, route.source, route.customers, route.cost, route.revenue
            )?;
        }

        Ok(())
    }
}
