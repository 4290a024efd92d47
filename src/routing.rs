//! Savings-based route construction.
//!
//! Per source, every assigned customer starts on its own stub route from the
//! source to the customer and back to the depot. Stub routes are then merged
//! greedily: candidate edges are drawn from the savings-sorted list through
//! the biased randomised selection, and a merge glues the end of one route to
//! the start of another whenever the combined cost stays within the duration
//! budget. Construction stops early once the active route count reaches the
//! source's vehicle cap; only the top-revenue routes up to the cap survive.

use itertools::Itertools;
use rand::Rng;
use std::cmp::Reverse;

use crate::error::SolverError;
use crate::mapper::Mapping;
use crate::problem::Problem;
use crate::solution::Route;
use crate::utils::biased_index;

/// Per-run scratch state, keyed by node id. Created fresh on every
/// invocation so independent runs never share mutable state.
struct Scratch {
    from_source: Vec<f64>,
    to_depot: Vec<f64>,
    /// Slot of the route a node currently belongs to.
    route_of: Vec<Option<usize>>,
    is_first: Vec<bool>,
    is_last: Vec<bool>,
}

impl Scratch {
    fn new(n_nodes: usize) -> Self {
        Scratch {
            from_source: vec![0.0; n_nodes],
            to_depot: vec![0.0; n_nodes],
            route_of: vec![None; n_nodes],
            is_first: vec![false; n_nodes],
            is_last: vec![false; n_nodes],
        }
    }
}

/// Build the routes of a single source from its assigned customers.
///
/// Returns the total revenue of the retained routes together with the routes
/// themselves, at most the source's vehicle count of them. A source with no
/// assigned customers (or none reachable within the budget) yields zero
/// routes and zero revenue.
pub fn build_routes<R: Rng + ?Sized>(
    problem: &Problem,
    mapping: &Mapping,
    source_id: usize,
    beta: f64,
    rng: &mut R,
) -> Result<(i64, Vec<Route>), SolverError> {
    if !(beta > 0.0 && beta < 1.0) {
        return Err(SolverError::InvalidBeta(beta));
    }
    let source = problem
        .nodes
        .get(source_id)
        .filter(|n| n.is_source)
        .ok_or(SolverError::NotASource(source_id))?;
    let n_vehicles = source.vehicles as usize;

    let mut scratch = Scratch::new(problem.nodes.len());
    let mut slots: Vec<Option<Route>> = Vec::new();
    let mut active = 0usize;

    // Stub routes: one per assigned customer. A customer whose own round
    // trip already exceeds the budget cannot be served at all and is left
    // without a route.
    for customer in mapping.customers_of(source_id) {
        let from_source = problem.get_distance(source_id, customer);
        let to_depot = problem.get_distance(customer, problem.depot);
        scratch.from_source[customer] = from_source;
        scratch.to_depot[customer] = to_depot;

        if from_source + to_depot > problem.tmax {
            continue;
        }

        scratch.is_first[customer] = true;
        scratch.is_last[customer] = true;
        scratch.route_of[customer] = Some(slots.len());
        slots.push(Some(Route::stub(problem, source_id, customer)));
        active += 1;
    }

    // Candidate edges: both endpoints must hold a stub route for this
    // source. Highest savings first.
    let mut candidates = Vec::new();
    for edge in &problem.edges {
        if scratch.route_of[edge.i].is_none() || scratch.route_of[edge.j].is_none() {
            continue;
        }
        let savings = *edge
            .savings
            .get(&source_id)
            .ok_or(SolverError::MissingSavings {
                i: edge.i,
                j: edge.j,
                source: source_id,
            })?;
        candidates.push((savings, edge.i, edge.j, edge.cost));
    }
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

    // Merge scan. Each iteration draws one edge from the remaining sorted
    // candidates; with beta close to 1 this degenerates to a plain
    // descending scan.
    while !candidates.is_empty() {
        let idx = biased_index(rng, beta, candidates.len());
        let (_, i, j, edge_cost) = candidates.remove(idx);

        let (Some(ri), Some(rj)) = (scratch.route_of[i], scratch.route_of[j]) else {
            continue;
        };
        if ri == rj {
            continue;
        }
        if !scratch.is_last[i] || !scratch.is_first[j] {
            continue;
        }

        let merged_cost = {
            let (icost, jcost) = match (&slots[ri], &slots[rj]) {
                (Some(iroute), Some(jroute)) => (iroute.cost, jroute.cost),
                _ => continue,
            };
            icost + jcost + edge_cost - scratch.to_depot[i] - scratch.from_source[j]
        };
        if merged_cost > problem.tmax {
            continue;
        }

        // Merge j's route into i's route.
        scratch.is_last[i] = false;
        scratch.is_first[j] = false;

        let absorbed = match slots[rj].take() {
            Some(route) => route,
            None => continue,
        };
        let host = match slots[ri].as_mut() {
            Some(route) => route,
            None => continue,
        };
        host.cost = merged_cost;
        host.revenue += absorbed.revenue;
        for &node in &absorbed.customers {
            scratch.route_of[node] = Some(ri);
        }
        host.customers.extend(absorbed.customers);
        active -= 1;

        // Deliberate greedy early exit: remaining routes are frozen even if
        // further beneficial merges exist.
        if active == n_vehicles {
            break;
        }
    }

    // Keep only the top-revenue routes up to the vehicle cap. Customers of
    // dropped routes are left unserved; their revenue stays uncollected.
    let routes: Vec<Route> = slots
        .into_iter()
        .flatten()
        .sorted_by_key(|route| Reverse(route.revenue))
        .take(n_vehicles)
        .collect();

    let revenue = routes.iter().map(|route| route.revenue).sum();
    Ok((revenue, routes))
}

/// Run the route builder once per source and aggregate the results.
///
/// Sources are processed in instance order; each source's construction only
/// touches its own assigned customers, so the per-source results are
/// independent given the mapping.
pub fn solve_all<R: Rng + ?Sized>(
    problem: &Problem,
    mapping: &Mapping,
    beta: f64,
    rng: &mut R,
) -> Result<(i64, Vec<Route>), SolverError> {
    let mut total_revenue = 0;
    let mut all_routes = Vec::new();

    for &source in &problem.sources {
        let (revenue, routes) = build_routes(problem, mapping, source, beta, rng)?;
        total_revenue += revenue;
        all_routes.extend(routes);
    }

    Ok((total_revenue, all_routes))
}
