//! Utility functions for the MSTOP solver: the biased randomised draw shared
//! by the mapper and the route builder, and export helpers for the
//! visualization tooling.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use rand::Rng;

use crate::mapper::Mapping;
use crate::problem::Problem;
use crate::solution::Solution;

/// Palette used by the exporters to tell sources (and their customers) apart.
pub const SOURCE_COLORS: [&str; 5] = ["#8FDDF4", "#8DD631", "#A5A5A5", "#DB35EF", "#8153AB"];
pub const NODE_COLOR: &str = "#FDDD71";
pub const DEPOT_COLOR: &str = "#F78181";

/// Biased randomised selection of an index in `0..len`.
///
/// Draws from a discretised quasi-geometric distribution: with `beta` close
/// to 1 the draw almost surely lands on index 0 (pure greedy), while smaller
/// values flatten the bias toward uniform. `beta` must lie strictly inside
/// (0, 1) and `len` must be positive; both are enforced by the callers.
pub fn biased_index<R: Rng + ?Sized>(rng: &mut R, beta: f64, len: usize) -> usize {
    debug_assert!(beta > 0.0 && beta < 1.0);
    debug_assert!(len > 0);

    // gen() is uniform on [0, 1); shift to (0, 1] so the logarithm is finite.
    let u = 1.0 - rng.gen::<f64>();
    (u.ln() / (1.0 - beta).ln()) as usize % len
}

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Export the node table as a tab-separated file for the plotting scripts.
pub fn export_problem<P: AsRef<Path>>(problem: &Problem, path: P) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    for (i, &s) in problem.sources.iter().enumerate() {
        let node = &problem.nodes[s];
        writeln!(
            file,
            "{}\t{}\t{}\t{}\t{}",
            node.id,
            node.x,
            node.y,
            node.revenue,
            SOURCE_COLORS[i % SOURCE_COLORS.len()]
        )?;
    }

    for &c in &problem.customers {
        let node = &problem.nodes[c];
        writeln!(
            file,
            "{}\t{}\t{}\t{}\t{}",
            node.id, node.x, node.y, node.revenue, NODE_COLOR
        )?;
    }

    let depot = &problem.nodes[problem.depot];
    writeln!(
        file,
        "{}\t{}\t{}\t{}\t{}",
        depot.id, depot.x, depot.y, depot.revenue, DEPOT_COLOR
    )?;

    Ok(())
}

/// Export a mapping as a tab-separated file, coloring each customer with a
/// translucent variant of its source's color.
pub fn export_mapping<P: AsRef<Path>>(
    mapping: &Mapping,
    problem: &Problem,
    path: P,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    for (i, &s) in problem.sources.iter().enumerate() {
        let node = &problem.nodes[s];
        writeln!(
            file,
            "{}\t{}\t{}\t{}\t{}",
            node.id,
            node.x,
            node.y,
            node.revenue,
            SOURCE_COLORS[i % SOURCE_COLORS.len()]
        )?;
    }

    for &c in &problem.customers {
        let node = &problem.nodes[c];
        for (i, &s) in problem.sources.iter().enumerate() {
            if mapping.is_assigned(s, c) {
                writeln!(
                    file,
                    "{}\t{}\t{}\t{}\t{}60",
                    node.id,
                    node.x,
                    node.y,
                    node.revenue,
                    SOURCE_COLORS[i % SOURCE_COLORS.len()]
                )?;
            }
        }
    }

    let depot = &problem.nodes[problem.depot];
    writeln!(
        file,
        "{}\t{}\t{}\t{}\t{}",
        depot.id, depot.x, depot.y, depot.revenue, DEPOT_COLOR
    )?;

    Ok(())
}

/// Save a solution to a human-readable text file.
pub fn save_solution<P: AsRef<Path>>(
    solution: &Solution,
    problem: &Problem,
    path: P,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "MSTOP solution for instance: {}", problem.name)?;
    writeln!(file, "Total revenue: {}", solution.revenue)?;
    writeln!(file, "Total cost: {:.2}", solution.cost)?;
    writeln!(file, "Number of routes: {}", solution.routes.len())?;
    writeln!(file)?;

    for (i, route) in solution.routes.iter().enumerate() {
        write!(file, "Route #{}: {}", i + 1, route.source)?;
        for &customer in &route.customers {
            write!(file, " -> {}", customer)?;
        }
        writeln!(file, " -> {}", problem.depot)?;
        writeln!(file, "  Cost: {:.2} / {:.2}", route.cost, problem.tmax)?;
        writeln!(file, "  Revenue: {}", route.revenue)?;
        writeln!(file)?;
    }

    Ok(())
}

/// Dump a solution as pretty-printed JSON.
pub fn save_solution_json<P: AsRef<Path>>(solution: &Solution, path: P) -> std::io::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, solution)?;
    Ok(())
}
