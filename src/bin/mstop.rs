//! Command-line entry point for the MSTOP solver.

use clap::Parser;
use mstop::config::Config;
use mstop::problem::Problem;
use mstop::utils::{export_mapping, format_duration, save_solution, save_solution_json};
use mstop::MstopSolver;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "mstop",
    about = "Savings-based heuristic solver for the Multi-Source Team Orienteering Problem"
)]
struct Args {
    /// Path to the instance file.
    instance: PathBuf,

    /// Blend between distance savings and revenue (1 = pure Clarke-Wright).
    #[arg(long, default_value_t = 0.7)]
    alpha: f64,

    /// Number of multistart restarts after the greedy pass.
    #[arg(long, default_value_t = 1000)]
    iterations: u32,

    /// RNG seed; the same seed reproduces the run exactly.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Wall-clock limit in seconds for the multistart loop.
    #[arg(long)]
    time_limit: Option<u64>,

    /// Write the best solution as text to this path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the best solution as JSON to this path.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the customer-to-source mapping to this path.
    #[arg(long)]
    mapping: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let problem = Problem::from_file(&args.instance)?;
    println!(
        "Loaded {}: {} sources, {} customers, Tmax {}",
        problem.name,
        problem.source_count(),
        problem.customer_count(),
        problem.tmax
    );

    let mut config = Config::new()
        .with_alpha(args.alpha)
        .with_iterations(args.iterations)
        .with_seed(args.seed);
    if let Some(secs) = args.time_limit {
        config = config.with_time_limit(Duration::from_secs(secs));
    }

    let mut solver = MstopSolver::new(problem.clone(), config)?;
    let best = solver.run()?.clone();

    println!("Search completed in {}", format_duration(solver.run_time));
    println!("Total revenue: {}", best.revenue);
    println!("Total cost: {:.2}", best.cost);
    println!("Routes: {}", best.routes.len());

    if let Some(path) = &args.output {
        save_solution(&best, &problem, path)?;
        println!("Solution written to {}", path.display());
    }
    if let Some(path) = &args.json {
        save_solution_json(&best, path)?;
        println!("JSON solution written to {}", path.display());
    }
    if let Some(path) = &args.mapping {
        export_mapping(&best.mapping, &problem, path)?;
        println!("Mapping written to {}", path.display());
    }

    Ok(())
}
