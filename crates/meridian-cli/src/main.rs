use clap::{Parser, Subcommand, ValueEnum};
use meridian_core::{Node, Workload};
use meridian_scheduler::scheduler::SchedulerConfig;
use meridian_scheduler::types::LatencySnapshot;
use meridian_scheduler::{AnnealingParams, Scheduler};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "meridian", about = "Latency-aware placement engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Greedy,
    Anneal,
    Exhaustive,
}

#[derive(Subcommand)]
enum Commands {
    /// Place a workload onto a node inventory and print the pod -> node mapping
    Place {
        /// Path to a JSON file describing the workload (pods, dependencies, balance factor)
        #[arg(long)]
        workload: PathBuf,
        /// Path to a JSON file describing the node inventory
        #[arg(long)]
        nodes: PathBuf,
        /// Path to a JSON latency snapshot (omit to fall back to a latency-agnostic placement)
        #[arg(long)]
        latency: Option<PathBuf>,
        /// Placement strategy
        #[arg(long, value_enum, default_value_t = Strategy::Greedy)]
        strategy: Strategy,
        /// Target number of distinct nodes to spread across (greedy only; workload's own
        /// balance_factor is used for greedy unless overridden here)
        #[arg(long)]
        balance_factor: Option<usize>,
        /// RNG seed for the annealing solver (omit for a time-seeded run)
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 10_000)]
        max_iter: u64,
        #[arg(long, default_value_t = 1000.0)]
        init_temp: f64,
        #[arg(long, default_value_t = 0.1)]
        final_temp: f64,
        #[arg(long, default_value_t = 0.98)]
        cooling_rate: f64,
        /// Use the normalized composite objective instead of the unnormalized one
        #[arg(long, default_value_t = false)]
        normalized: bool,
        #[arg(long, default_value_t = 0.7)]
        alpha: f64,
        #[arg(long, default_value_t = 0.3)]
        beta: f64,
    },
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Place {
            workload,
            nodes,
            latency,
            strategy,
            balance_factor,
            seed,
            max_iter,
            init_temp,
            final_temp,
            cooling_rate,
            normalized,
            alpha,
            beta,
        } => run_place(
            &workload,
            &nodes,
            latency.as_deref(),
            strategy,
            balance_factor,
            seed,
            max_iter,
            init_temp,
            final_temp,
            cooling_rate,
            normalized,
            alpha,
            beta,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_place(
    workload_path: &std::path::Path,
    nodes_path: &std::path::Path,
    latency_path: Option<&std::path::Path>,
    strategy: Strategy,
    balance_factor: Option<usize>,
    seed: Option<u64>,
    max_iter: u64,
    init_temp: f64,
    final_temp: f64,
    cooling_rate: f64,
    normalized: bool,
    alpha: f64,
    beta: f64,
) -> miette::Result<()> {
    let mut workload: Workload = read_json(workload_path)?;
    if let Some(k) = balance_factor {
        workload.balance_factor = k;
    }
    let nodes: Vec<Node> = read_json(nodes_path)?;
    let snapshot: LatencySnapshot = match latency_path {
        Some(path) => read_json(path)?,
        None => LatencySnapshot::default(),
    };

    let config = SchedulerConfig {
        annealing: AnnealingParams {
            alpha,
            beta,
            max_iter,
            init_temp,
            final_temp,
            cooling_rate,
            seed,
            normalized,
        },
    };
    let scheduler = Scheduler::new(config);

    if !scheduler.has_latency(&snapshot) {
        info!("no latency data available, placement will ignore latency cost");
    }

    let placement = match strategy {
        Strategy::Greedy => scheduler
            .place_greedy(&workload, &nodes, &snapshot)
            .map_err(|e| miette::miette!("{e}"))?,
        Strategy::Anneal => {
            let (placement, result) = scheduler
                .place_annealing(&workload, &nodes, &snapshot, None)
                .map_err(|e| miette::miette!("{e}"))?;
            info!(score = result.score, cancelled = result.cancelled, "annealing complete");
            placement
        }
        Strategy::Exhaustive => {
            let (placement, score) = scheduler
                .place_exhaustive(&workload, &nodes, &snapshot)
                .map_err(|e| miette::miette!("{e}"))?;
            info!(score, "exhaustive search complete");
            placement
        }
    };

    let output = serde_json::to_string_pretty(&placement)
        .map_err(|e| miette::miette!("failed to serialize placement: {e}"))?;
    println!("{output}");

    Ok(())
}

fn read_json<T: for<'de> serde::Deserialize<'de>>(path: &std::path::Path) -> miette::Result<T> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| miette::miette!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| miette::miette!("failed to parse {}: {e}", path.display()))
}
