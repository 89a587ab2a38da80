use clap::Parser;
use npuzzle_solver::config::SolverConfig;
use npuzzle_solver::utils::parse_state;
use npuzzle_solver::{Algorithm, Heuristic, Outcome, PuzzleState, SearchStats};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to a board file (one row per line, blank as 0 or _)
    #[clap(conflicts_with = "random")]
    board_file: Option<PathBuf>,

    /// Generate a random solvable board of this dimension instead of reading a file
    #[clap(short, long)]
    random: Option<usize>,

    /// Seed for the random board
    #[clap(short, long)]
    seed: Option<u64>,

    /// Search engine: a_star, ida_star or rbfs
    #[clap(short, long)]
    algorithm: Option<Algorithm>,

    /// Heuristic: manhattan or hamming
    #[clap(long)]
    heuristic: Option<Heuristic>,

    /// Abort the search after this many milliseconds
    #[clap(long)]
    time_limit_ms: Option<u64>,

    /// Abort after this many expansions (per iteration for IDA*)
    #[clap(long)]
    max_expansions: Option<u64>,

    /// TOML configuration file; command-line flags take precedence
    #[clap(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("npuzzle_solver=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(args: &Args) -> Result<SolverConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => SolverConfig::load(path)?,
        None => SolverConfig::default(),
    };
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(heuristic) = args.heuristic {
        config.heuristic = heuristic;
    }
    if let Some(dimension) = args.random {
        config.dimension = dimension;
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }
    if args.time_limit_ms.is_some() {
        config.limits.time_limit_millis = args.time_limit_ms;
    }
    if args.max_expansions.is_some() {
        config.limits.max_expansions = args.max_expansions;
    }
    config.validate()?;
    Ok(config)
}

fn read_board_file(path: &PathBuf) -> Result<PuzzleState, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(parse_state(&content)?)
}

fn print_most_revisited(stats: &SearchStats, dim: usize) {
    let Some((key, &count)) = stats
        .history()
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
    else {
        return;
    };
    if count < 2 {
        return;
    }
    match PuzzleState::from_permutation(dim, key.tiles().to_vec()) {
        Ok(state) => println!("Most revisited arrangement ({} visits):\n{}", count, state),
        Err(_) => println!("Most revisited arrangement ({} visits): {}", count, key),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args)?;

    let board = match &args.board_file {
        Some(path) => {
            let board = read_board_file(path)?;
            println!("Loaded board from {}\n", path.display());
            board
        }
        None => config.random_board()?,
    };

    println!("Initial board:\n{}", board);
    let dim = board.dim();
    let mut solver = config.build_solver(board)?;
    println!(
        "Solving with {} / {} ...",
        config.algorithm, config.heuristic
    );
    if !config.edge_costs.is_unit() {
        println!(
            "Edge costs: vertical {}, horizontal {}",
            config.edge_costs.vertical, config.edge_costs.horizontal
        );
    }
    println!();

    let started = Instant::now();
    let outcome = solver.solve();
    let elapsed = started.elapsed();

    match outcome {
        Outcome::Found(cost) => println!("Optimal cost: {}", cost),
        Outcome::NotFound => println!("No solution found (NOT_FOUND)"),
    }
    let stats = solver.stats();
    println!("Elapsed: {:.6} s", elapsed.as_secs_f64());
    println!("Nodes expanded: {}", stats.nodes_expanded);
    println!("Unique states visited: {}", stats.unique_states());
    println!("Duplicate visits: {}", stats.duplicate_visits());
    print_most_revisited(stats, dim);

    if outcome.is_found() {
        println!("Moves: {}\n", solver.moves());
        for (step, state) in solver.solution().iter().enumerate() {
            println!("Step {} (g = {}):\n{}", step, state.g(), state);
        }
    }
    Ok(())
}
