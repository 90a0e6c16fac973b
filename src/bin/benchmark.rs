use clap::Parser;
use omok::alphabeta::AlphaBeta;
use omok::games::gomoku::GomokuState;
use omok::{MctsConfig, SearchStatistics, MCTS};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulations for the MCTS benchmark (default: 10,000)
    #[arg(long, default_value_t = 10_000)]
    iterations: usize,

    /// Number of MCTS worker threads (default: one per CPU)
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// Alpha-beta depth bound (default: 3)
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Seed for MCTS playouts
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the alpha-beta benchmark
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    mcts_only: bool,
}

fn main() -> omok::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    println!("Omok Engine - Benchmark Tool");
    println!("============================");
    println!("MCTS Iterations: {}", args.iterations);
    println!("MCTS Worker Threads: {}", args.threads);
    println!("Alpha-Beta Depth: {}", args.depth);
    println!("----------------------------");

    #[cfg(debug_assertions)]
    println!("WARNING: Running in debug mode. Performance will be significantly lower.\nUse --release for accurate benchmarks.\n");

    // Opening position after the human's centre stone
    let game = GomokuState::new().place(7, 7)?;

    println!("\nRunning MCTS Benchmark...");
    let mcts = MCTS::new(MctsConfig {
        iterations: args.iterations,
        workers: args.threads,
        seed: args.seed,
    });
    let start = Instant::now();
    let (next, stats) = mcts.run_with_stats(&game)?;
    let duration = start.elapsed();
    print_stats("MCTS", &stats, duration);
    if let Some(mv) = next.last_move() {
        println!("  Chosen Move: {}", mv);
    }

    if !args.mcts_only {
        println!("\nRunning Alpha-Beta Benchmark...");
        let start = Instant::now();
        let outcome = AlphaBeta::new(args.depth).search(&game)?;
        let secs = start.elapsed().as_secs_f64();
        println!("Alpha-Beta Results:");
        println!("  Nodes: {}", outcome.nodes);
        println!("  Time: {:.3}s", secs);
        println!("  NPS: {:.0} nodes/sec", outcome.nodes as f64 / secs);
        println!("  Chosen Move: {} (score {})", outcome.best_move, outcome.score);
    }
    Ok(())
}

fn print_stats(name: &str, stats: &SearchStatistics, duration: Duration) {
    let secs = duration.as_secs_f64();
    let nps = stats.total_nodes as f64 / secs;
    let sps = stats.root_visits as f64 / secs;

    println!("{} Results:", name);
    println!("  Total Nodes: {}", stats.total_nodes);
    println!("  Time: {:.3}s", secs);
    println!("  NPS: {:.0} nodes/sec", nps);
    println!("  SPS: {:.0} sims/sec", sps);
    println!("  Root Visits: {}", stats.root_visits);
    if stats.iterations_dropped > 0 {
        println!("  Dropped Iterations: {}", stats.iterations_dropped);
    }
}
