//! # Omok Console Game
//!
//! Plays connect-five against the computer on a 15×15 board in the terminal.
//! The human moves first by typing `row col`; the computer answers with either
//! the alpha-beta engine or the parallel MCTS engine.
//!
//! ## Usage
//! ```text
//! play                                  # MCTS, 1000 simulations, one worker per CPU
//! play --strategy alpha-beta --depth 3  # bounded minimax
//! RUST_LOG=debug play --seed 42         # search diagnostics, reproducible playouts
//! ```

use clap::{Parser, ValueEnum};
use omok::alphabeta::DEFAULT_MAX_DEPTH;
use omok::console::{self, BoardStyle};
use omok::game_controller::{GameController, GameStatus, MoveResult, Strategy};
use omok::{MctsConfig, ProgressCallback};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Engine choice on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StrategyArg {
    /// Depth-bounded minimax with alpha-beta pruning
    AlphaBeta,
    /// Multi-threaded Monte Carlo Tree Search
    Mcts,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Play connect-five against the computer", long_about = None)]
struct Args {
    /// Search strategy used by the computer
    #[arg(long, value_enum, default_value_t = StrategyArg::Mcts)]
    strategy: StrategyArg,

    /// Plies searched below each candidate move (alpha-beta)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: u32,

    /// Simulations per computer move (MCTS)
    #[arg(long, default_value_t = 1000)]
    iterations: usize,

    /// Worker threads per search (MCTS)
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// Seed for reproducible playouts (MCTS)
    #[arg(long)]
    seed: Option<u64>,

    /// Disable coloured stones
    #[arg(long, default_value_t = false)]
    no_color: bool,
}

fn main() -> omok::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    let (strategy, style) = match args.strategy {
        StrategyArg::AlphaBeta => (
            Strategy::AlphaBeta { max_depth: args.depth },
            BoardStyle::alpha_beta(),
        ),
        StrategyArg::Mcts => (
            Strategy::Mcts(MctsConfig {
                iterations: args.iterations,
                workers: args.threads,
                seed: args.seed,
            }),
            BoardStyle::mcts(),
        ),
    };
    let mut controller = GameController::new(strategy);

    println!("Omok (connect five) - you play {}, the computer plays {}", style.human, style.computer);
    print_board(&controller, &style);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Enter your move (row col): ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line?;
        let mv = match console::parse_move(&line) {
            Ok(mv) => mv,
            Err(e) => {
                println!("Invalid input ({e}). Try again.");
                continue;
            }
        };

        match controller.apply_human_move(mv.0, mv.1) {
            MoveResult::Invalid { reason } => {
                println!("Invalid move: {reason}. Try again.");
                continue;
            }
            MoveResult::GameOver => break,
            MoveResult::Success { .. } => {}
        }
        if controller.is_game_over() {
            print_board(&controller, &style);
            break;
        }

        println!("AI is thinking...");
        controller.play_computer_move_with_progress(progress_indicator(args.strategy))?;
        println!();
        print_board(&controller, &style);
        if controller.is_game_over() {
            break;
        }
    }

    match controller.get_status() {
        GameStatus::Win(winner) if winner == controller.human() => println!("You win!"),
        GameStatus::Win(_) => println!("AI wins!"),
        GameStatus::Draw => println!("It's a draw!"),
        GameStatus::InProgress => {}
    }
    Ok(())
}

/// One dot per candidate for alpha-beta, a percentage for MCTS
fn progress_indicator(strategy: StrategyArg) -> ProgressCallback {
    match strategy {
        StrategyArg::AlphaBeta => Arc::new(|_: usize, _: usize| {
            print!(".");
            let _ = io::stdout().flush();
        }),
        StrategyArg::Mcts => Arc::new(|done: usize, total: usize| {
            print!("Progress: {:>3}%\r", done * 100 / total);
            let _ = io::stdout().flush();
        }),
    }
}

fn print_board(controller: &GameController, style: &BoardStyle) {
    let board = controller.get_render_state().board();
    print!("{}", console::render(board, controller.human(), style));
}
