//! Search-Engines: puzzle solver and tic-tac-toe player.
//!
//! ## Usage
//!
//! - `search-engines solve --start 1,2,3,4,5,6,7,0,8` - Solve with one algorithm
//! - `search-engines compare --start ...` - Run A*, BFS and DFS side by side
//! - `search-engines shuffle --seed 7` - Scramble the goal with random moves
//! - `search-engines best-move --board "XX./OO./..." --player X` - Pick a move
//! - `search-engines self-play` - Play a full game with the AI on both sides

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use search_engines::abort::TimeoutAbortController;
use search_engines::minimax::{GameAlgorithm, select_move};
use search_engines::puzzle::PuzzleState;
use search_engines::search::{Algorithm, SearchConfig, SearchResult, solve_with_abort};
use search_engines::session::{GameSession, GameStatus, PuzzleSession};
use search_engines::tictactoe::{GameBoard, Player};

/// Search-Engines: A*, BFS and DFS on the 8-puzzle, minimax on tic-tac-toe
#[derive(Parser)]
#[command(name = "search-engines")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log search progress at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle with a single algorithm
    Solve {
        /// Start state, e.g. "1,2,3,4,5,6,7,0,8" or "123456708"
        #[arg(short, long)]
        start: String,
        /// Goal state (defaults to 1..8 with the blank last)
        #[arg(short, long)]
        goal: Option<String>,
        /// astar, bfs or dfs
        #[arg(short, long, default_value = "astar")]
        algorithm: Algorithm,
        /// DFS depth bound
        #[arg(long)]
        depth: Option<usize>,
        /// Expansion cap for A* and BFS
        #[arg(long)]
        max_expansions: Option<usize>,
        /// Expansion cap for DFS
        #[arg(long)]
        dfs_max_expansions: Option<usize>,
        /// Give up after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Run A*, BFS and DFS on the same start state
    Compare {
        #[arg(short, long)]
        start: String,
        #[arg(short, long)]
        goal: Option<String>,
        /// DFS depth bound for the comparison
        #[arg(long)]
        depth: Option<usize>,
    },
    /// Scramble the goal with random moves and show the comparison
    Shuffle {
        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
        /// Also run the three-way comparison on the result
        #[arg(long)]
        compare: bool,
    },
    /// Choose the best tic-tac-toe move for a position
    BestMove {
        /// Board as 9 cells, e.g. "XX./OO./..."
        #[arg(short, long)]
        board: String,
        /// Player to move, X or O (inferred from the mark counts if omitted)
        #[arg(short, long)]
        player: Option<String>,
        /// minimax or alphabeta
        #[arg(short, long, default_value = "alphabeta")]
        algorithm: GameAlgorithm,
    },
    /// Play a full game with the AI on both sides
    SelfPlay {
        /// Algorithm for X
        #[arg(short = 'x', long, default_value = "alphabeta")]
        x_algorithm: GameAlgorithm,
        /// Algorithm for O
        #[arg(short = 'o', long, default_value = "alphabeta")]
        o_algorithm: GameAlgorithm,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Solve {
            start,
            goal,
            algorithm,
            depth,
            max_expansions,
            dfs_max_expansions,
            timeout_ms,
        } => {
            let start = parse_state(&start, "start")?;
            let goal = parse_goal(goal.as_deref())?;

            let mut config = SearchConfig::default();
            if let Some(depth) = depth {
                config = config.with_max_depth(depth);
            }
            if let Some(cap) = max_expansions {
                config = config.with_max_expansions(cap);
            }
            if let Some(cap) = dfs_max_expansions {
                config = config.with_dfs_max_expansions(cap);
            }

            let result = match timeout_ms {
                Some(ms) => {
                    let abort = TimeoutAbortController::duration(Duration::from_millis(ms));
                    solve_with_abort(&start, &goal, algorithm, &config, &abort)
                }
                None => search_engines::search::solve(&start, &goal, algorithm, &config),
            };

            println!("Start:\n{start}");
            print_result(&result);
            print_path(&result);
        }
        Commands::Compare { start, goal, depth } => {
            let start = parse_state(&start, "start")?;
            let goal = parse_goal(goal.as_deref())?;

            let mut compare_config = SearchConfig::for_comparison();
            if let Some(depth) = depth {
                compare_config = compare_config.with_max_depth(depth);
            }
            let mut session =
                PuzzleSession::new(goal).with_configs(SearchConfig::default(), compare_config);
            session.start_round(start);
            run_comparison(&mut session)?;
        }
        Commands::Shuffle { seed, compare } => {
            let mut rng = match seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };
            let mut session = PuzzleSession::default();
            let state = session.shuffle(&mut rng);
            println!("Shuffled: {}", state.key());
            println!("{state}");
            if compare {
                run_comparison(&mut session)?;
            }
        }
        Commands::BestMove {
            board,
            player,
            algorithm,
        } => {
            let board: GameBoard = board
                .parse()
                .with_context(|| format!("failed to parse board '{board}'"))?;
            let player = match player {
                Some(p) => p.parse::<Player>()?,
                None => board.player_to_move(),
            };
            if board.is_terminal() {
                bail!("game already over:\n{board}");
            }

            let selection = select_move(&board, player, algorithm);
            println!("{board}");
            match (selection.cell, selection.score) {
                (Some(cell), Some(score)) => {
                    println!("{algorithm} plays {player} at cell {cell} (score {score})")
                }
                _ => println!("{algorithm}: no move available"),
            }
            println!(
                "Nodes: {}, pruned: {} ({:.1}%), time: {:?}",
                selection.nodes,
                selection.pruned,
                selection.pruning_efficiency(),
                selection.elapsed
            );
        }
        Commands::SelfPlay {
            x_algorithm,
            o_algorithm,
        } => {
            let mut game = GameSession::new();
            println!("X: {x_algorithm}, O: {o_algorithm}\n");
            while !game.is_over() {
                let player = game.to_move();
                let algorithm = if player == Player::X {
                    x_algorithm
                } else {
                    o_algorithm
                };
                let selection = game.ai_move(algorithm)?;
                println!(
                    "{player} -> {} ({} nodes, {} pruned)",
                    selection.cell.map_or("-".to_string(), |c| c.to_string()),
                    selection.nodes,
                    selection.pruned
                );
                println!("{}", game.board());
            }
            match game.status() {
                GameStatus::Won { winner, line } => println!("{winner} wins on {line:?}"),
                GameStatus::Draw => println!("Draw"),
                GameStatus::InProgress { .. } => {}
            }
        }
    }

    Ok(())
}

fn parse_state(input: &str, what: &str) -> Result<PuzzleState> {
    input
        .parse()
        .with_context(|| format!("failed to parse {what} state '{input}'"))
}

fn parse_goal(input: Option<&str>) -> Result<PuzzleState> {
    input.map_or(Ok(PuzzleState::solved()), |s| parse_state(s, "goal"))
}

fn run_comparison(session: &mut PuzzleSession) -> Result<()> {
    let comparison = session.compare().context("comparison refused")?;
    println!("=== Comparison ===");
    for result in &comparison.results {
        print_result(result);
    }
    if let Some(best) = session.best_solution() {
        println!("Best: {} with {} moves", best.algorithm, best.moves());
        print_path(best);
    }
    Ok(())
}

fn print_result(result: &SearchResult) {
    let outcome = if result.cancelled {
        "cancelled".to_string()
    } else if let Some(depth) = result.depth_limited {
        format!("no solution within depth {depth}")
    } else if result.timeout {
        "expansion cap reached".to_string()
    } else if result.path.is_empty() && result.expanded > 0 {
        "no solution".to_string()
    } else {
        format!("{} moves", result.moves())
    };
    println!(
        "{:>4}: {outcome}, {} expanded, {:?}",
        result.algorithm.name(),
        result.expanded,
        result.elapsed
    );
}

fn print_path(result: &SearchResult) {
    if result.path.is_empty() {
        return;
    }
    let moves: Vec<&str> = result.path.iter().map(|s| s.direction.name()).collect();
    println!("Path: {}", moves.join(" "));
}
