//! Search-Engines: classic state-space and game-tree search on small boards.
//!
//! This crate solves the 3x3 sliding-tile puzzle with A*, breadth-first and
//! depth-limited depth-first search, and picks tic-tac-toe moves with plain
//! minimax or alpha-beta pruning. Every search reports the work it did, so
//! the algorithms can be compared on the same input.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, search caps and scoring constants
//! - [`error`] - Input validation errors
//! - [`puzzle`] - Puzzle states, moves and the Manhattan heuristic
//! - [`search`] - A*, BFS and DFS over puzzle states
//! - [`abort`] - Cooperative cancellation for long searches
//! - [`tictactoe`] - Tic-tac-toe board and win detection
//! - [`minimax`] - Minimax, alpha-beta and root move selection
//! - [`session`] - Stateful puzzle and game sessions for front ends
//!
//! ## Example
//!
//! ```
//! use search_engines::puzzle::PuzzleState;
//! use search_engines::search::{Algorithm, SearchConfig, solve};
//! use search_engines::tictactoe::{GameBoard, Player};
//! use search_engines::minimax::{GameAlgorithm, select_move};
//!
//! // Solve a puzzle one move away from the goal
//! let start: PuzzleState = "1,2,3,4,5,6,7,0,8".parse().unwrap();
//! let result = solve(&start, &PuzzleState::solved(), Algorithm::AStar, &SearchConfig::default());
//! assert_eq!(result.moves(), 1);
//!
//! // X completes the top row
//! let board: GameBoard = "XX./OO./...".parse().unwrap();
//! let choice = select_move(&board, Player::X, GameAlgorithm::AlphaBeta);
//! assert_eq!(choice.cell, Some(2));
//! ```

pub mod abort;
pub mod constants;
pub mod error;
pub mod minimax;
pub mod puzzle;
pub mod search;
pub mod session;
pub mod tictactoe;

pub use error::{Error, Result};
