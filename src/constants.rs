//! Constants for grid geometry, search bounds, and scoring.
//!
//! These are reference defaults only. Every bound that limits a search is
//! carried at runtime by [`crate::search::SearchConfig`], so callers can tune
//! the runtime/memory trade-off without recompiling.

// =============================================================================
// Puzzle Geometry
// =============================================================================

/// Side length of the sliding-tile grid (3x3).
pub const N: usize = 3;

/// Number of cells on the puzzle grid and on the tic-tac-toe board.
pub const CELLS: usize = N * N;

/// Value that marks the blank cell of the puzzle.
pub const BLANK: u8 = 0;

/// The conventional solved ordering: tiles 1..8 followed by the blank.
pub const SOLVED: [u8; CELLS] = [1, 2, 3, 4, 5, 6, 7, 8, BLANK];

// =============================================================================
// Puzzle Search Bounds
// =============================================================================

/// Default expansion cap for A* and BFS.
pub const MAX_EXPANSIONS: usize = 100_000;

/// Default expansion cap for depth-limited DFS. Larger than [`MAX_EXPANSIONS`]
/// because DFS re-visits states reached along different paths.
pub const DFS_MAX_EXPANSIONS: usize = 200_000;

/// Default DFS depth bound when a single algorithm is run.
pub const DFS_MAX_DEPTH: usize = 75;

/// Default DFS depth bound when all three algorithms are compared.
pub const DFS_COMPARE_DEPTH: usize = 50;

/// Number of random blank moves used to shuffle a solved puzzle.
pub const SHUFFLE_MOVES: usize = 100;

// =============================================================================
// Game Scoring
// =============================================================================

/// Base score of a won game. The ply depth is subtracted so faster wins
/// (and slower losses) are preferred.
pub const WIN_SCORE: i32 = 10;

/// Index triples of the 8 winning lines: 3 rows, 3 columns, 2 diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];
