//! Exhaustive game-tree evaluation for tic-tac-toe.
//!
//! This module implements:
//! - Plain minimax over the full remaining game tree
//! - The same recursion with alpha-beta pruning
//! - Root move selection that aggregates search metrics across branches
//!
//! Scores are from O's point of view: O maximizes, X minimizes. A win is
//! worth [`WIN_SCORE`] minus the ply depth at which it occurs, so faster wins
//! and slower losses are preferred. The tree is at most 9 plies deep, so the
//! recursion needs no node cap.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::constants::WIN_SCORE;
use crate::tictactoe::{GameBoard, Player};

/// Which evaluator the move selector runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAlgorithm {
    Minimax,
    AlphaBeta,
}

impl GameAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            GameAlgorithm::Minimax => "Minimax",
            GameAlgorithm::AlphaBeta => "Alpha-Beta",
        }
    }
}

impl fmt::Display for GameAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "minimax" => Ok(GameAlgorithm::Minimax),
            "alphabeta" | "ab" => Ok(GameAlgorithm::AlphaBeta),
            other => Err(format!(
                "unknown algorithm '{other}' (expected minimax or alphabeta)"
            )),
        }
    }
}

/// Value of a subtree plus the work spent computing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimaxResult {
    pub score: i32,
    /// Nodes visited, including the node the call started at.
    pub nodes: u64,
    /// Number of cutoffs. A cutoff counts once, however many siblings it skips.
    pub pruned: u64,
}

// =============================================================================
// Evaluation
// =============================================================================

/// Score of a finished game at `depth`, or `None` if play continues.
fn terminal_score(board: &GameBoard, depth: i32) -> Option<i32> {
    if let Some((winner, _)) = board.winner() {
        return Some(if winner.is_maximizing() {
            WIN_SCORE - depth
        } else {
            depth - WIN_SCORE
        });
    }
    if board.is_full() {
        return Some(0);
    }
    None
}

/// Shared recursion. With `prune` unset the window is carried but never
/// narrows a search, which makes this plain minimax.
fn search(
    board: &mut GameBoard,
    depth: i32,
    maximizing: bool,
    mut alpha: i32,
    mut beta: i32,
    prune: bool,
) -> MinimaxResult {
    let mut result = MinimaxResult {
        score: 0,
        nodes: 1,
        pruned: 0,
    };

    if let Some(score) = terminal_score(board, depth) {
        result.score = score;
        return result;
    }

    let mark = if maximizing { Player::O } else { Player::X };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for i in 0..board.cells().len() {
        if board.get(i).is_some() {
            continue;
        }

        board.set(i, Some(mark));
        let child = search(board, depth + 1, !maximizing, alpha, beta, prune);
        board.set(i, None);

        result.nodes += child.nodes;
        result.pruned += child.pruned;

        if maximizing {
            best = best.max(child.score);
            if prune {
                alpha = alpha.max(best);
            }
        } else {
            best = best.min(child.score);
            if prune {
                beta = beta.min(best);
            }
        }

        if prune && beta <= alpha {
            result.pruned += 1;
            break;
        }
    }

    result.score = best;
    result
}

/// Plain minimax from `board` with `maximizing` to move, `depth` plies below
/// the root of this evaluation.
pub fn minimax(board: &mut GameBoard, depth: i32, maximizing: bool) -> MinimaxResult {
    search(board, depth, maximizing, i32::MIN, i32::MAX, false)
}

/// Minimax with alpha-beta pruning inside the window `(alpha, beta)`.
pub fn alpha_beta(
    board: &mut GameBoard,
    depth: i32,
    maximizing: bool,
    alpha: i32,
    beta: i32,
) -> MinimaxResult {
    search(board, depth, maximizing, alpha, beta, true)
}

/// Evaluate `board` from the root with `to_move` acting next.
pub fn evaluate(board: &GameBoard, to_move: Player, algorithm: GameAlgorithm) -> MinimaxResult {
    let mut scratch = *board;
    let maximizing = to_move.is_maximizing();
    match algorithm {
        GameAlgorithm::Minimax => minimax(&mut scratch, 0, maximizing),
        GameAlgorithm::AlphaBeta => alpha_beta(&mut scratch, 0, maximizing, i32::MIN, i32::MAX),
    }
}

// =============================================================================
// Move Selection
// =============================================================================

/// The move chosen for a player and the metrics of the search behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSelection {
    pub algorithm: GameAlgorithm,
    /// Chosen cell, or `None` when the board is full.
    pub cell: Option<usize>,
    /// Score of the chosen move, from O's point of view.
    pub score: Option<i32>,
    /// Nodes visited, summed over every root branch.
    pub nodes: u64,
    /// Cutoffs, summed over every root branch.
    pub pruned: u64,
    pub elapsed: Duration,
}

impl MoveSelection {
    /// Share of cutoffs relative to visited nodes, as a percentage.
    pub fn pruning_efficiency(&self) -> f64 {
        if self.nodes == 0 {
            0.0
        } else {
            self.pruned as f64 / self.nodes as f64 * 100.0
        }
    }
}

/// Choose the best cell for `player`.
///
/// Every empty cell is tried in ascending order and evaluated for the
/// opponent's reply with a fresh full window. The first cell reaching the
/// best score wins ties, so the choice is reproducible.
pub fn select_move(board: &GameBoard, player: Player, algorithm: GameAlgorithm) -> MoveSelection {
    let started = Instant::now();
    let mut scratch = *board;
    let mut selection = MoveSelection {
        algorithm,
        cell: None,
        score: None,
        nodes: 0,
        pruned: 0,
        elapsed: Duration::ZERO,
    };

    let reply_maximizing = player.opponent().is_maximizing();

    for i in board.empty_cells() {
        scratch.set(i, Some(player));
        let r = match algorithm {
            GameAlgorithm::Minimax => minimax(&mut scratch, 0, reply_maximizing),
            GameAlgorithm::AlphaBeta => {
                alpha_beta(&mut scratch, 0, reply_maximizing, i32::MIN, i32::MAX)
            }
        };
        scratch.set(i, None);

        trace!("{player} at {i}: score {} ({} nodes)", r.score, r.nodes);

        selection.nodes += r.nodes;
        selection.pruned += r.pruned;

        let better = match selection.score {
            None => true,
            Some(best) if player.is_maximizing() => r.score > best,
            Some(best) => r.score < best,
        };
        if better {
            selection.score = Some(r.score);
            selection.cell = Some(i);
        }
    }

    selection.elapsed = started.elapsed();
    debug!(
        "{algorithm} chose {:?} for {player}: score {:?}, {} nodes, {} pruned",
        selection.cell, selection.score, selection.nodes, selection.pruned
    );
    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> GameBoard {
        s.parse().unwrap()
    }

    #[test]
    fn test_completes_top_row() {
        let b = board("XX./OO./...");
        for algorithm in [GameAlgorithm::Minimax, GameAlgorithm::AlphaBeta] {
            let sel = select_move(&b, Player::X, algorithm);
            assert_eq!(sel.cell, Some(2), "{algorithm}");
            assert_eq!(sel.score, Some(-WIN_SCORE), "{algorithm}");
        }
    }

    #[test]
    fn test_o_completes_middle_row() {
        let sel = select_move(&board("XX./OO./X.."), Player::O, GameAlgorithm::AlphaBeta);
        assert_eq!(sel.cell, Some(5));
        assert_eq!(sel.score, Some(WIN_SCORE));
    }

    #[test]
    fn test_blocks_immediate_threat() {
        // X threatens 0-1-2; O must take cell 2
        let sel = select_move(&board("XX./.O./..."), Player::O, GameAlgorithm::Minimax);
        assert_eq!(sel.cell, Some(2));
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        let r = evaluate(&GameBoard::new(), Player::X, GameAlgorithm::Minimax);
        assert_eq!(r.score, 0);
        assert_eq!(r.nodes, 549_946);
        assert_eq!(r.pruned, 0);

        let ab = evaluate(&GameBoard::new(), Player::X, GameAlgorithm::AlphaBeta);
        assert_eq!(ab.score, 0);
        assert!(ab.nodes < r.nodes);
        assert!(ab.pruned > 0);
    }

    #[test]
    fn test_empty_board_selection() {
        let plain = select_move(&GameBoard::new(), Player::X, GameAlgorithm::Minimax);
        assert_eq!(plain.cell, Some(0));
        assert_eq!(plain.score, Some(0));
        assert_eq!(plain.nodes, 549_945);

        let pruned = select_move(&GameBoard::new(), Player::X, GameAlgorithm::AlphaBeta);
        assert_eq!(pruned.cell, plain.cell);
        assert_eq!(pruned.score, plain.score);
        assert!(pruned.nodes <= plain.nodes);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let sel = select_move(&board("XOX/XOO/OXX"), Player::X, GameAlgorithm::Minimax);
        assert_eq!(sel.cell, None);
        assert_eq!(sel.score, None);
        assert_eq!(sel.nodes, 0);
        assert_eq!(sel.pruning_efficiency(), 0.0);
    }

    #[test]
    fn test_terminal_scores_depend_on_depth() {
        let mut won_by_o = board("OOO/XX./X..");
        assert_eq!(minimax(&mut won_by_o, 3, true).score, WIN_SCORE - 3);

        let mut won_by_x = board("XXX/OO./O..");
        assert_eq!(minimax(&mut won_by_x, 2, false).score, 2 - WIN_SCORE);

        let mut drawn = board("XOX/XOO/OXX");
        let r = minimax(&mut drawn, 0, true);
        assert_eq!(r.score, 0);
        assert_eq!(r.nodes, 1);
    }

    #[test]
    fn test_search_restores_board() {
        let original = board("X../.O./...");
        let mut scratch = original;
        minimax(&mut scratch, 0, false);
        alpha_beta(&mut scratch, 0, false, i32::MIN, i32::MAX);
        assert_eq!(scratch, original);
    }

    #[test]
    fn test_cutoff_counts_once_per_node() {
        // O to move with a win at cell 2, one ply down. With beta already at
        // that score the first child closes the window, and the remaining
        // siblings are skipped under a single cutoff
        let mut b = board("OO./XX./X..");
        let r = alpha_beta(&mut b, 0, true, i32::MIN, WIN_SCORE - 1);
        assert_eq!(r.score, WIN_SCORE - 1);
        assert_eq!(r.nodes, 2);
        assert_eq!(r.pruned, 1);
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!("minimax".parse::<GameAlgorithm>(), Ok(GameAlgorithm::Minimax));
        assert_eq!("alpha-beta".parse::<GameAlgorithm>(), Ok(GameAlgorithm::AlphaBeta));
        assert_eq!("AlphaBeta".parse::<GameAlgorithm>(), Ok(GameAlgorithm::AlphaBeta));
        assert!("mcts".parse::<GameAlgorithm>().is_err());
    }
}
