//! Sliding-tile puzzle state representation and move generation.
//!
//! This module provides the leaf layer of the puzzle solver:
//! - A 3x3 board stored as a row-major array of tile values
//! - Move generation in a single canonical direction order
//! - The Manhattan distance heuristic used by A*
//! - Random-walk shuffling that always yields a solvable state
//!
//! Index `i` maps to row `i / N` and column `i % N`. Tile `0` is the blank.
//! Moves are named after the direction the *blank* travels.

use std::fmt;
use std::str::FromStr;

use crate::constants::{BLANK, CELLS, N, SOLVED};
use crate::error::{Error, Result};

/// Direction the blank travels when a move is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Canonical enumeration order used by every search algorithm.
    ///
    /// This order fixes the DFS branch order and the A*/BFS tie-breaking, so
    /// changing it changes which of several equally short paths is returned.
    pub const CANONICAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row and column offset of the blank for this move.
    fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A 3x3 sliding-tile board.
///
/// The tiles are always a permutation of `0..=8`; the only ways to build a
/// state are the validating constructors and moves applied to an existing
/// state. The blank's index is cached alongside the tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuzzleState {
    tiles: [u8; CELLS],
    blank: u8,
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self::solved()
    }
}

impl PuzzleState {
    /// The conventional goal: `1..8` followed by the blank.
    pub const fn solved() -> Self {
        PuzzleState {
            tiles: SOLVED,
            blank: (CELLS - 1) as u8,
        }
    }

    /// Build a state from raw tiles, rejecting anything that is not a
    /// permutation of `0..=8`.
    pub fn try_from_slice(tiles: &[u8]) -> Result<Self> {
        if tiles.len() != CELLS {
            return Err(Error::InvalidStateLength {
                expected: CELLS,
                got: tiles.len(),
            });
        }

        let mut seen = [false; CELLS];
        for &t in tiles {
            let t = t as usize;
            if t >= CELLS || seen[t] {
                return Err(Error::NotAPermutation {
                    state: tiles.to_vec(),
                });
            }
            seen[t] = true;
        }

        let mut out = [0u8; CELLS];
        out.copy_from_slice(tiles);
        let blank = out.iter().position(|&t| t == BLANK).ok_or_else(|| {
            Error::NotAPermutation {
                state: tiles.to_vec(),
            }
        })?;

        Ok(PuzzleState {
            tiles: out,
            blank: blank as u8,
        })
    }

    /// The tiles in row-major order.
    #[inline]
    pub fn tiles(&self) -> &[u8; CELLS] {
        &self.tiles
    }

    /// Index of the blank cell.
    #[inline]
    pub fn blank(&self) -> usize {
        self.blank as usize
    }

    /// Canonical string key, e.g. `"1,2,3,4,5,6,7,8,0"`.
    pub fn key(&self) -> String {
        self.tiles
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Apply a move, or return `None` if the blank would leave the grid.
    pub fn apply(&self, dir: Direction) -> Option<PuzzleState> {
        let (dr, dc) = dir.offset();
        let row = (self.blank() / N) as isize + dr;
        let col = (self.blank() % N) as isize + dc;
        if row < 0 || row >= N as isize || col < 0 || col >= N as isize {
            return None;
        }

        let target = row as usize * N + col as usize;
        let mut next = *self;
        next.tiles.swap(self.blank(), target);
        next.blank = target as u8;
        Some(next)
    }

    /// All legal successors, in [`Direction::CANONICAL`] order.
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, PuzzleState)> + '_ {
        Direction::CANONICAL
            .into_iter()
            .filter_map(move |dir| self.apply(dir).map(|next| (dir, next)))
    }

    /// Slide the tile at `index` into the blank.
    ///
    /// Only a tile orthogonally adjacent to the blank may move.
    pub fn slide(&self, index: usize) -> Result<(Direction, PuzzleState)> {
        if index >= CELLS {
            return Err(Error::InvalidPosition { position: index });
        }
        if !is_adjacent(index, self.blank()) {
            return Err(Error::NotAdjacent { position: index });
        }

        self.neighbors()
            .find(|(_, next)| next.blank() == index)
            .ok_or(Error::NotAdjacent { position: index })
    }

    /// True if `other` is reachable from `self` by exactly one move.
    pub fn is_one_move_from(&self, other: &PuzzleState) -> bool {
        self.neighbors().any(|(_, next)| next == *other)
    }
}

/// True if two cell indices are orthogonal neighbours on the grid.
pub fn is_adjacent(a: usize, b: usize) -> bool {
    let (ar, ac) = ((a / N) as isize, (a % N) as isize);
    let (br, bc) = ((b / N) as isize, (b % N) as isize);
    (ar - br).abs() + (ac - bc).abs() == 1
}

impl TryFrom<&[u8]> for PuzzleState {
    type Error = Error;

    fn try_from(tiles: &[u8]) -> Result<Self> {
        Self::try_from_slice(tiles)
    }
}

impl FromStr for PuzzleState {
    type Err = Error;

    /// Parse `"1,2,3,4,5,6,7,0,8"`, `"1 2 3 4 5 6 7 0 8"` or `"123456708"`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let tokens: Vec<&str> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();

        let tiles = if tokens.len() == 1 && tokens[0].len() > 1 {
            tokens[0]
                .chars()
                .map(|c| {
                    c.to_digit(10).map(|d| d as u8).ok_or_else(|| Error::InvalidTile {
                        token: c.to_string(),
                        context: trimmed.to_string(),
                    })
                })
                .collect::<Result<Vec<u8>>>()?
        } else {
            tokens
                .iter()
                .map(|t| {
                    t.parse::<u8>().map_err(|_| Error::InvalidTile {
                        token: t.to_string(),
                        context: trimmed.to_string(),
                    })
                })
                .collect::<Result<Vec<u8>>>()?
        };

        Self::try_from_slice(&tiles)
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(N) {
            for &t in row {
                if t == BLANK {
                    write!(f, ". ")?;
                } else {
                    write!(f, "{t} ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// =============================================================================
// Heuristic
// =============================================================================

/// Manhattan distance heuristic against a fixed goal.
///
/// Goal positions are tabulated once per search so each estimate is a single
/// pass over the tiles. The estimate is admissible and consistent, which A*
/// relies on for optimality.
#[derive(Debug, Clone)]
pub struct Manhattan {
    goal_index: [usize; CELLS],
}

impl Manhattan {
    pub fn new(goal: &PuzzleState) -> Self {
        let mut goal_index = [0; CELLS];
        for (i, &t) in goal.tiles().iter().enumerate() {
            goal_index[t as usize] = i;
        }
        Self { goal_index }
    }

    /// Sum of per-tile grid distances to the goal, ignoring the blank.
    pub fn estimate(&self, state: &PuzzleState) -> usize {
        state
            .tiles()
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t != BLANK)
            .map(|(i, &t)| {
                let g = self.goal_index[t as usize];
                (i / N).abs_diff(g / N) + (i % N).abs_diff(g % N)
            })
            .sum()
    }
}

// =============================================================================
// Shuffling
// =============================================================================

/// Scramble `from` by `moves` uniformly random blank moves.
///
/// A random walk from the goal can only reach states in the goal's parity
/// class, so the result is always solvable.
pub fn random_walk(from: &PuzzleState, moves: usize, rng: &mut fastrand::Rng) -> PuzzleState {
    let mut state = *from;
    for _ in 0..moves {
        let options: Vec<PuzzleState> = state.neighbors().map(|(_, next)| next).collect();
        state = options[rng.usize(..options.len())];
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_tiles() {
        let err = PuzzleState::try_from_slice(&[1, 1, 3, 4, 5, 6, 7, 8, 0]).unwrap_err();
        assert!(matches!(err, Error::NotAPermutation { .. }));
        assert!(err.to_string().contains("not a permutation of 0..8"));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = PuzzleState::try_from_slice(&[1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidStateLength {
                expected: 9,
                got: 3
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_tile() {
        assert!(PuzzleState::try_from_slice(&[1, 2, 3, 4, 5, 6, 7, 9, 0]).is_err());
    }

    #[test]
    fn test_parse_formats() {
        let a: PuzzleState = "1,2,3,4,5,6,7,0,8".parse().unwrap();
        let b: PuzzleState = "1 2 3 4 5 6 7 0 8".parse().unwrap();
        let c: PuzzleState = "123456708".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.blank(), 7);
        assert!("12345678x".parse::<PuzzleState>().is_err());
    }

    #[test]
    fn test_key_is_comma_joined() {
        assert_eq!(PuzzleState::solved().key(), "1,2,3,4,5,6,7,8,0");
    }

    #[test]
    fn test_corner_blank_has_two_moves() {
        let moves: Vec<Direction> = PuzzleState::solved().neighbors().map(|(d, _)| d).collect();
        assert_eq!(moves, vec![Direction::Up, Direction::Left]);
    }

    #[test]
    fn test_center_blank_has_four_moves_in_canonical_order() {
        let s: PuzzleState = "1,2,3,4,0,5,6,7,8".parse().unwrap();
        let moves: Vec<Direction> = s.neighbors().map(|(d, _)| d).collect();
        assert_eq!(moves, Direction::CANONICAL.to_vec());
    }

    #[test]
    fn test_moves_are_reversible() {
        let s: PuzzleState = "1,2,3,4,0,5,6,7,8".parse().unwrap();
        for dir in Direction::CANONICAL {
            let next = s.apply(dir).unwrap();
            assert!(next.is_one_move_from(&s));
        }
    }

    #[test]
    fn test_manhattan_distance() {
        let goal = PuzzleState::solved();
        let h = Manhattan::new(&goal);
        assert_eq!(h.estimate(&goal), 0);

        let one_off: PuzzleState = "1,2,3,4,5,6,7,0,8".parse().unwrap();
        assert_eq!(h.estimate(&one_off), 1);

        // 8 and 1 swapped through the board: 8 sits at index 0, 1 at index 7
        let far: PuzzleState = "8,2,3,4,5,6,7,1,0".parse().unwrap();
        assert_eq!(h.estimate(&far), (2 + 1) + (2 + 1));
    }

    #[test]
    fn test_manhattan_uses_goal_positions() {
        let goal: PuzzleState = "0,1,2,3,4,5,6,7,8".parse().unwrap();
        let h = Manhattan::new(&goal);
        assert_eq!(h.estimate(&goal), 0);
        assert_eq!(h.estimate(&PuzzleState::solved()), 12);
    }

    #[test]
    fn test_slide_adjacent_tile() {
        let s: PuzzleState = "1,2,3,4,5,6,7,0,8".parse().unwrap();
        let (dir, next) = s.slide(8).unwrap();
        assert_eq!(dir, Direction::Right);
        assert_eq!(next, PuzzleState::solved());

        assert_eq!(s.slide(0), Err(Error::NotAdjacent { position: 0 }));
        assert_eq!(s.slide(9), Err(Error::InvalidPosition { position: 9 }));
    }

    #[test]
    fn test_random_walk_is_deterministic_per_seed() {
        let a = random_walk(&PuzzleState::solved(), 50, &mut fastrand::Rng::with_seed(7));
        let b = random_walk(&PuzzleState::solved(), 50, &mut fastrand::Rng::with_seed(7));
        assert_eq!(a, b);
    }
}
