//! Tic-tac-toe board representation and terminal detection.
//!
//! The board is a flat array of 9 cells in row-major order. It enforces only
//! that a cell holds at most one mark; whose turn it is lives outside the
//! board, so any arrangement of marks can be evaluated.

use std::fmt;
use std::str::FromStr;

use crate::constants::{CELLS, WINNING_LINES};
use crate::error::{Error, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// O is the maximizing side of the evaluation, X the minimizing side.
    #[inline]
    pub fn is_maximizing(self) -> bool {
        self == Player::O
    }

    pub fn to_char(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl FromStr for Player {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "X" | "x" => Ok(Player::X),
            "O" | "o" => Ok(Player::O),
            other => Err(Error::InvalidPlayer {
                input: other.to_string(),
            }),
        }
    }
}

/// A completed line: the player who owns it and the three cell indices.
pub type Win = (Player, [usize; 3]);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GameBoard {
    cells: [Option<Player>; CELLS],
}

impl GameBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from raw cells, rejecting the wrong length.
    pub fn try_from_slice(cells: &[Option<Player>]) -> Result<Self> {
        if cells.len() != CELLS {
            return Err(Error::InvalidBoardLength {
                expected: CELLS,
                got: cells.len(),
                context: format!("{cells:?}"),
            });
        }
        let mut board = Self::new();
        board.cells.copy_from_slice(cells);
        Ok(board)
    }

    pub fn cells(&self) -> &[Option<Player>; CELLS] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Player> {
        self.cells.get(index).copied().flatten()
    }

    /// Place a mark, rejecting out-of-range and occupied cells.
    pub fn place(&mut self, index: usize, player: Player) -> Result<()> {
        match self.cells.get(index) {
            None => Err(Error::InvalidPosition { position: index }),
            Some(Some(_)) => Err(Error::Occupied { position: index }),
            Some(None) => {
                self.cells[index] = Some(player);
                Ok(())
            }
        }
    }

    /// Unchecked write used by the search for place/retract.
    #[inline]
    pub(crate) fn set(&mut self, index: usize, cell: Option<Player>) {
        self.cells[index] = cell;
    }

    /// First completed line, checked in [`WINNING_LINES`] order.
    pub fn winner(&self) -> Option<Win> {
        WINNING_LINES.iter().find_map(|&line| {
            let [a, b, c] = line;
            match self.cells[a] {
                Some(p) if self.cells[b] == Some(p) && self.cells[c] == Some(p) => Some((p, line)),
                _ => None,
            }
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// Empty cell indices in ascending order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&c| c == Some(player)).count()
    }

    /// Whose turn it is under alternating play. X opens, so X moves
    /// whenever both sides have placed equally.
    pub fn player_to_move(&self) -> Player {
        if self.count(Player::X) > self.count(Player::O) {
            Player::O
        } else {
            Player::X
        }
    }
}

impl FromStr for GameBoard {
    type Err = Error;

    /// Parse 9 cells such as `"XX.OO...."` or `"XX_/OO_/___"`.
    ///
    /// `X`/`O` are marks (either case); `.`, `_` and `-` are empty. Whitespace,
    /// `/`, `|` and `,` are separators and ignored.
    fn from_str(s: &str) -> Result<Self> {
        let context = s.to_string();
        let mut cells = Vec::with_capacity(CELLS);

        for (position, ch) in s
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '/' | '|' | ','))
            .enumerate()
        {
            let cell = match ch {
                'X' | 'x' => Some(Player::X),
                'O' | 'o' => Some(Player::O),
                '.' | '_' | '-' => None,
                character => {
                    return Err(Error::InvalidCellCharacter {
                        character,
                        position,
                        context,
                    });
                }
            };
            cells.push(cell);
        }

        if cells.len() != CELLS {
            return Err(Error::InvalidBoardLength {
                expected: CELLS,
                got: cells.len(),
                context,
            });
        }
        Self::try_from_slice(&cells)
    }
}

impl fmt::Display for GameBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(3) {
            for cell in row {
                let ch = cell.map_or('.', Player::to_char);
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
