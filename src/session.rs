//! Interactive sessions built on top of the search engines.
//!
//! The engines themselves are stateless. A session is the explicit value a
//! front end threads through its calls: the current puzzle or board, move
//! counters, undo history, and the results of the last comparison or move
//! selection.
//!
//! - [`PuzzleSession`]: shuffle, manual play with undo, solve, and a
//!   three-way algorithm comparison that can be replayed step by step
//! - [`GameSession`]: alternating tic-tac-toe play between humans and the
//!   move selector, with win/draw detection and move history

use log::{debug, info};

use crate::constants::SHUFFLE_MOVES;
use crate::error::{Error, Result};
use crate::minimax::{GameAlgorithm, MoveSelection, select_move};
use crate::puzzle::{Direction, PuzzleState, random_walk};
use crate::search::{Algorithm, SearchConfig, SearchResult, solve};
use crate::tictactoe::{GameBoard, Player};

// =============================================================================
// Puzzle Session
// =============================================================================

/// Results of running every algorithm on the same start state.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub start: PuzzleState,
    pub results: Vec<SearchResult>,
}

impl Comparison {
    pub fn get(&self, algorithm: Algorithm) -> Option<&SearchResult> {
        self.results.iter().find(|r| r.algorithm == algorithm)
    }

    /// The A* solution if it found one, otherwise the first non-empty path.
    pub fn best(&self) -> Option<&SearchResult> {
        self.get(Algorithm::AStar)
            .filter(|r| !r.path.is_empty())
            .or_else(|| self.results.iter().find(|r| !r.path.is_empty()))
    }
}

/// State of one sliding-puzzle game.
pub struct PuzzleSession {
    current: PuzzleState,
    goal: PuzzleState,
    /// Start of the current round, restored by [`PuzzleSession::reset`].
    shuffled: Option<PuzzleState>,
    move_count: usize,
    /// States before each manual move, for undo.
    history: Vec<(PuzzleState, usize)>,
    manual_play: bool,
    comparison: Option<Comparison>,
    solve_config: SearchConfig,
    compare_config: SearchConfig,
}

impl Default for PuzzleSession {
    fn default() -> Self {
        Self::new(PuzzleState::solved())
    }
}

impl PuzzleSession {
    /// A session sitting at `goal`.
    pub fn new(goal: PuzzleState) -> Self {
        Self {
            current: goal,
            goal,
            shuffled: None,
            move_count: 0,
            history: Vec::new(),
            manual_play: true,
            comparison: None,
            solve_config: SearchConfig::default(),
            compare_config: SearchConfig::for_comparison(),
        }
    }

    /// Replace the bounds used by [`solve`](Self::solve) and
    /// [`compare`](Self::compare).
    pub fn with_configs(
        mut self,
        solve_config: SearchConfig,
        compare_config: SearchConfig,
    ) -> Self {
        self.solve_config = solve_config;
        self.compare_config = compare_config;
        self
    }

    pub fn current(&self) -> PuzzleState {
        self.current
    }

    pub fn goal(&self) -> PuzzleState {
        self.goal
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn is_solved(&self) -> bool {
        self.current == self.goal
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    /// Scramble the goal with [`SHUFFLE_MOVES`] random moves and start a new
    /// round from the result.
    pub fn shuffle(&mut self, rng: &mut fastrand::Rng) -> PuzzleState {
        let state = random_walk(&self.goal, SHUFFLE_MOVES, rng);
        self.start_round(state);
        info!("shuffled puzzle to {}", state.key());
        state
    }

    /// Start a new round from a given state.
    pub fn start_round(&mut self, state: PuzzleState) {
        self.current = state;
        self.shuffled = Some(state);
        self.move_count = 0;
        self.history.clear();
        self.manual_play = true;
        self.comparison = None;
    }

    /// Slide the tile at `index` into the blank.
    pub fn slide(&mut self, index: usize) -> Result<Direction> {
        if !self.manual_play {
            return Err(Error::ManualPlayDisabled);
        }
        let (direction, next) = self.current.slide(index)?;
        self.history.push((self.current, self.move_count));
        self.current = next;
        self.move_count += 1;
        debug!("manual move {direction}, {} moves so far", self.move_count);
        Ok(direction)
    }

    /// Take back the last manual move.
    pub fn undo(&mut self) -> Result<()> {
        if !self.manual_play {
            return Err(Error::ManualPlayDisabled);
        }
        let (state, count) = self.history.pop().ok_or(Error::NothingToUndo)?;
        self.current = state;
        self.move_count = count;
        Ok(())
    }

    /// Return to the start of the round and re-enable manual play.
    pub fn reset(&mut self) {
        self.current = self.shuffled.unwrap_or(self.goal);
        self.move_count = 0;
        self.history.clear();
        self.manual_play = true;
    }

    /// Solve from the current state with a single algorithm.
    pub fn solve(&self, algorithm: Algorithm) -> SearchResult {
        solve(&self.current, &self.goal, algorithm, &self.solve_config)
    }

    /// Run A*, BFS and DFS from the current state and keep the results.
    ///
    /// Manual play stops once a comparison has been made.
    pub fn compare(&mut self) -> Result<&Comparison> {
        if self.is_solved() {
            return Err(Error::AlreadySolved);
        }
        self.manual_play = false;

        let start = self.current;
        let results = Algorithm::ALL
            .into_iter()
            .map(|algorithm| solve(&start, &self.goal, algorithm, &self.compare_config))
            .collect();

        Ok(&*self.comparison.insert(Comparison { start, results }))
    }

    /// Best path of the last comparison, see [`Comparison::best`].
    pub fn best_solution(&self) -> Option<&SearchResult> {
        self.comparison.as_ref().and_then(Comparison::best)
    }

    /// States visited by `algorithm`'s solution, starting from the compared
    /// start state. The first element is always the start.
    pub fn replay(&self, algorithm: Algorithm) -> Result<Vec<PuzzleState>> {
        let comparison = self.comparison.as_ref().ok_or(Error::NoComparison)?;
        let mut states = vec![comparison.start];
        if let Some(result) = comparison.get(algorithm) {
            states.extend(result.path.iter().map(|step| step.state));
        }
        Ok(states)
    }
}

// =============================================================================
// Game Session
// =============================================================================

/// Where a tic-tac-toe game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress { to_move: Player },
    Won { winner: Player, line: [usize; 3] },
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: Player,
    pub cell: usize,
}

/// State of one tic-tac-toe game. X moves first.
pub struct GameSession {
    board: GameBoard,
    to_move: Player,
    history: Vec<MoveRecord>,
    last_selection: Option<MoveSelection>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            board: GameBoard::new(),
            to_move: Player::X,
            history: Vec::new(),
            last_selection: None,
        }
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Metrics of the most recent AI move.
    pub fn last_selection(&self) -> Option<&MoveSelection> {
        self.last_selection.as_ref()
    }

    /// Pruning efficiency of the most recent AI move, in percent.
    pub fn pruning_efficiency(&self) -> Option<f64> {
        self.last_selection.as_ref().map(MoveSelection::pruning_efficiency)
    }

    pub fn status(&self) -> GameStatus {
        if let Some((winner, line)) = self.board.winner() {
            GameStatus::Won { winner, line }
        } else if self.board.is_full() {
            GameStatus::Draw
        } else {
            GameStatus::InProgress {
                to_move: self.to_move,
            }
        }
    }

    pub fn is_over(&self) -> bool {
        !matches!(self.status(), GameStatus::InProgress { .. })
    }

    /// Place the mark of the player to move and pass the turn.
    pub fn play(&mut self, cell: usize) -> Result<GameStatus> {
        if self.is_over() {
            return Err(Error::GameOver);
        }
        self.board.place(cell, self.to_move)?;
        self.history.push(MoveRecord {
            player: self.to_move,
            cell,
        });

        let status = self.status();
        if let GameStatus::InProgress { .. } = status {
            self.to_move = self.to_move.opponent();
            return Ok(self.status());
        }
        info!("game finished: {status:?}");
        Ok(status)
    }

    /// Let the move selector pick and play a move for the player to move.
    pub fn ai_move(&mut self, algorithm: GameAlgorithm) -> Result<MoveSelection> {
        if self.is_over() {
            return Err(Error::GameOver);
        }
        let selection = select_move(&self.board, self.to_move, algorithm);
        let cell = selection.cell.ok_or(Error::GameOver)?;
        self.play(cell)?;
        self.last_selection = Some(selection);
        Ok(selection)
    }

    /// Play the game out with the move selector on both sides.
    pub fn self_play(&mut self, x: GameAlgorithm, o: GameAlgorithm) -> Result<GameStatus> {
        while !self.is_over() {
            let algorithm = match self.to_move {
                Player::X => x,
                Player::O => o,
            };
            self.ai_move(algorithm)?;
        }
        Ok(self.status())
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_move_away() -> PuzzleState {
        "1,2,3,4,5,6,7,0,8".parse().unwrap()
    }

    #[test]
    fn test_manual_moves_and_undo() {
        let mut session = PuzzleSession::default();
        session.start_round(one_move_away());

        assert_eq!(session.slide(0), Err(Error::NotAdjacent { position: 0 }));
        assert_eq!(session.slide(8), Ok(Direction::Right));
        assert!(session.is_solved());
        assert_eq!(session.move_count(), 1);

        session.undo().unwrap();
        assert_eq!(session.current(), one_move_away());
        assert_eq!(session.move_count(), 0);
        assert_eq!(session.undo(), Err(Error::NothingToUndo));
    }

    #[test]
    fn test_reset_returns_to_round_start() {
        let mut session = PuzzleSession::default();
        session.start_round(one_move_away());
        session.slide(4).unwrap();
        session.slide(3).unwrap();
        session.reset();
        assert_eq!(session.current(), one_move_away());
        assert_eq!(session.move_count(), 0);
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let mut a = PuzzleSession::default();
        let mut b = PuzzleSession::default();
        let sa = a.shuffle(&mut fastrand::Rng::with_seed(42));
        let sb = b.shuffle(&mut fastrand::Rng::with_seed(42));
        assert_eq!(sa, sb);
        assert_eq!(a.current(), sa);
    }

    #[test]
    fn test_compare_and_replay() {
        let mut session = PuzzleSession::default();
        session.start_round(one_move_away());

        let comparison = session.compare().unwrap();
        assert_eq!(comparison.results.len(), 3);
        assert!(comparison.results.iter().all(|r| r.moves() == 1));

        let best = session.best_solution().unwrap();
        assert_eq!(best.algorithm, Algorithm::AStar);

        let states = session.replay(Algorithm::Bfs).unwrap();
        assert_eq!(states, vec![one_move_away(), PuzzleState::solved()]);

        // Manual play is locked until the round is reset
        assert_eq!(session.slide(8), Err(Error::ManualPlayDisabled));
        session.reset();
        assert!(session.slide(8).is_ok());
    }

    #[test]
    fn test_compare_refuses_solved_puzzle() {
        let mut session = PuzzleSession::default();
        assert!(matches!(session.compare(), Err(Error::AlreadySolved)));
        assert_eq!(session.replay(Algorithm::AStar), Err(Error::NoComparison));
    }

    #[test]
    fn test_game_turns_alternate() {
        let mut game = GameSession::new();
        assert_eq!(
            game.play(4),
            Ok(GameStatus::InProgress { to_move: Player::O })
        );
        assert_eq!(game.play(4), Err(Error::Occupied { position: 4 }));
        assert_eq!(game.to_move(), Player::O);
        game.play(0).unwrap();
        assert_eq!(
            game.history(),
            &[
                MoveRecord {
                    player: Player::X,
                    cell: 4
                },
                MoveRecord {
                    player: Player::O,
                    cell: 0
                },
            ]
        );
    }

    #[test]
    fn test_game_detects_win_and_stops() {
        let mut game = GameSession::new();
        for cell in [0, 3, 1, 4] {
            game.play(cell).unwrap();
        }
        assert_eq!(
            game.play(2),
            Ok(GameStatus::Won {
                winner: Player::X,
                line: [0, 1, 2]
            })
        );
        assert_eq!(game.play(8), Err(Error::GameOver));
        assert!(matches!(
            game.ai_move(GameAlgorithm::Minimax),
            Err(Error::GameOver)
        ));
    }

    #[test]
    fn test_ai_takes_the_win() {
        let mut game = GameSession::new();
        for cell in [0, 3, 1, 4] {
            game.play(cell).unwrap();
        }
        let selection = game.ai_move(GameAlgorithm::AlphaBeta).unwrap();
        assert_eq!(selection.cell, Some(2));
        assert!(matches!(game.status(), GameStatus::Won { winner: Player::X, .. }));
        assert_eq!(game.last_selection(), Some(&selection));
    }

    #[test]
    fn test_self_play_is_a_draw() {
        let mut game = GameSession::new();
        let status = game
            .self_play(GameAlgorithm::AlphaBeta, GameAlgorithm::AlphaBeta)
            .unwrap();
        assert_eq!(status, GameStatus::Draw);
        assert_eq!(game.history().len(), 9);

        game.reset();
        assert!(game.history().is_empty());
        assert_eq!(game.to_move(), Player::X);
    }
}
