//! Uninformed and informed search over the sliding-tile puzzle.
//!
//! Three interchangeable algorithms share one result contract:
//! - A*: best-first by `f = g + h` with the Manhattan heuristic (optimal)
//! - BFS: FIFO frontier with an early goal test (optimal)
//! - DFS: depth-bounded, explicit stack (neither complete nor optimal)
//!
//! Nodes live in an append-only arena and refer to their parent by index.
//! The arena only ever needs to be walked backwards, from the goal to the
//! root, to rebuild the path, and it is dropped when the call returns.
//!
//! Every algorithm is bounded by an expansion cap from [`SearchConfig`] and
//! polls an [`AbortController`] once per expansion. Running out of budget is
//! reported in the [`SearchResult`], never as an error.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::abort::{AbortController, NoAbortController};
use crate::constants::{DFS_COMPARE_DEPTH, DFS_MAX_DEPTH, DFS_MAX_EXPANSIONS, MAX_EXPANSIONS};
use crate::error::Result;
use crate::puzzle::{Direction, Manhattan, PuzzleState};

// =============================================================================
// Configuration and Results
// =============================================================================

/// Which puzzle search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    AStar,
    Bfs,
    Dfs,
}

impl Algorithm {
    /// All algorithms, in the order a comparison runs them.
    pub const ALL: [Algorithm; 3] = [Algorithm::AStar, Algorithm::Bfs, Algorithm::Dfs];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::AStar => "A*",
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a*" | "astar" | "a-star" => Ok(Algorithm::AStar),
            "bfs" => Ok(Algorithm::Bfs),
            "dfs" => Ok(Algorithm::Dfs),
            other => Err(format!("unknown algorithm '{other}' (expected astar, bfs or dfs)")),
        }
    }
}

/// Runtime bounds for a puzzle search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of expansions for A* and BFS.
    pub max_expansions: usize,
    /// Maximum number of expansions for DFS.
    pub dfs_max_expansions: usize,
    /// DFS depth bound. States at this depth are not expanded.
    pub max_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: MAX_EXPANSIONS,
            dfs_max_expansions: DFS_MAX_EXPANSIONS,
            max_depth: DFS_MAX_DEPTH,
        }
    }
}

impl SearchConfig {
    /// Defaults used when all three algorithms are run side by side.
    pub fn for_comparison() -> Self {
        Self {
            max_depth: DFS_COMPARE_DEPTH,
            ..Self::default()
        }
    }

    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    pub fn with_max_expansions(self, max_expansions: usize) -> Self {
        Self {
            max_expansions,
            ..self
        }
    }

    pub fn with_dfs_max_expansions(self, dfs_max_expansions: usize) -> Self {
        Self {
            dfs_max_expansions,
            ..self
        }
    }
}

/// One move of a solution and the state it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub direction: Direction,
    pub state: PuzzleState,
}

/// Outcome of a single search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub algorithm: Algorithm,
    /// Moves from the step after the start through the goal. Empty when the
    /// start already is the goal, or when no solution was found.
    pub path: Vec<Step>,
    /// Number of states expanded.
    pub expanded: usize,
    /// The expansion cap was reached (BFS and DFS).
    pub timeout: bool,
    /// DFS failed; carries the depth bound that was used.
    pub depth_limited: Option<usize>,
    /// The abort controller requested cancellation.
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl SearchResult {
    fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            path: Vec::new(),
            expanded: 0,
            timeout: false,
            depth_limited: None,
            cancelled: false,
            elapsed: Duration::ZERO,
        }
    }

    /// Number of moves in the returned path.
    pub fn moves(&self) -> usize {
        self.path.len()
    }

    /// Final state of the path, if any.
    pub fn final_state(&self) -> Option<PuzzleState> {
        self.path.last().map(|s| s.state)
    }
}

// =============================================================================
// Node Arena
// =============================================================================

struct Node {
    state: PuzzleState,
    parent: Option<usize>,
    direction: Option<Direction>,
    g: usize,
}

/// Append-only node storage. Parents are referenced by index.
#[derive(Default)]
struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    fn push(
        &mut self,
        state: PuzzleState,
        parent: Option<usize>,
        direction: Option<Direction>,
        g: usize,
    ) -> usize {
        self.nodes.push(Node {
            state,
            parent,
            direction,
            g,
        });
        self.nodes.len() - 1
    }

    #[inline]
    fn get(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Walk parent links from `idx` back to the root and return the moves in
    /// forward order.
    fn path_to(&self, idx: usize) -> Vec<Step> {
        let mut path = Vec::with_capacity(self.nodes[idx].g);
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            let node = &self.nodes[i];
            if let Some(direction) = node.direction {
                path.push(Step {
                    direction,
                    state: node.state,
                });
            }
            cursor = node.parent;
        }
        path.reverse();
        path
    }

    /// Path to `idx` extended by one more move.
    fn path_through(&self, idx: usize, direction: Direction, state: PuzzleState) -> Vec<Step> {
        let mut path = self.path_to(idx);
        path.push(Step { direction, state });
        path
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Run `algorithm` from `start` to `goal` without external cancellation.
pub fn solve(
    start: &PuzzleState,
    goal: &PuzzleState,
    algorithm: Algorithm,
    config: &SearchConfig,
) -> SearchResult {
    solve_with_abort(start, goal, algorithm, config, &NoAbortController)
}

/// Validate raw tiles, then run `algorithm`.
///
/// This is the boundary for callers holding unchecked input: both arrays must
/// be permutations of `0..=8` or the search does not start.
pub fn solve_tiles(
    start: &[u8],
    goal: &[u8],
    algorithm: Algorithm,
    config: &SearchConfig,
) -> Result<SearchResult> {
    let start = PuzzleState::try_from_slice(start)?;
    let goal = PuzzleState::try_from_slice(goal)?;
    Ok(solve(&start, &goal, algorithm, config))
}

/// Run `algorithm`, polling `abort` once per expansion.
pub fn solve_with_abort<C: AbortController>(
    start: &PuzzleState,
    goal: &PuzzleState,
    algorithm: Algorithm,
    config: &SearchConfig,
    abort: &C,
) -> SearchResult {
    debug!("{algorithm} search from {} to {}", start.key(), goal.key());

    let started = Instant::now();
    let mut result = match algorithm {
        Algorithm::AStar => astar(start, goal, config.max_expansions, abort),
        Algorithm::Bfs => bfs(start, goal, config.max_expansions, abort),
        Algorithm::Dfs => dfs(
            start,
            goal,
            config.max_depth,
            config.dfs_max_expansions,
            abort,
        ),
    };
    result.elapsed = started.elapsed();

    debug!(
        "{algorithm} finished: {} moves, {} expanded, {:?}",
        result.moves(),
        result.expanded,
        result.elapsed
    );
    result
}

// =============================================================================
// A*
// =============================================================================

/// A* search with the Manhattan heuristic.
///
/// Ties on `f` are broken by insertion order, so among equally promising
/// nodes the first one generated is expanded first. When a cheaper route to a
/// state already on the frontier is found, the cheaper entry supersedes the
/// old one, which is skipped when it surfaces.
pub fn astar<C: AbortController>(
    start: &PuzzleState,
    goal: &PuzzleState,
    max_expansions: usize,
    abort: &C,
) -> SearchResult {
    let mut result = SearchResult::new(Algorithm::AStar);
    if start == goal {
        return result;
    }

    let h = Manhattan::new(goal);
    let mut arena = Arena::default();
    let mut open = BinaryHeap::new();
    let mut closed: HashSet<PuzzleState> = HashSet::new();
    let mut best_g: HashMap<PuzzleState, usize> = HashMap::new();
    let mut seq = 0usize;

    let root = arena.push(*start, None, None, 0);
    best_g.insert(*start, 0);
    open.push(Reverse((h.estimate(start), seq, root)));

    while let Some(Reverse((_, _, idx))) = open.pop() {
        let node = arena.get(idx);
        let (state, g) = (node.state, node.g);

        if closed.contains(&state) || best_g.get(&state).is_some_and(|&best| best < g) {
            continue;
        }

        if state == *goal {
            result.path = arena.path_to(idx);
            return result;
        }

        if abort.should_abort() {
            warn!("A* cancelled after {} expansions", result.expanded);
            result.cancelled = true;
            return result;
        }
        if result.expanded >= max_expansions {
            warn!("A* reached its expansion cap ({max_expansions})");
            return result;
        }

        closed.insert(state);
        result.expanded += 1;

        for (dir, next) in state.neighbors() {
            if closed.contains(&next) {
                continue;
            }
            let tentative = g + 1;
            if best_g.get(&next).is_none_or(|&known| tentative < known) {
                best_g.insert(next, tentative);
                let child = arena.push(next, Some(idx), Some(dir), tentative);
                seq += 1;
                open.push(Reverse((tentative + h.estimate(&next), seq, child)));
            }
        }
    }

    result
}

// =============================================================================
// Breadth-First Search
// =============================================================================

/// Breadth-first search.
///
/// States are marked visited when enqueued, and each neighbour is compared
/// with the goal as soon as it is generated rather than when it is dequeued.
/// The early test is observable through the expansion count.
pub fn bfs<C: AbortController>(
    start: &PuzzleState,
    goal: &PuzzleState,
    max_expansions: usize,
    abort: &C,
) -> SearchResult {
    let mut result = SearchResult::new(Algorithm::Bfs);
    if start == goal {
        return result;
    }

    let mut arena = Arena::default();
    let mut queue = VecDeque::new();
    let mut visited: HashSet<PuzzleState> = HashSet::new();

    visited.insert(*start);
    queue.push_back(arena.push(*start, None, None, 0));

    while let Some(idx) = queue.pop_front() {
        if abort.should_abort() {
            warn!("BFS cancelled after {} expansions", result.expanded);
            result.cancelled = true;
            return result;
        }
        if result.expanded >= max_expansions {
            warn!("BFS reached its expansion cap ({max_expansions})");
            result.timeout = true;
            return result;
        }

        result.expanded += 1;
        let node = arena.get(idx);
        let (state, g) = (node.state, node.g);

        for (dir, next) in state.neighbors() {
            if next == *goal {
                result.path = arena.path_through(idx, dir, next);
                return result;
            }
            if visited.insert(next) {
                queue.push_back(arena.push(next, Some(idx), Some(dir), g + 1));
            }
        }
    }

    result
}

// =============================================================================
// Depth-Limited Depth-First Search
// =============================================================================

/// Depth-limited depth-first search.
///
/// A state is marked visited only when it is popped for expansion, so the
/// same state may sit on the stack several times. Entries at `max_depth` are
/// discarded without being marked. Neighbours are pushed in reverse canonical
/// order so the first canonical neighbour is explored first, and each
/// neighbour is compared with the goal when generated.
pub fn dfs<C: AbortController>(
    start: &PuzzleState,
    goal: &PuzzleState,
    max_depth: usize,
    max_expansions: usize,
    abort: &C,
) -> SearchResult {
    let mut result = SearchResult::new(Algorithm::Dfs);
    if start == goal {
        return result;
    }

    let mut arena = Arena::default();
    let mut stack = vec![arena.push(*start, None, None, 0)];
    let mut visited: HashSet<PuzzleState> = HashSet::new();

    while let Some(idx) = stack.pop() {
        let node = arena.get(idx);
        let (state, depth) = (node.state, node.g);

        if depth >= max_depth || visited.contains(&state) {
            continue;
        }

        if abort.should_abort() {
            warn!("DFS cancelled after {} expansions", result.expanded);
            result.cancelled = true;
            return result;
        }
        if result.expanded >= max_expansions {
            warn!("DFS reached its expansion cap ({max_expansions})");
            result.timeout = true;
            break;
        }

        visited.insert(state);
        result.expanded += 1;

        let neighbors: Vec<(Direction, PuzzleState)> = state.neighbors().collect();
        if let Some(&(dir, next)) = neighbors.iter().find(|(_, next)| next == goal) {
            result.path = arena.path_through(idx, dir, next);
            return result;
        }

        for &(dir, next) in neighbors.iter().rev() {
            if !visited.contains(&next) {
                stack.push(arena.push(next, Some(idx), Some(dir), depth + 1));
            }
        }
    }

    result.depth_limited = Some(max_depth);
    result
}
