//! Best-first search over the move graph.
//!
//! Key properties:
//! - Frontier is a binary heap ordered by (evaluation, cost, insertion order),
//!   so ties never fall back to comparing boards or paths
//! - Boards are expanded at most once (FxHashSet of expanded boards)
//! - Paths are parent links into a per-search table instead of copied vectors
//! - All working state is local to one call

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use log::{debug, info, warn};
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::board::Board;
use crate::heuristic::{evaluate, heuristic, DEFAULT_DEPTH_PENALTY};
use crate::moves::{successors, Move, MOVE_COUNT};

/// Link index marking the start of a path.
const ROOT: usize = usize::MAX;

/// Why a search ended without a solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("frontier exhausted after {expanded} expansions without reaching the goal")]
    Exhausted { expanded: usize },
    #[error("gave up after {limit} expansions")]
    ExpansionLimit { limit: usize },
    #[error("depth penalty must be finite and non-negative, got {0}")]
    InvalidDepthPenalty(f64),
}

/// Tunables for a single search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Weight of the squared path length in the evaluation score.
    pub depth_penalty: f64,
    /// Stop with `SolveError::ExpansionLimit` after this many expansions.
    pub max_expansions: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth_penalty: DEFAULT_DEPTH_PENALTY,
            max_expansions: None,
        }
    }
}

impl SearchConfig {
    pub fn with_depth_penalty(mut self, depth_penalty: f64) -> Self {
        self.depth_penalty = depth_penalty;
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }

    fn validate(&self) -> Result<(), SolveError> {
        if self.depth_penalty.is_finite() && self.depth_penalty >= 0.0 {
            Ok(())
        } else {
            Err(SolveError::InvalidDepthPenalty(self.depth_penalty))
        }
    }
}

/// Counters collected while searching.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Boards whose successors were generated.
    pub expanded: usize,
    /// Successor nodes pushed onto the frontier.
    pub generated: usize,
    /// Popped nodes discarded because their board was already expanded.
    pub duplicates: usize,
    /// Largest frontier size observed.
    pub max_frontier: usize,
}

/// A solved search.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Moves that take the start board to the goal, in order.
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

/// One step of a path: the move taken and the link it extends.
#[derive(Clone, Copy)]
struct Link {
    parent: usize,
    mv: Move,
}

/// A frontier node.
struct Entry {
    eval: f64,
    cost: u32,
    /// Insertion sequence number, the final tie-break.
    seq: u64,
    board: Board,
    /// Last link of this node's path, or `ROOT`.
    link: usize,
}

impl Ord for Entry {
    // reversed so the max-heap pops the smallest key first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .eval
            .total_cmp(&self.eval)
            .then_with(|| other.cost.cmp(&self.cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Walks parent links back to the root and returns the moves in order.
fn reconstruct_path(links: &[Link], last: usize) -> Vec<Move> {
    let mut moves = std::iter::successors((last != ROOT).then_some(last), |&i| {
        let parent = links[i].parent;
        (parent != ROOT).then_some(parent)
    })
    .map(|i| links[i].mv)
    .collect::<Vec<_>>();
    moves.reverse();
    moves
}

/// Solves `start` with the default configuration.
///
/// Returns the moves that transform `start` into the goal. An unsolvable
/// board ends with `SolveError::Exhausted` once the frontier runs dry.
pub fn solve(start: Board) -> Result<Vec<Move>, SolveError> {
    search(start, &SearchConfig::default(), |_| {}).map(|solution| solution.moves)
}

/// Runs the best-first search from `start`.
///
/// `on_expand` is called after every expansion with the running counters.
/// The first goal board popped from the frontier ends the search; the path
/// is not guaranteed to be the shortest one.
pub fn search(
    start: Board,
    config: &SearchConfig,
    mut on_expand: impl FnMut(&SearchStats),
) -> Result<Solution, SolveError> {
    config.validate()?;

    let started = Instant::now();
    let mut stats = SearchStats::default();
    let mut links: Vec<Link> = Vec::new();
    let mut expanded: FxHashSet<Board> = FxHashSet::default();
    let mut frontier = BinaryHeap::new();
    let mut next_seq = 0u64;

    debug!(
        "searching from heuristic {} with depth penalty {}",
        heuristic(&start),
        config.depth_penalty
    );

    frontier.push(Entry {
        eval: evaluate(&start, 0, config.depth_penalty),
        cost: 0,
        seq: next_seq,
        board: start,
        link: ROOT,
    });
    next_seq += 1;
    stats.max_frontier = 1;

    while let Some(entry) = frontier.pop() {
        if entry.board.is_goal() {
            let moves = reconstruct_path(&links, entry.link);
            info!(
                "solved in {} moves after {} expansions ({:.2?})",
                moves.len(),
                stats.expanded,
                started.elapsed()
            );
            return Ok(Solution { moves, stats });
        }

        // insert returns false when the board was expanded before
        if !expanded.insert(entry.board) {
            stats.duplicates += 1;
            continue;
        }

        if let Some(limit) = config.max_expansions {
            if stats.expanded >= limit {
                warn!("expansion limit of {limit} reached");
                return Err(SolveError::ExpansionLimit { limit });
            }
        }

        let cost = entry.cost + 1;
        for (child, mv) in successors(entry.board) {
            links.push(Link {
                parent: entry.link,
                mv,
            });
            frontier.push(Entry {
                eval: evaluate(&child, cost, config.depth_penalty),
                cost,
                seq: next_seq,
                board: child,
                link: links.len() - 1,
            });
            next_seq += 1;
        }

        stats.expanded += 1;
        stats.generated += MOVE_COUNT;
        stats.max_frontier = stats.max_frontier.max(frontier.len());
        on_expand(&stats);
    }

    warn!(
        "frontier exhausted after {} expansions; the start board may be unsolvable",
        stats.expanded
    );
    Err(SolveError::Exhausted {
        expanded: stats.expanded,
    })
}
